use crate::domain::{models::procedure::Procedure, ports::ProcedureRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

pub struct SqliteProcedureRepo {
    pool: SqlitePool,
}

impl SqliteProcedureRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProcedureRepository for SqliteProcedureRepo {
    async fn create(&self, procedure: &Procedure) -> Result<Procedure, AppError> {
        sqlx::query_as::<_, Procedure>(
            "INSERT INTO procedures (id, name, description, duration_minutes, price, is_active, discount_percentage, procedure_type, technician, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&procedure.id).bind(&procedure.name).bind(&procedure.description).bind(procedure.duration_minutes)
            .bind(procedure.price).bind(procedure.is_active).bind(procedure.discount_percentage)
            .bind(&procedure.procedure_type).bind(&procedure.technician).bind(procedure.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Procedure>, AppError> {
        sqlx::query_as::<_, Procedure>("SELECT * FROM procedures WHERE id = ?").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_active_by_id(&self, id: &str) -> Result<Option<Procedure>, AppError> {
        sqlx::query_as::<_, Procedure>("SELECT * FROM procedures WHERE id = ? AND is_active = 1").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_all(&self) -> Result<Vec<Procedure>, AppError> {
        sqlx::query_as::<_, Procedure>("SELECT * FROM procedures ORDER BY procedure_type ASC, name ASC").fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_active(&self) -> Result<Vec<Procedure>, AppError> {
        sqlx::query_as::<_, Procedure>("SELECT * FROM procedures WHERE is_active = 1 ORDER BY procedure_type ASC, name ASC").fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_active_by_type(&self, type_prefix: &str) -> Result<Vec<Procedure>, AppError> {
        // substr keeps the match case-sensitive and free of LIKE wildcards
        sqlx::query_as::<_, Procedure>(
            "SELECT * FROM procedures WHERE is_active = 1 AND substr(procedure_type, 1, length(?1)) = ?1 ORDER BY name ASC"
        )
            .bind(type_prefix)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_active_by_ids(&self, ids: &[String]) -> Result<Vec<Procedure>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT * FROM procedures WHERE is_active = 1 AND id IN (");
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(id);
        }
        separated.push_unseparated(")");
        builder.build_query_as::<Procedure>().fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_discounted(&self) -> Result<Vec<Procedure>, AppError> {
        sqlx::query_as::<_, Procedure>(
            "SELECT * FROM procedures WHERE is_active = 1 AND discount_percentage IS NOT NULL AND discount_percentage > 0 ORDER BY discount_percentage DESC"
        )
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn update(&self, procedure: &Procedure) -> Result<Procedure, AppError> {
        sqlx::query_as::<_, Procedure>(
            "UPDATE procedures SET name=?, description=?, duration_minutes=?, price=?, is_active=?, discount_percentage=?, procedure_type=?, technician=?
             WHERE id=?
             RETURNING *"
        )
            .bind(&procedure.name).bind(&procedure.description).bind(procedure.duration_minutes).bind(procedure.price)
            .bind(procedure.is_active).bind(procedure.discount_percentage).bind(&procedure.procedure_type).bind(&procedure.technician)
            .bind(&procedure.id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Procedure not found".into()))
    }

    async fn set_active(&self, id: &str, is_active: bool) -> Result<Procedure, AppError> {
        sqlx::query_as::<_, Procedure>("UPDATE procedures SET is_active = ? WHERE id = ? RETURNING *")
            .bind(is_active).bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Procedure not found".into()))
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM procedures WHERE id = ?").bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 { return Err(AppError::NotFound("Procedure not found".into())); }
        Ok(())
    }
}
