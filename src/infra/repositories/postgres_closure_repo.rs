use crate::domain::{models::closure::ScheduleClosure, ports::ScheduleClosureRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;
use chrono::{DateTime, Utc};

pub struct PostgresClosureRepo {
    pool: PgPool,
}

impl PostgresClosureRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ScheduleClosureRepository for PostgresClosureRepo {
    async fn create(&self, closure: &ScheduleClosure) -> Result<ScheduleClosure, AppError> {
        sqlx::query_as::<_, ScheduleClosure>(
            "INSERT INTO schedules (id, office_name, closed_date_start, closed_date_end, created_at) VALUES ($1, $2, $3, $4, $5) RETURNING *"
        )
            .bind(&closure.id)
            .bind(&closure.office_name)
            .bind(closure.closed_date_start)
            .bind(closure.closed_date_end)
            .bind(closure.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_all(&self) -> Result<Vec<ScheduleClosure>, AppError> {
        sqlx::query_as::<_, ScheduleClosure>("SELECT * FROM schedules ORDER BY closed_date_start ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_upcoming(&self, office: &str, from: DateTime<Utc>) -> Result<Vec<ScheduleClosure>, AppError> {
        sqlx::query_as::<_, ScheduleClosure>(
            "SELECT * FROM schedules WHERE office_name = $1 AND closed_date_end >= $2 ORDER BY closed_date_start ASC"
        )
            .bind(office)
            .bind(from)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_range(&self, office: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<ScheduleClosure>, AppError> {
        sqlx::query_as::<_, ScheduleClosure>(
            "SELECT * FROM schedules WHERE office_name = $1 AND closed_date_start <= $2 AND closed_date_end >= $3 ORDER BY closed_date_start ASC"
        )
            .bind(office)
            .bind(end)
            .bind(start)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM schedules WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Closure not found".into()));
        }
        Ok(())
    }
}
