use crate::domain::{models::reservation::{Reservation, ReservationLog}, ports::ReservationRepository};
use crate::error::{AppError, SLOT_TAKEN_MESSAGE};
use async_trait::async_trait;
use sqlx::SqlitePool;
use chrono::{DateTime, Utc};

pub struct SqliteReservationRepo {
    pool: SqlitePool,
}

impl SqliteReservationRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReservationRepository for SqliteReservationRepo {
    async fn create_checked(&self, reservation: &Reservation, log: &ReservationLog) -> Result<Reservation, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // One statement: the overlap check and the insert run under the same write lock.
        let created = sqlx::query_as::<_, Reservation>(
            "INSERT INTO reservations (id, office_name, procedure_id, start_time, end_time, first_name, last_name, phone, email, note, created_at)
             SELECT ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?
             WHERE NOT EXISTS (
                 SELECT 1 FROM reservations WHERE office_name = ? AND start_time < ? AND end_time > ?
             )
             RETURNING *"
        )
            .bind(&reservation.id).bind(&reservation.office_name).bind(&reservation.procedure_id)
            .bind(reservation.start_time).bind(reservation.end_time).bind(&reservation.first_name).bind(&reservation.last_name)
            .bind(&reservation.phone).bind(&reservation.email).bind(&reservation.note).bind(reservation.created_at)
            .bind(&reservation.office_name).bind(reservation.end_time).bind(reservation.start_time)
            .fetch_optional(&mut *tx).await.map_err(AppError::Database)?;

        let Some(created) = created else {
            return Err(AppError::Conflict(SLOT_TAKEN_MESSAGE.to_string()));
        };

        sqlx::query("INSERT INTO reservation_logs (id, procedure_id, office_name, booked_at, source) VALUES (?, ?, ?, ?, ?)")
            .bind(&log.id).bind(&log.procedure_id).bind(&log.office_name).bind(log.booked_at).bind(&log.source)
            .execute(&mut *tx).await.map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }
    async fn find_by_id(&self, id: &str) -> Result<Option<Reservation>, AppError> {
        sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = ?").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_by_range(&self, office: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Reservation>, AppError> {
        sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE office_name = ? AND start_time < ? AND end_time > ? ORDER BY start_time ASC").bind(office).bind(end).bind(start).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Reservation>, AppError> {
        sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE start_time >= ? AND start_time < ? ORDER BY start_time ASC").bind(start).bind(end).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_logs(&self) -> Result<Vec<ReservationLog>, AppError> {
        sqlx::query_as::<_, ReservationLog>("SELECT * FROM reservation_logs ORDER BY booked_at ASC").fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_logs_since(&self, since: DateTime<Utc>) -> Result<Vec<ReservationLog>, AppError> {
        sqlx::query_as::<_, ReservationLog>("SELECT * FROM reservation_logs WHERE booked_at >= ? ORDER BY booked_at ASC").bind(since).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
