use crate::domain::models::{
    closure::ScheduleClosure,
    procedure::Procedure,
    reservation::{Reservation, ReservationLog},
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait ProcedureRepository: Send + Sync {
    async fn create(&self, procedure: &Procedure) -> Result<Procedure, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Procedure>, AppError>;
    async fn find_active_by_id(&self, id: &str) -> Result<Option<Procedure>, AppError>;
    async fn list_all(&self) -> Result<Vec<Procedure>, AppError>;
    async fn list_active(&self) -> Result<Vec<Procedure>, AppError>;
    async fn list_active_by_type(&self, type_prefix: &str) -> Result<Vec<Procedure>, AppError>;
    async fn list_active_by_ids(&self, ids: &[String]) -> Result<Vec<Procedure>, AppError>;
    async fn list_discounted(&self) -> Result<Vec<Procedure>, AppError>;
    async fn update(&self, procedure: &Procedure) -> Result<Procedure, AppError>;
    async fn set_active(&self, id: &str, is_active: bool) -> Result<Procedure, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait ScheduleClosureRepository: Send + Sync {
    async fn create(&self, closure: &ScheduleClosure) -> Result<ScheduleClosure, AppError>;
    async fn list_all(&self) -> Result<Vec<ScheduleClosure>, AppError>;
    /// Closures of `office` that end at or after `from`.
    async fn list_upcoming(&self, office: &str, from: DateTime<Utc>) -> Result<Vec<ScheduleClosure>, AppError>;
    /// Closures of `office` touching `[start, end]`.
    async fn list_by_range(&self, office: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<ScheduleClosure>, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Inserts the reservation and its log entry atomically, failing with
    /// `AppError::Conflict` when another reservation of the same office
    /// overlaps `[start_time, end_time)`.
    async fn create_checked(&self, reservation: &Reservation, log: &ReservationLog) -> Result<Reservation, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Reservation>, AppError>;
    /// Reservations of `office` overlapping `[start, end)`.
    async fn list_by_range(&self, office: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Reservation>, AppError>;
    /// Reservations of all offices starting inside `[start, end)`.
    async fn list_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Reservation>, AppError>;
    async fn list_logs(&self) -> Result<Vec<ReservationLog>, AppError>;
    async fn list_logs_since(&self, since: DateTime<Utc>) -> Result<Vec<ReservationLog>, AppError>;
}
