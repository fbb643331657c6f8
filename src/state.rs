use std::sync::Arc;
use crate::domain::ports::{ProcedureRepository, ReservationRepository, ScheduleClosureRepository};
use crate::domain::services::{auth_service::AuthService, booking_service::BookingService};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub procedure_repo: Arc<dyn ProcedureRepository>,
    pub closure_repo: Arc<dyn ScheduleClosureRepository>,
    pub reservation_repo: Arc<dyn ReservationRepository>,
    pub auth_service: Arc<AuthService>,
    pub booking_service: Arc<BookingService>,
}
