use chrono::NaiveDate;
use serde::Serialize;
use crate::domain::models::{
    office::Office,
    procedure::Procedure,
    slot::{CalendarDay, TimeSlot},
};
use crate::domain::services::statistics::ProcedureStats;

#[derive(Serialize)]
pub struct SlotsResponse {
    pub date: NaiveDate,
    pub office: Office,
    pub procedure_id: String,
    pub slots: Vec<TimeSlot>,
}

#[derive(Serialize)]
pub struct CalendarResponse {
    pub office: Office,
    pub days: Vec<CalendarDay>,
}

#[derive(Serialize)]
pub struct ProcedureView {
    #[serde(flatten)]
    pub procedure: Procedure,
    pub discounted_price: f64,
}

impl From<Procedure> for ProcedureView {
    fn from(procedure: Procedure) -> Self {
        let discounted_price = procedure.discounted_price();
        Self { procedure, discounted_price }
    }
}

#[derive(Serialize)]
pub struct PopularProcedure {
    #[serde(flatten)]
    pub procedure: ProcedureView,
    pub bookings: usize,
}

#[derive(Serialize)]
pub struct StatisticsResponse {
    pub total_reservations: usize,
    pub procedures: Vec<ProcedureStats>,
}
