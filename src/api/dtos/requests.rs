use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct CreateReservationRequest {
    pub office: String,
    pub procedure_id: String,
    /// RFC 3339 instant of the chosen slot.
    pub start: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub note: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateProcedureRequest {
    pub name: String,
    pub description: Option<String>,
    pub duration_minutes: i32,
    pub price: f64,
    pub discount_percentage: Option<i32>,
    #[serde(rename = "type")]
    pub procedure_type: String,
    pub technician: String,
}

#[derive(Deserialize)]
pub struct UpdateProcedureRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub duration_minutes: Option<i32>,
    pub price: Option<f64>,
    /// `0` clears the discount.
    pub discount_percentage: Option<i32>,
    #[serde(rename = "type")]
    pub procedure_type: Option<String>,
    pub technician: Option<String>,
}

#[derive(Deserialize)]
pub struct SetActiveRequest {
    pub is_active: bool,
}

#[derive(Deserialize)]
pub struct CreateClosureRequest {
    pub office: String,
    pub closed_date_start: DateTime<Utc>,
    pub closed_date_end: DateTime<Utc>,
}
