use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use crate::domain::models::{interval::Interval, office::Office, procedure::Procedure};

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Reservation {
    pub id: String,
    pub office_name: String,
    pub procedure_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub struct NewReservationParams {
    pub office: Office,
    pub procedure_id: String,
    pub start: DateTime<Utc>,
    pub duration_min: i32,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub note: Option<String>,
}

impl Reservation {
    pub fn new(params: NewReservationParams) -> Self {
        let end_time = params.start + chrono::Duration::minutes(params.duration_min as i64);

        Self {
            id: Uuid::new_v4().to_string(),
            office_name: params.office.as_str().to_string(),
            procedure_id: params.procedure_id,
            start_time: params.start,
            end_time,
            first_name: params.first_name,
            last_name: params.last_name,
            phone: params.phone,
            email: params.email,
            note: params.note,
            created_at: Utc::now(),
        }
    }

    pub fn interval(&self) -> Interval {
        Interval::new(self.start_time, self.end_time)
    }
}

/// Analytics record written alongside every website reservation.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct ReservationLog {
    pub id: String,
    pub procedure_id: String,
    pub office_name: String,
    pub booked_at: DateTime<Utc>,
    pub source: String,
}

impl ReservationLog {
    pub fn for_reservation(reservation: &Reservation) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            procedure_id: reservation.procedure_id.clone(),
            office_name: reservation.office_name.clone(),
            booked_at: reservation.created_at,
            source: "website".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReservationConfirmation {
    #[serde(flatten)]
    pub reservation: Reservation,
    pub procedure_name: String,
    pub duration_minutes: i32,
    pub price: f64,
    pub discounted_price: f64,
    pub technician: String,
}

impl ReservationConfirmation {
    pub fn new(reservation: Reservation, procedure: &Procedure) -> Self {
        Self {
            reservation,
            procedure_name: procedure.name.clone(),
            duration_minutes: procedure.duration_minutes,
            price: procedure.price,
            discounted_price: procedure.discounted_price(),
            technician: procedure.technician.clone(),
        }
    }
}
