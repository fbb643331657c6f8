use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use crate::domain::models::{interval::Interval, office::Office};

/// Admin-declared period during which an office accepts no bookings.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct ScheduleClosure {
    pub id: String,
    pub office_name: String,
    pub closed_date_start: DateTime<Utc>,
    pub closed_date_end: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl ScheduleClosure {
    pub fn new(office: Office, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            office_name: office.as_str().to_string(),
            closed_date_start: start,
            closed_date_end: end,
            created_at: Utc::now(),
        }
    }

    pub fn interval(&self) -> Interval {
        Interval::new(self.closed_date_start, self.closed_date_end)
    }
}
