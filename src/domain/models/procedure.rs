use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Procedure {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub duration_minutes: i32,
    pub price: f64,
    pub is_active: bool,
    pub discount_percentage: Option<i32>,
    #[serde(rename = "type")]
    pub procedure_type: String,
    pub technician: String,
    pub created_at: DateTime<Utc>,
}

pub struct NewProcedureParams {
    pub name: String,
    pub description: Option<String>,
    pub duration_minutes: i32,
    pub price: f64,
    pub discount_percentage: Option<i32>,
    pub procedure_type: String,
    pub technician: String,
}

impl Procedure {
    pub fn new(params: NewProcedureParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: params.name,
            description: params.description,
            duration_minutes: params.duration_minutes,
            price: params.price,
            is_active: true,
            // a zero discount is stored as "no discount"
            discount_percentage: params.discount_percentage.filter(|d| *d > 0),
            procedure_type: params.procedure_type,
            technician: params.technician,
            created_at: Utc::now(),
        }
    }

    pub fn has_discount(&self) -> bool {
        self.discount_percentage.is_some_and(|d| d > 0)
    }

    /// Price after discount, rounded to cents.
    pub fn discounted_price(&self) -> f64 {
        match self.discount_percentage {
            Some(d) if d > 0 => {
                let raw = self.price * f64::from(100 - d.min(100)) / 100.0;
                (raw * 100.0).round() / 100.0
            }
            _ => self.price,
        }
    }
}
