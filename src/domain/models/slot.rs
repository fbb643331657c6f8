use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// One candidate appointment start on the requested day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeSlot {
    /// "HH:mm" in salon local time.
    pub time: String,
    pub datetime: DateTime<Utc>,
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub closed: bool,
    pub bookable: bool,
}
