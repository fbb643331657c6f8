use chrono::{DateTime, Utc};
use serde::Serialize;

/// A span between two instants. Closures and reservations both project to this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Interval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// `end <= start`. Such intervals never match anything.
    pub fn is_degenerate(&self) -> bool {
        self.end <= self.start
    }

    /// Closed-interval membership. Always false when `start > end`.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }
}
