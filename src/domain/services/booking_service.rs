use std::sync::Arc;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use tracing::{info, warn};

use crate::config::{Config, ConflictSource};
use crate::domain::models::{
    interval::Interval,
    office::Office,
    reservation::{NewReservationParams, Reservation, ReservationConfirmation, ReservationLog},
    slot::{CalendarDay, TimeSlot},
};
use crate::domain::ports::{ProcedureRepository, ReservationRepository, ScheduleClosureRepository};
use crate::domain::services::availability::{day_bounds, generate_slots, is_date_closed};
use crate::domain::services::validation::{non_blank, normalize_phone, validate_contact, ContactFields};
use crate::error::AppError;

pub const MAX_CALENDAR_SPAN_DAYS: i64 = 62;

/// Customer input for a new reservation.
pub struct ReservationRequest {
    pub office: String,
    pub procedure_id: String,
    pub start: DateTime<Utc>,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub note: Option<String>,
}

/// Reads procedures, closures and reservations for the booking flow and
/// writes confirmed reservations.
pub struct BookingService {
    procedure_repo: Arc<dyn ProcedureRepository>,
    closure_repo: Arc<dyn ScheduleClosureRepository>,
    reservation_repo: Arc<dyn ReservationRepository>,
    tz: Tz,
    horizon_days: i64,
    conflict_source: ConflictSource,
}

impl BookingService {
    pub fn new(
        procedure_repo: Arc<dyn ProcedureRepository>,
        closure_repo: Arc<dyn ScheduleClosureRepository>,
        reservation_repo: Arc<dyn ReservationRepository>,
        config: &Config,
    ) -> Self {
        Self {
            procedure_repo,
            closure_repo,
            reservation_repo,
            tz: config.salon_timezone,
            horizon_days: config.booking_horizon_days,
            conflict_source: config.conflict_source,
        }
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.tz).date_naive()
    }

    fn last_bookable_date(&self, now: DateTime<Utc>) -> NaiveDate {
        self.today(now) + Duration::days(self.horizon_days)
    }

    fn bounds(&self, date: NaiveDate) -> Result<(DateTime<Utc>, DateTime<Utc>), AppError> {
        day_bounds(date, self.tz)
            .ok_or_else(|| AppError::Validation(format!("Date {} cannot be resolved in the salon timezone", date)))
    }

    async fn booking_intervals(&self, office: Office, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Interval>, AppError> {
        match self.conflict_source {
            ConflictSource::Store => {
                let reservations = self.reservation_repo.list_by_range(office.as_str(), start, end).await?;
                Ok(reservations.iter().map(Reservation::interval).collect())
            }
            ConflictSource::External => Ok(Vec::new()),
        }
    }

    async fn grid(&self, office: Office, date: NaiveDate, duration_minutes: i64, now: DateTime<Utc>) -> Result<Vec<TimeSlot>, AppError> {
        let (day_start, day_end) = self.bounds(date)?;

        let closures: Vec<Interval> = self.closure_repo
            .list_by_range(office.as_str(), day_start, day_end).await?
            .iter()
            .map(|c| c.interval())
            .collect();
        let bookings = self.booking_intervals(office, day_start, day_end).await?;

        Ok(generate_slots(date, duration_minutes, &closures, &bookings, now, self.tz))
    }

    pub async fn available_slots(&self, office: Office, date: NaiveDate, procedure_id: &str, now: DateTime<Utc>) -> Result<Vec<TimeSlot>, AppError> {
        let procedure = self.procedure_repo.find_active_by_id(procedure_id).await?
            .ok_or(AppError::NotFound("Procedure not found or inactive".into()))?;

        self.grid(office, date, procedure.duration_minutes as i64, now).await
    }

    /// Whole-day closure and bookability for each date of `[from, to]`.
    pub async fn calendar(&self, office: Office, from: NaiveDate, to: NaiveDate, now: DateTime<Utc>) -> Result<Vec<CalendarDay>, AppError> {
        if to < from {
            return Err(AppError::Validation("End date must not be before start date".into()));
        }
        if (to - from).num_days() >= MAX_CALENDAR_SPAN_DAYS {
            return Err(AppError::Validation(format!("Range may span at most {} days", MAX_CALENDAR_SPAN_DAYS)));
        }

        let (range_start, _) = self.bounds(from)?;
        let (_, range_end) = self.bounds(to)?;
        let closures: Vec<Interval> = self.closure_repo
            .list_by_range(office.as_str(), range_start, range_end).await?
            .iter()
            .map(|c| c.interval())
            .collect();

        let today = self.today(now);
        let last = self.last_bookable_date(now);

        Ok(from
            .iter_days()
            .take_while(|d| *d <= to)
            .map(|date| {
                let closed = is_date_closed(date, &closures, self.tz);
                CalendarDay {
                    date,
                    closed,
                    bookable: !closed && date >= today && date <= last,
                }
            })
            .collect())
    }

    pub async fn create_reservation(&self, request: ReservationRequest, now: DateTime<Utc>) -> Result<ReservationConfirmation, AppError> {
        let email = non_blank(request.email);
        let note = non_blank(request.note);
        let first_name = request.first_name.trim().to_string();
        let last_name = request.last_name.trim().to_string();

        validate_contact(&ContactFields {
            first_name: &first_name,
            last_name: &last_name,
            phone: request.phone.trim(),
            email: email.as_deref(),
            note: note.as_deref(),
        })?;

        let office: Office = request.office.parse()
            .map_err(|e| AppError::Validation(format!("Invalid office: {}", e)))?;

        let procedure = self.procedure_repo.find_active_by_id(&request.procedure_id).await?
            .ok_or(AppError::NotFound("Selected procedure is not available".into()))?;

        if request.start < now {
            return Err(AppError::Validation("Cannot book in the past".into()));
        }

        let local_date = request.start.with_timezone(&self.tz).date_naive();
        if local_date > self.last_bookable_date(now) {
            return Err(AppError::Validation(format!("Reservations open at most {} days ahead", self.horizon_days)));
        }

        let grid = self.grid(office, local_date, procedure.duration_minutes as i64, now).await?;
        let slot = grid.iter().find(|s| s.datetime == request.start)
            .ok_or(AppError::Validation("Requested time is not a bookable slot".into()))?;

        if !slot.available {
            warn!("Reservation rejected: {} at {} is not available", office, slot.datetime);
            return Err(AppError::Conflict("Selected time slot is not available".into()));
        }

        let reservation = Reservation::new(NewReservationParams {
            office,
            procedure_id: procedure.id.clone(),
            start: request.start,
            duration_min: procedure.duration_minutes,
            first_name,
            last_name,
            phone: normalize_phone(&request.phone),
            email,
            note,
        });
        let log = ReservationLog::for_reservation(&reservation);

        let created = self.reservation_repo.create_checked(&reservation, &log).await?;
        info!("Reservation confirmed: {} at {} ({})", created.id, office, created.start_time);

        Ok(ReservationConfirmation::new(created, &procedure))
    }
}
