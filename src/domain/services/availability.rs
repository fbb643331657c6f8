use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use crate::domain::models::{interval::Interval, slot::TimeSlot};

pub const OPENING_HOUR: u32 = 9;
pub const CLOSING_HOUR: u32 = 19;
pub const SLOT_INTERVAL_MINUTES: i64 = 30;
/// Grace after closing so a slot ending exactly at closing time stays valid.
pub const OVERLAP_TOLERANCE_MINUTES: i64 = 1;

/// Local wall-clock `hour:00` on `date`, resolved to UTC.
/// For an ambiguous local time the earlier instant wins; a skipped one yields `None`.
fn local_instant(date: NaiveDate, hour: u32, tz: Tz) -> Option<DateTime<Utc>> {
    let time = NaiveTime::from_hms_opt(hour, 0, 0)?;
    tz.from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Opening to closing instant of `date` in the salon's timezone.
pub fn business_hours(date: NaiveDate, tz: Tz) -> Option<Interval> {
    let opening = local_instant(date, OPENING_HOUR, tz)?;
    let closing = local_instant(date, CLOSING_HOUR, tz)?;
    Some(Interval::new(opening, closing))
}

/// Local calendar day `[00:00, next day 00:00)` as UTC instants.
pub fn day_bounds(date: NaiveDate, tz: Tz) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = tz.from_local_datetime(&date.and_time(NaiveTime::MIN)).earliest()?;
    let next = date.succ_opt()?;
    let end = tz.from_local_datetime(&next.and_time(NaiveTime::MIN)).earliest()?;
    Some((start.with_timezone(&Utc), end.with_timezone(&Utc)))
}

fn hits_closure(slot_start: DateTime<Utc>, slot_end: DateTime<Utc>, closure: &Interval) -> bool {
    if closure.is_degenerate() {
        return false;
    }
    closure.contains(slot_start)
        || closure.contains(slot_end)
        || (slot_start < closure.start && slot_end > closure.end)
}

fn hits_booking(slot_start: DateTime<Utc>, slot_end: DateTime<Utc>, booking: &Interval) -> bool {
    if booking.is_degenerate() {
        return false;
    }
    // Pull the booking's end and the slot's end in by a minute so intervals
    // that only share an endpoint do not collide.
    let one_minute = Duration::minutes(1);
    let occupied = Interval::new(booking.start, booking.end - one_minute);
    occupied.contains(slot_start)
        || occupied.contains(slot_end - one_minute)
        || (slot_start < booking.start && slot_end > booking.end)
}

/// Whether a single candidate start is bookable.
///
/// `closing` is the closing instant of the candidate's business day.
pub fn candidate_available(
    start: DateTime<Utc>,
    duration_minutes: i64,
    closing: DateTime<Utc>,
    closed_ranges: &[Interval],
    existing_bookings: &[Interval],
    now: DateTime<Utc>,
) -> bool {
    let slot_end = start + Duration::minutes(duration_minutes);

    if slot_end > closing + Duration::minutes(OVERLAP_TOLERANCE_MINUTES) {
        return false;
    }
    if closed_ranges.iter().any(|c| hits_closure(start, slot_end, c)) {
        return false;
    }
    if existing_bookings.iter().any(|b| hits_booking(start, slot_end, b)) {
        return false;
    }
    start >= now
}

/// Builds the full slot grid for `date`: every 30 minutes from opening up to
/// and including the closing instant, each flagged available or not.
///
/// `closed_ranges` and `existing_bookings` must already be filtered to one
/// office. `duration_minutes` must be positive; this is not checked.
/// Unavailable slots are kept so the caller sees the whole day.
pub fn generate_slots(
    date: NaiveDate,
    duration_minutes: i64,
    closed_ranges: &[Interval],
    existing_bookings: &[Interval],
    now: DateTime<Utc>,
    tz: Tz,
) -> Vec<TimeSlot> {
    let Some(hours) = business_hours(date, tz) else {
        return Vec::new();
    };

    let mut slots = Vec::new();
    let mut current = hours.start;

    while current <= hours.end {
        let available = candidate_available(
            current,
            duration_minutes,
            hours.end,
            closed_ranges,
            existing_bookings,
            now,
        );

        slots.push(TimeSlot {
            time: current.with_timezone(&tz).format("%H:%M").to_string(),
            datetime: current,
            available,
        });

        current += Duration::minutes(SLOT_INTERVAL_MINUTES);
    }

    slots
}

/// True when closures cover the whole business day of `date`.
///
/// Several closures may jointly cover it; a partial-day closure never does.
pub fn is_date_closed(date: NaiveDate, closed_ranges: &[Interval], tz: Tz) -> bool {
    let Some(hours) = business_hours(date, tz) else {
        return false;
    };

    let mut relevant: Vec<&Interval> = closed_ranges
        .iter()
        .filter(|c| !c.is_degenerate() && c.end >= hours.start && c.start <= hours.end)
        .collect();
    relevant.sort_by_key(|c| c.start);

    let mut covered_until = hours.start;
    for closure in relevant {
        if closure.start > covered_until {
            return false;
        }
        if closure.end > covered_until {
            covered_until = closure.end;
        }
        if covered_until >= hours.end {
            return true;
        }
    }
    false
}
