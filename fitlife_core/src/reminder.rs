//! Medicine reminder evaluation.
//!
//! Only daily medicines are time-gated. A daily medicine is due when the
//! current hour equals the scheduled hour and the minutes differ by at most
//! [`DUE_TOLERANCE_MINUTES`]; there is no tolerance across an hour boundary
//! (20:00 is not due at 19:58). It must also not have been taken on the
//! current calendar day.

use chrono::{DateTime, NaiveTime, TimeZone, Timelike};

use crate::types::{Frequency, Medicine, ReminderDecision, TodayMedicine};

pub const DUE_TOLERANCE_MINUTES: i32 = 5;

/// Number of entries [`upcoming`] returns by default
pub const DEFAULT_UPCOMING_LIMIT: usize = 3;

const MINUTES_PER_DAY: u32 = 24 * 60;

fn minutes_since_midnight<T: Timelike>(t: &T) -> u32 {
    t.hour() * 60 + t.minute()
}

/// Whether `medicine` was marked taken on `now`'s calendar date, in `now`'s zone.
fn taken_today<Tz: TimeZone>(medicine: &Medicine, now: &DateTime<Tz>) -> bool {
    medicine
        .last_taken_at
        .map(|taken| taken.with_timezone(&now.timezone()).date_naive() == now.date_naive())
        .unwrap_or(false)
}

fn in_due_window<Tz: TimeZone>(scheduled: &NaiveTime, now: &DateTime<Tz>) -> bool {
    now.hour() == scheduled.hour()
        && (now.minute() as i32 - scheduled.minute() as i32).abs() <= DUE_TOLERANCE_MINUTES
}

/// Minutes until the next occurrence of `scheduled`; an occurrence at the
/// current minute counts as tomorrow's.
fn minutes_until<Tz: TimeZone>(scheduled: &NaiveTime, now: &DateTime<Tz>) -> u32 {
    let scheduled = minutes_since_midnight(scheduled);
    let current = minutes_since_midnight(now);
    if scheduled > current {
        scheduled - current
    } else {
        MINUTES_PER_DAY - current + scheduled
    }
}

fn decide<'a, Tz: TimeZone>(medicine: &'a Medicine, now: &DateTime<Tz>) -> ReminderDecision<'a> {
    ReminderDecision {
        medicine,
        is_due_now: in_due_window(&medicine.scheduled_time, now) && !taken_today(medicine, now),
        minutes_until_next: minutes_until(&medicine.scheduled_time, now),
    }
}

/// Evaluate every daily medicine at `now`, in input order. Weekly and
/// as-needed medicines are not time-gated and produce no decision.
pub fn due_reminders<'a, Tz: TimeZone>(
    medicines: &'a [Medicine],
    now: &DateTime<Tz>,
) -> Vec<ReminderDecision<'a>> {
    medicines
        .iter()
        .filter(|m| m.frequency == Frequency::Daily)
        .map(|m| decide(m, now))
        .collect()
}

/// The next `limit` daily medicines, soonest first. Ties keep input order.
pub fn upcoming<'a, Tz: TimeZone>(
    medicines: &'a [Medicine],
    now: &DateTime<Tz>,
    limit: usize,
) -> Vec<ReminderDecision<'a>> {
    let mut decisions = due_reminders(medicines, now);
    decisions.sort_by_key(|d| d.minutes_until_next);
    decisions.truncate(limit);
    decisions
}

/// Medicines to show in today's checklist: daily and weekly ones (weekly
/// medicines appear every day), each flagged with whether it was taken.
pub fn todays_medicines<'a, Tz: TimeZone>(
    medicines: &'a [Medicine],
    now: &DateTime<Tz>,
) -> Vec<TodayMedicine<'a>> {
    medicines
        .iter()
        .filter(|m| matches!(m.frequency, Frequency::Daily | Frequency::Weekly))
        .map(|medicine| TodayMedicine {
            medicine,
            taken_today: taken_today(medicine, now),
        })
        .collect()
}
