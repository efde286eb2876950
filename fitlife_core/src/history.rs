//! Workout history loading with a trailing window.
//!
//! The recommendation engine sees at most `limit` workouts from the last
//! `days` days, newest first.

use crate::journal::Journal;
use crate::{Result, WorkoutRecord};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;

/// Keep workouts on or after `since`, newest first, capped at `limit`.
/// Duplicate ids (e.g. a record appended twice) are kept once.
pub fn select_recent(
    workouts: Vec<WorkoutRecord>,
    since: DateTime<Utc>,
    limit: usize,
) -> Vec<WorkoutRecord> {
    let mut seen_ids = HashSet::new();
    let mut recent: Vec<WorkoutRecord> = workouts
        .into_iter()
        .filter(|w| w.date >= since)
        .filter(|w| seen_ids.insert(w.id))
        .collect();

    // Sort by date, newest first
    recent.sort_by(|a, b| b.date.cmp(&a.date));
    recent.truncate(limit);
    recent
}

/// Load workouts from the last `days` days (relative to `now`) from the
/// workout journal.
pub fn load_recent_workouts(
    journal: &Journal<WorkoutRecord>,
    now: DateTime<Utc>,
    days: i64,
    limit: usize,
) -> Result<Vec<WorkoutRecord>> {
    let cutoff = now - Duration::days(days);
    let all = journal.read_all()?;
    let total = all.len();
    let recent = select_recent(all, cutoff, limit);

    tracing::info!(
        "Loaded {} of {} workouts from last {} days",
        recent.len(),
        total,
        days
    );

    Ok(recent)
}
