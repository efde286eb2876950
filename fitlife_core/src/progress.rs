//! Weekly progress summary.

use crate::{Todo, WorkoutRecord};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Workouts per week that count as 100% workout progress
pub const WEEKLY_WORKOUT_TARGET: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyStats {
    pub weekly_workouts: usize,
    pub total_workouts: usize,
    pub weekly_todos: usize,
    pub completed_todos: usize,
    pub total_todos: usize,
    /// Percentage of todos completed, 0 when there are none
    pub completion_rate: u32,
    /// Weekly workouts against [`WEEKLY_WORKOUT_TARGET`], capped at 100
    pub workout_progress: u32,
    pub message: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkoutSummary {
    pub total_workouts: usize,
    pub total_exercises: usize,
    pub average_duration_minutes: u32,
}

fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.0).round() as u32
}

pub fn motivational_message(weekly_workouts: usize, completion_rate: u32) -> &'static str {
    if weekly_workouts >= 4 && completion_rate >= 80 {
        "You're absolutely crushing it! Keep up the amazing work!"
    } else if weekly_workouts >= 3 || completion_rate >= 60 {
        "Great progress! You're building strong habits!"
    } else if weekly_workouts >= 1 || completion_rate >= 30 {
        "Good start! Every step counts towards your goals!"
    } else {
        "Ready to start your fitness journey? Let's make today count!"
    }
}

/// Stats for the seven days before `now`.
pub fn weekly_stats(workouts: &[WorkoutRecord], todos: &[Todo], now: DateTime<Utc>) -> WeeklyStats {
    let week_ago = now - Duration::days(7);

    let weekly_workouts = workouts.iter().filter(|w| w.date >= week_ago).count();
    let weekly_todos = todos.iter().filter(|t| t.created_at >= week_ago).count();
    let completed_todos = todos.iter().filter(|t| t.completed).count();

    let completion_rate = percent(completed_todos, todos.len());
    let workout_progress = percent(weekly_workouts, WEEKLY_WORKOUT_TARGET).min(100);

    WeeklyStats {
        weekly_workouts,
        total_workouts: workouts.len(),
        weekly_todos,
        completed_todos,
        total_todos: todos.len(),
        completion_rate,
        workout_progress,
        message: motivational_message(weekly_workouts, completion_rate),
    }
}

pub fn workout_summary(workouts: &[WorkoutRecord]) -> WorkoutSummary {
    let total_exercises = workouts.iter().map(|w| w.exercises.len()).sum();
    let total_minutes: u64 = workouts.iter().map(|w| u64::from(w.duration_minutes)).sum();

    let average_duration_minutes = if workouts.is_empty() {
        0
    } else {
        (total_minutes as f64 / workouts.len() as f64).round() as u32
    };

    WorkoutSummary {
        total_workouts: workouts.len(),
        total_exercises,
        average_duration_minutes,
    }
}
