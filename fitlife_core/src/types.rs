//! Core domain types for FitLife.
//!
//! This module defines the fundamental types used throughout the system:
//! - Muscle groups, exercises and logged workouts
//! - The user profile consumed by the recommendation engine
//! - AI advice (workout suggestions, menu analyses) and their provenance
//! - Medicines and reminder decisions
//! - Todos

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::{Error, Result};

// ============================================================================
// Workout Types
// ============================================================================

/// Body region a workout targets
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MuscleGroup {
    Chest,
    Back,
    Shoulders,
    Arms,
    Legs,
    Core,
    #[serde(rename = "Full Body", alias = "FullBody")]
    FullBody,
}

impl MuscleGroup {
    /// Every group a workout can be logged against
    pub const ALL: [MuscleGroup; 7] = [
        MuscleGroup::Chest,
        MuscleGroup::Back,
        MuscleGroup::Shoulders,
        MuscleGroup::Arms,
        MuscleGroup::Legs,
        MuscleGroup::Core,
        MuscleGroup::FullBody,
    ];

    /// Groups the recommendation engine balances, in tie-break order.
    pub const BALANCED: [MuscleGroup; 6] = [
        MuscleGroup::Chest,
        MuscleGroup::Back,
        MuscleGroup::Shoulders,
        MuscleGroup::Arms,
        MuscleGroup::Legs,
        MuscleGroup::Core,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MuscleGroup::Chest => "Chest",
            MuscleGroup::Back => "Back",
            MuscleGroup::Shoulders => "Shoulders",
            MuscleGroup::Arms => "Arms",
            MuscleGroup::Legs => "Legs",
            MuscleGroup::Core => "Core",
            MuscleGroup::FullBody => "Full Body",
        }
    }
}

impl fmt::Display for MuscleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MuscleGroup {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "chest" => Ok(MuscleGroup::Chest),
            "back" => Ok(MuscleGroup::Back),
            "shoulders" => Ok(MuscleGroup::Shoulders),
            "arms" => Ok(MuscleGroup::Arms),
            "legs" => Ok(MuscleGroup::Legs),
            "core" => Ok(MuscleGroup::Core),
            "fullbody" => Ok(MuscleGroup::FullBody),
            _ => Err(Error::validation(format!("unknown muscle group: {s}"))),
        }
    }
}

/// A single exercise performed (or prescribed) within a workout
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExerciseEntry {
    pub name: String,
    pub sets: u32,
    pub reps: u32,
    pub weight: f64,
}

impl ExerciseEntry {
    pub fn new(name: impl Into<String>, sets: u32, reps: u32, weight: f64) -> Self {
        Self {
            name: name.into(),
            sets,
            reps,
            weight,
        }
    }

    /// Check the field constraints: non-empty name, positive sets and reps,
    /// finite non-negative weight.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::validation("exercise name is required"));
        }
        if self.sets == 0 {
            return Err(Error::validation(format!("{}: sets must be positive", self.name)));
        }
        if self.reps == 0 {
            return Err(Error::validation(format!("{}: reps must be positive", self.name)));
        }
        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(Error::validation(format!(
                "{}: weight must be a non-negative number",
                self.name
            )));
        }
        Ok(())
    }
}

/// A logged workout. Immutable once written to the workout log.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkoutRecord {
    pub id: Uuid,
    pub muscle_group: MuscleGroup,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub duration_minutes: u32,
    #[serde(default)]
    pub notes: String,
    pub exercises: Vec<ExerciseEntry>,
}

/// Input for logging a new workout (without id or date)
#[derive(Clone, Debug)]
pub struct NewWorkout {
    pub muscle_group: MuscleGroup,
    pub duration_minutes: u32,
    pub notes: String,
    pub exercises: Vec<ExerciseEntry>,
}

impl NewWorkout {
    pub fn validate(&self) -> Result<()> {
        if self.exercises.is_empty() {
            return Err(Error::validation("a workout needs at least one exercise"));
        }
        self.exercises.iter().try_for_each(ExerciseEntry::validate)
    }
}

// ============================================================================
// Profile Types
// ============================================================================

/// Training goal, drives both prompts
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FitnessGoal {
    Bulking,
    Cutting,
    #[default]
    Maintenance,
}

impl FitnessGoal {
    pub fn as_str(&self) -> &'static str {
        match self {
            FitnessGoal::Bulking => "bulking",
            FitnessGoal::Cutting => "cutting",
            FitnessGoal::Maintenance => "maintenance",
        }
    }
}

impl fmt::Display for FitnessGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FitnessGoal {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "bulking" => Ok(FitnessGoal::Bulking),
            "cutting" => Ok(FitnessGoal::Cutting),
            "maintenance" => Ok(FitnessGoal::Maintenance),
            other => Err(Error::validation(format!("unknown fitness goal: {other}"))),
        }
    }
}

/// The local user's profile
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: Uuid,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub fitness_goal: FitnessGoal,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub age: Option<u32>,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            user_id: Uuid::new_v4(),
            name: String::new(),
            fitness_goal: FitnessGoal::default(),
            weight_kg: None,
            height_cm: None,
            age: None,
        }
    }
}

// ============================================================================
// AI Advice Types
// ============================================================================

/// A single structured workout suggestion
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub muscle_group: MuscleGroup,
    pub reasoning: String,
    pub exercises: Vec<ExerciseEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tips: Option<String>,
}

/// Nutrition analysis of a free-text meal plan
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MenuAnalysis {
    pub score: u8,
    pub highlights: Vec<String>,
    pub recommendations: Vec<String>,
    pub macro_balance: String,
    pub calorie_assessment: String,
    pub goal_alignment: String,
}

/// Where a piece of advice came from
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AdviceSource {
    /// Returned by the generative service and passed validation
    Generated,
    /// Deterministic fallback; `reason` describes the absorbed failure
    Fallback { reason: String },
}

/// A value produced by one of the AI entry points, tagged with its source
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Advice<T> {
    pub value: T,
    pub source: AdviceSource,
}

impl<T> Advice<T> {
    pub fn generated(value: T) -> Self {
        Self {
            value,
            source: AdviceSource::Generated,
        }
    }

    pub fn fallback(value: T, reason: impl Into<String>) -> Self {
        Self {
            value,
            source: AdviceSource::Fallback {
                reason: reason.into(),
            },
        }
    }

    pub fn is_generated(&self) -> bool {
        self.source == AdviceSource::Generated
    }
}

// ============================================================================
// Medicine Types
// ============================================================================

/// How often a medicine is taken
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Frequency {
    #[default]
    Daily,
    Weekly,
    AsNeeded,
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::AsNeeded => "as-needed",
        })
    }
}

impl FromStr for Frequency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "as-needed" | "as_needed" | "asneeded" => Ok(Frequency::AsNeeded),
            other => Err(Error::validation(format!("unknown frequency: {other}"))),
        }
    }
}

/// A scheduled medicine
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Medicine {
    pub id: Uuid,
    pub name: String,
    pub dosage: String,
    pub scheduled_time: NaiveTime,
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default)]
    pub notes: String,
    pub last_taken_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Input for adding a medicine
#[derive(Clone, Debug)]
pub struct NewMedicine {
    pub name: String,
    pub dosage: String,
    pub scheduled_time: NaiveTime,
    pub frequency: Frequency,
    pub notes: String,
}

impl NewMedicine {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() || self.dosage.trim().is_empty() {
            return Err(Error::validation("name, dosage, and time are required"));
        }
        Ok(())
    }
}

/// Parse a wall-clock time such as `20:00` or `07:30:00`.
pub fn parse_time_of_day(s: &str) -> Result<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|_| Error::validation(format!("invalid time of day: {s:?} (expected HH:MM)")))
}

/// Reminder evaluation for one medicine at one instant
#[derive(Clone, Debug, Serialize)]
pub struct ReminderDecision<'a> {
    pub medicine: &'a Medicine,
    pub is_due_now: bool,
    pub minutes_until_next: u32,
}

/// Entry of today's medicine listing
#[derive(Clone, Debug, Serialize)]
pub struct TodayMedicine<'a> {
    pub medicine: &'a Medicine,
    pub taken_today: bool,
}

// ============================================================================
// Todo Types
// ============================================================================

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        })
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(Error::validation(format!("unknown priority: {other}"))),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Todo {
    pub id: Uuid,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
