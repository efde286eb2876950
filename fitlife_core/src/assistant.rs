//! The assistant wires the data store, generative service, clock and audit
//! log together behind the user-facing operations.
//!
//! Generated results are written to the audit log; an audit failure is
//! logged and never fails the operation itself.

use crate::audit::AuditSink;
use crate::clock::Clock;
use crate::config::Config;
use crate::engine::{recommend, DEFAULT_WORKOUT_TEMPERATURE};
use crate::llm::TextGenerator;
use crate::menu::DEFAULT_MENU_TEMPERATURE;
use crate::reminder;
use crate::store::FitnessStore;
use crate::types::{
    Advice, FitnessGoal, Medicine, MenuAnalysis, NewWorkout, ReminderDecision, Suggestion,
    WorkoutRecord,
};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Duration logged for an accepted suggestion
pub const ACCEPTED_WORKOUT_MINUTES: u32 = 60;
const ACCEPTED_WORKOUT_NOTES: &str = "AI Suggested Workout";

/// Tunables the assistant takes from [`Config`]
#[derive(Debug, Clone, PartialEq)]
pub struct AssistantSettings {
    pub window_days: i64,
    pub max_records: usize,
    pub workout_temperature: f32,
    pub menu_temperature: f32,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            window_days: 14,
            max_records: 10,
            workout_temperature: DEFAULT_WORKOUT_TEMPERATURE,
            menu_temperature: DEFAULT_MENU_TEMPERATURE,
        }
    }
}

impl From<&Config> for AssistantSettings {
    fn from(config: &Config) -> Self {
        Self {
            window_days: config.history.window_days,
            max_records: config.history.max_records,
            workout_temperature: config.ai.workout_temperature,
            menu_temperature: config.ai.menu_temperature,
        }
    }
}

/// Owned reminder decision, detached from the medicine list it was computed on
#[derive(Debug, Clone, Serialize)]
pub struct Reminder {
    pub medicine: Medicine,
    pub is_due_now: bool,
    pub minutes_until_next: u32,
}

impl From<ReminderDecision<'_>> for Reminder {
    fn from(decision: ReminderDecision<'_>) -> Self {
        Self {
            medicine: decision.medicine.clone(),
            is_due_now: decision.is_due_now,
            minutes_until_next: decision.minutes_until_next,
        }
    }
}

pub struct Assistant<S, G, C, A> {
    store: S,
    generator: G,
    clock: C,
    audit: A,
    settings: AssistantSettings,
}

impl<S, G, C, A> Assistant<S, G, C, A>
where
    S: FitnessStore,
    G: TextGenerator,
    C: Clock,
    A: AuditSink,
{
    pub fn new(store: S, generator: G, clock: C, audit: A, settings: AssistantSettings) -> Self {
        Self {
            store,
            generator,
            clock,
            audit,
            settings,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    fn now_utc(&self) -> DateTime<Utc> {
        self.clock.now().with_timezone(&Utc)
    }

    /// Suggest the next workout from the trailing history window.
    pub fn suggest_workout(&self) -> Result<Advice<Suggestion>> {
        let now = self.now_utc();
        let profile = self.store.profile()?;
        let history = self.store.recent_workouts(
            now,
            self.settings.window_days,
            self.settings.max_records,
        )?;

        let advice = recommend(
            &self.generator,
            &history,
            &profile,
            self.settings.workout_temperature,
        );

        if advice.is_generated() {
            if let Err(e) = self
                .audit
                .record_suggestion(profile.user_id, now, &advice.value)
            {
                tracing::warn!("Failed to record suggestion in audit log: {}", e);
            }
        }

        Ok(advice)
    }

    /// Analyze a meal plan. `goal` defaults to the profile's goal.
    pub fn analyze_menu(
        &self,
        menu_text: &str,
        goal: Option<FitnessGoal>,
    ) -> Result<Advice<MenuAnalysis>> {
        let menu_text = menu_text.trim();
        if menu_text.is_empty() {
            return Err(Error::validation("menu text is required"));
        }

        let profile = self.store.profile()?;
        let goal = goal.unwrap_or(profile.fitness_goal);

        let advice = crate::menu::analyze_menu(
            &self.generator,
            menu_text,
            goal,
            self.settings.menu_temperature,
        );

        if advice.is_generated() {
            if let Err(e) = self.audit.record_menu_analysis(
                profile.user_id,
                self.now_utc(),
                menu_text,
                goal,
                &advice.value,
            ) {
                tracing::warn!("Failed to record menu analysis in audit log: {}", e);
            }
        }

        Ok(advice)
    }

    /// Log a suggestion as a completed workout.
    pub fn accept_suggestion(&self, suggestion: &Suggestion) -> Result<WorkoutRecord> {
        let workout = NewWorkout {
            muscle_group: suggestion.muscle_group,
            duration_minutes: ACCEPTED_WORKOUT_MINUTES,
            notes: ACCEPTED_WORKOUT_NOTES.to_string(),
            exercises: suggestion.exercises.clone(),
        };
        self.store.log_workout(workout, self.now_utc())
    }

    /// Daily medicines due right now.
    pub fn due_reminders(&self) -> Result<Vec<Reminder>> {
        let medicines = self.store.medicines()?;
        let now = self.clock.now();
        Ok(reminder::due_reminders(&medicines, &now)
            .into_iter()
            .filter(|d| d.is_due_now)
            .map(Reminder::from)
            .collect())
    }

    /// The next `limit` daily medicines, soonest first.
    pub fn upcoming_reminders(&self, limit: usize) -> Result<Vec<Reminder>> {
        let medicines = self.store.medicines()?;
        let now = self.clock.now();
        Ok(reminder::upcoming(&medicines, &now, limit)
            .into_iter()
            .map(Reminder::from)
            .collect())
    }
}
