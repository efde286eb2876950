//! Built-in fallback exercise table.
//!
//! When the generative service cannot produce a suggestion, the engine
//! prescribes a fixed set of four exercises for the least-worked group.
//! Only Chest, Back and Legs have their own entries; every other group
//! resolves to the explicit default group (Chest).

use crate::types::{ExerciseEntry, MuscleGroup};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Group whose exercises are used for any group without its own entry
pub const DEFAULT_FALLBACK_GROUP: MuscleGroup = MuscleGroup::Chest;

/// Cached fallback table - built once and reused across all operations
static FALLBACK_TABLE: Lazy<FallbackTable> = Lazy::new(FallbackTable::build);

/// Immutable mapping from muscle group to its fallback exercises
#[derive(Debug)]
pub struct FallbackTable {
    by_group: HashMap<MuscleGroup, Vec<ExerciseEntry>>,
    default_exercises: Vec<ExerciseEntry>,
}

impl FallbackTable {
    fn build() -> Self {
        let chest = vec![
            ExerciseEntry::new("Push-ups", 3, 12, 0.0),
            ExerciseEntry::new("Bench Press", 4, 8, 135.0),
            ExerciseEntry::new("Incline Dumbbell Press", 3, 10, 60.0),
            ExerciseEntry::new("Chest Flyes", 3, 12, 30.0),
        ];

        let back = vec![
            ExerciseEntry::new("Pull-ups", 4, 6, 0.0),
            ExerciseEntry::new("Bent-over Rows", 4, 8, 95.0),
            ExerciseEntry::new("Lat Pulldowns", 3, 10, 80.0),
            ExerciseEntry::new("Face Pulls", 3, 15, 40.0),
        ];

        let legs = vec![
            ExerciseEntry::new("Squats", 4, 8, 185.0),
            ExerciseEntry::new("Romanian Deadlifts", 3, 10, 135.0),
            ExerciseEntry::new("Leg Press", 3, 12, 270.0),
            ExerciseEntry::new("Calf Raises", 4, 15, 45.0),
        ];

        let mut by_group = HashMap::new();
        by_group.insert(MuscleGroup::Chest, chest.clone());
        by_group.insert(MuscleGroup::Back, back);
        by_group.insert(MuscleGroup::Legs, legs);

        Self {
            by_group,
            default_exercises: chest,
        }
    }

    /// Exercises for `group`, or the default group's exercises when the
    /// group has no entry of its own.
    pub fn exercises_for(&self, group: MuscleGroup) -> &[ExerciseEntry] {
        match self.by_group.get(&group) {
            Some(exercises) => exercises,
            None => {
                tracing::debug!(
                    "No fallback exercises for {}, using {} table",
                    group,
                    DEFAULT_FALLBACK_GROUP
                );
                &self.default_exercises
            }
        }
    }

    /// Whether `group` has its own entry
    pub fn has_entry(&self, group: MuscleGroup) -> bool {
        self.by_group.contains_key(&group)
    }
}

/// Get a reference to the cached fallback table
pub fn fallback_table() -> &'static FallbackTable {
    &FALLBACK_TABLE
}

/// Shorthand for `fallback_table().exercises_for(group)`
pub fn fallback_exercises(group: MuscleGroup) -> &'static [ExerciseEntry] {
    fallback_table().exercises_for(group)
}
