//! Recommendation engine for the next workout.
//!
//! 1. Count how often each muscle group appears in the recent history
//! 2. Pick the least-worked balanced group (leftmost minimum)
//! 3. Ask the generative service for a full suggestion
//! 4. On any failure, prescribe the fixed fallback for the least-worked group

use std::collections::HashMap;

use crate::catalog::fallback_exercises;
use crate::decode::decode_suggestion;
use crate::llm::{GenerationRequest, TextGenerator};
use crate::prompt::build_workout_prompt;
use crate::types::{Advice, MuscleGroup, Suggestion, UserProfile, WorkoutRecord};

/// Default sampling temperature for workout suggestions
pub const DEFAULT_WORKOUT_TEMPERATURE: f32 = 0.7;

const FALLBACK_TIPS: &str = "Focus on proper form and progressive overload.";

/// Occurrences of each muscle group in `history`. Groups that never appear
/// have no entry.
pub fn count_groups(history: &[WorkoutRecord]) -> HashMap<MuscleGroup, usize> {
    let mut counts = HashMap::new();
    for workout in history {
        *counts.entry(workout.muscle_group).or_insert(0) += 1;
    }
    counts
}

/// The balanced group with the fewest occurrences.
///
/// Ties go to the earliest group in [`MuscleGroup::BALANCED`] order
/// (Chest, Back, Shoulders, Arms, Legs, Core). Full-body workouts are
/// counted but never selected.
pub fn least_worked_group(counts: &HashMap<MuscleGroup, usize>) -> MuscleGroup {
    let count_of = |group: &MuscleGroup| counts.get(group).copied().unwrap_or(0);

    MuscleGroup::BALANCED
        .iter()
        .copied()
        .fold(MuscleGroup::BALANCED[0], |min, group| {
            if count_of(&group) < count_of(&min) {
                group
            } else {
                min
            }
        })
}

/// The deterministic suggestion used whenever the service path fails.
pub fn fallback_suggestion(group: MuscleGroup) -> Suggestion {
    Suggestion {
        muscle_group: group,
        reasoning: format!(
            "You haven't worked {} recently. Time to balance your routine!",
            group.as_str().to_lowercase()
        ),
        exercises: fallback_exercises(group).to_vec(),
        tips: Some(FALLBACK_TIPS.to_string()),
    }
}

/// Recommend the next workout.
///
/// `history` is the trailing workout window (newest first). This never
/// fails: generation or decode errors are logged and replaced by
/// [`fallback_suggestion`] for the least-worked group.
pub fn recommend<G: TextGenerator + ?Sized>(
    generator: &G,
    history: &[WorkoutRecord],
    profile: &UserProfile,
    temperature: f32,
) -> Advice<Suggestion> {
    let counts = count_groups(history);
    let least_worked = least_worked_group(&counts);

    tracing::info!(
        "Recommending from {} recent workouts, least worked group: {}",
        history.len(),
        least_worked
    );

    let prompt = build_workout_prompt(profile, history, &counts, least_worked);
    let request = GenerationRequest::new(prompt, temperature);

    let reason = match generator.generate(&request) {
        Ok(text) => match decode_suggestion(&text) {
            Ok(suggestion) => {
                tracing::info!(
                    "Generated suggestion: {} with {} exercises",
                    suggestion.muscle_group,
                    suggestion.exercises.len()
                );
                return Advice::generated(suggestion);
            }
            Err(e) => format!("unusable response: {e}"),
        },
        Err(e) => format!("generation failed: {e}"),
    };

    tracing::warn!("Workout suggestion falling back to {}: {}", least_worked, reason);
    Advice::fallback(fallback_suggestion(least_worked), reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{ScriptedGenerator, UnavailableGenerator};
    use crate::types::{AdviceSource, ExerciseEntry, FitnessGoal};
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn workout(group: MuscleGroup, days_ago: i64) -> WorkoutRecord {
        WorkoutRecord {
            id: Uuid::new_v4(),
            muscle_group: group,
            date: Utc::now() - Duration::days(days_ago),
            duration_minutes: 45,
            notes: String::new(),
            exercises: vec![ExerciseEntry::new("Something", 3, 10, 50.0)],
        }
    }

    fn history_of(groups: &[(MuscleGroup, usize)]) -> Vec<WorkoutRecord> {
        groups
            .iter()
            .flat_map(|(group, n)| (0..*n).map(move |i| workout(*group, i as i64)))
            .collect()
    }

    fn profile() -> UserProfile {
        UserProfile {
            fitness_goal: FitnessGoal::Bulking,
            weight_kg: Some(70.5),
            height_cm: Some(175.0),
            age: Some(25),
            ..UserProfile::default()
        }
    }

    #[test]
    fn test_equal_counts_select_chest() {
        assert_eq!(least_worked_group(&HashMap::new()), MuscleGroup::Chest);

        let history = history_of(&[
            (MuscleGroup::Chest, 2),
            (MuscleGroup::Back, 2),
            (MuscleGroup::Shoulders, 2),
            (MuscleGroup::Arms, 2),
            (MuscleGroup::Legs, 2),
            (MuscleGroup::Core, 2),
        ]);
        assert_eq!(least_worked_group(&count_groups(&history)), MuscleGroup::Chest);
    }

    #[test]
    fn test_leftmost_minimum_wins() {
        let history = history_of(&[(MuscleGroup::Chest, 3), (MuscleGroup::Back, 1)]);
        assert_eq!(
            least_worked_group(&count_groups(&history)),
            MuscleGroup::Shoulders
        );

        let history = history_of(&[
            (MuscleGroup::Chest, 1),
            (MuscleGroup::Back, 1),
            (MuscleGroup::Shoulders, 1),
            (MuscleGroup::Arms, 1),
            (MuscleGroup::Core, 1),
        ]);
        assert_eq!(least_worked_group(&count_groups(&history)), MuscleGroup::Legs);
    }

    #[test]
    fn test_full_body_is_never_selected() {
        // Full Body is the least logged group overall
        let history = history_of(&[
            (MuscleGroup::FullBody, 1),
            (MuscleGroup::Chest, 2),
            (MuscleGroup::Back, 2),
            (MuscleGroup::Shoulders, 2),
            (MuscleGroup::Arms, 2),
            (MuscleGroup::Legs, 2),
            (MuscleGroup::Core, 3),
        ]);
        let counts = count_groups(&history);
        assert_eq!(counts.get(&MuscleGroup::FullBody), Some(&1));

        let least = least_worked_group(&counts);
        assert_eq!(least, MuscleGroup::Chest);
        assert!(MuscleGroup::BALANCED.contains(&least));

        // Still reported in the frequency line
        let prompt = crate::prompt::build_workout_prompt(&profile(), &history, &counts, least);
        assert!(prompt.contains("Full Body: 1 times"));
    }

    #[test]
    fn test_malformed_response_returns_exact_fallback() {
        crate::logging::init_test();
        let generator = ScriptedGenerator::new().reply("Here's a great workout: do squats!");
        let history = history_of(&[(MuscleGroup::Chest, 3), (MuscleGroup::Back, 1)]);

        let advice = recommend(&generator, &history, &profile(), DEFAULT_WORKOUT_TEMPERATURE);

        assert!(matches!(advice.source, AdviceSource::Fallback { .. }));
        let expected = Suggestion {
            muscle_group: MuscleGroup::Shoulders,
            reasoning: "You haven't worked shoulders recently. Time to balance your routine!"
                .into(),
            exercises: vec![
                ExerciseEntry::new("Push-ups", 3, 12, 0.0),
                ExerciseEntry::new("Bench Press", 4, 8, 135.0),
                ExerciseEntry::new("Incline Dumbbell Press", 3, 10, 60.0),
                ExerciseEntry::new("Chest Flyes", 3, 12, 30.0),
            ],
            tips: Some("Focus on proper form and progressive overload.".into()),
        };
        assert_eq!(advice.value, expected);
    }

    #[test]
    fn test_fallback_uses_group_table_when_present() {
        let history = history_of(&[
            (MuscleGroup::Chest, 2),
            (MuscleGroup::Back, 2),
            (MuscleGroup::Shoulders, 2),
            (MuscleGroup::Arms, 2),
            (MuscleGroup::Core, 2),
        ]);
        let advice = recommend(
            &UnavailableGenerator::new("offline"),
            &history,
            &profile(),
            DEFAULT_WORKOUT_TEMPERATURE,
        );
        assert_eq!(advice.value.muscle_group, MuscleGroup::Legs);
        assert_eq!(advice.value.exercises[0].name, "Squats");
        assert_eq!(
            advice.value.reasoning,
            "You haven't worked legs recently. Time to balance your routine!"
        );
    }

    #[test]
    fn test_generated_suggestion_is_returned() {
        let generator = ScriptedGenerator::new().reply(
            r#"{"muscleGroup": "Back", "reasoning": "Back is lagging.",
                "exercises": [
                    {"name": "Deadlift", "sets": 5, "reps": 5, "weight": 225},
                    {"name": "Pull-ups", "sets": 4, "reps": 8, "weight": 0},
                    {"name": "Seated Row", "sets": 3, "reps": 12, "weight": 120},
                    {"name": "Face Pulls", "sets": 3, "reps": 15, "weight": 40}
                ],
                "tips": "Brace before each pull."}"#,
        );

        let advice = recommend(&generator, &[], &profile(), 0.7);

        assert!(advice.is_generated());
        assert_eq!(advice.value.muscle_group, MuscleGroup::Back);
        assert_eq!(advice.value.exercises.len(), 4);

        let requests = generator.requests();
        assert_eq!(requests.len(), 1);
        assert!((requests[0].temperature - 0.7).abs() < f32::EPSILON);
        assert!(requests[0].prompt.contains("Least worked muscle group: Chest"));
    }

    #[test]
    fn test_always_returns_exercises() {
        let replies = [
            "",
            "{}",
            r#"{"muscleGroup": "Chest", "reasoning": "r", "exercises": []}"#,
            "null",
        ];
        for reply in replies {
            let generator = ScriptedGenerator::new().reply(reply);
            let advice = recommend(&generator, &[], &profile(), 0.7);
            assert!(!advice.value.exercises.is_empty(), "reply {reply:?}");
            assert!(!advice.is_generated());
        }

        let generator = ScriptedGenerator::new().fail("connection reset");
        let advice = recommend(&generator, &[], &profile(), 0.7);
        assert!(!advice.value.exercises.is_empty());
        match advice.source {
            AdviceSource::Fallback { reason } => assert!(reason.contains("connection reset")),
            AdviceSource::Generated => panic!("expected fallback"),
        }
    }
}
