//! Prompt builders for the two generative entry points.

use std::collections::HashMap;

use crate::types::{ExerciseEntry, FitnessGoal, MuscleGroup, UserProfile, WorkoutRecord};

pub fn build_workout_prompt(
    profile: &UserProfile,
    history: &[WorkoutRecord],
    counts: &HashMap<MuscleGroup, usize>,
    least_worked: MuscleGroup,
) -> String {
    format!(
        r#"You are a professional fitness trainer AI. Analyze this user's workout history and provide a personalized workout recommendation.

User Profile:
- Fitness Goal: {goal}
- Weight: {weight}
- Height: {height}
- Age: {age}

Recent Workouts (last 14 days):
{history}
Muscle Group Frequency:
{frequency}

Least worked muscle group: {least_worked}

Please provide:
1. Recommended muscle group for today (one of: Chest, Back, Shoulders, Arms, Legs, Core, Full Body)
2. 4-5 specific exercises with sets, reps, and suggested weights
3. Brief reasoning for this recommendation
4. Any form tips or safety notes

Respond with a single JSON object and nothing else:
{{
  "muscleGroup": "...",
  "reasoning": "...",
  "exercises": [
    {{"name": "...", "sets": 4, "reps": 8, "weight": 135}}
  ],
  "tips": "..."
}}"#,
        goal = profile.fitness_goal,
        weight = format_measure(profile.weight_kg, "kg"),
        height = format_measure(profile.height_cm, "cm"),
        age = profile
            .age
            .map(|age| age.to_string())
            .unwrap_or_else(|| "not set".to_string()),
        history = format_history(history),
        frequency = format_frequency(counts),
        least_worked = least_worked,
    )
}

pub fn build_menu_prompt(menu_text: &str, goal: FitnessGoal) -> String {
    format!(
        r#"You are a nutrition expert AI. Analyze this meal menu for someone with a {goal} fitness goal.

Menu:
{menu}

Fitness Goal: {goal}

Please analyze this menu and provide:
1. Overall score (0-100) for alignment with the fitness goal
2. Specific highlights (what's good)
3. Recommendations for improvement
4. Macro balance assessment
5. Calorie density evaluation

Consider:
- For bulking: Need calorie surplus, high protein, complex carbs
- For cutting: Need calorie deficit, very high protein, low processed foods
- For maintenance: Balanced macros, moderate calories

Respond with a single JSON object and nothing else:
{{
  "score": 85,
  "highlights": ["Good protein sources", "Complex carbs present"],
  "recommendations": ["Add more vegetables", "Reduce fried foods"],
  "macroBalance": "Good protein, moderate carbs, high fats",
  "calorieAssessment": "Moderate calorie density, suitable for maintenance",
  "goalAlignment": "Excellent"
}}"#,
        goal = goal,
        menu = menu_text.trim(),
    )
}

fn format_measure(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(value) => format!("{value}{unit}"),
        None => "not set".to_string(),
    }
}

fn format_history(history: &[WorkoutRecord]) -> String {
    if history.is_empty() {
        return "- No workouts logged\n".to_string();
    }

    history
        .iter()
        .map(|workout| {
            format!(
                "- {} on {}\n  Exercises: {}\n",
                workout.muscle_group,
                workout.date.format("%Y-%m-%d"),
                format_exercises(&workout.exercises)
            )
        })
        .collect()
}

fn format_exercises(exercises: &[ExerciseEntry]) -> String {
    exercises
        .iter()
        .map(|e| format!("{} ({}x{} @ {}lbs)", e.name, e.sets, e.reps, e.weight))
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_frequency(counts: &HashMap<MuscleGroup, usize>) -> String {
    MuscleGroup::ALL
        .iter()
        .map(|group| format!("{}: {} times", group, counts.get(group).copied().unwrap_or(0)))
        .collect::<Vec<_>>()
        .join(", ")
}
