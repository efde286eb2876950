//! Strict decoding of generative-service output.
//!
//! Service text is untrusted. Each decoder either returns a fully validated
//! value or a [`DecodeError`]; there are no partial results.

use serde::Deserialize;

use crate::types::{ExerciseEntry, MenuAnalysis, MuscleGroup, Suggestion};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DecodeError {
    #[error("response is empty")]
    Empty,

    /// Not JSON, or JSON that does not match the expected schema
    #[error("response does not match schema: {0}")]
    Schema(String),

    /// Well-formed JSON with out-of-range or otherwise invalid values
    #[error("invalid field `{field}`: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSuggestion {
    muscle_group: String,
    reasoning: String,
    exercises: Vec<RawExercise>,
    #[serde(default)]
    tips: Option<String>,
}

#[derive(Deserialize)]
struct RawExercise {
    name: String,
    sets: u32,
    reps: u32,
    weight: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMenuAnalysis {
    score: f64,
    highlights: Vec<String>,
    recommendations: Vec<String>,
    macro_balance: String,
    calorie_assessment: String,
    goal_alignment: String,
}

/// Remove a single Markdown code fence wrapping the whole response, if any.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening line.
    match body.split_once('\n') {
        Some((info, inner)) if !info.trim_start().starts_with('{') => inner.trim(),
        _ => body.trim(),
    }
}

fn parse_object<'a, T: Deserialize<'a>>(text: &'a str) -> Result<T, DecodeError> {
    let payload = strip_code_fence(text);
    if payload.is_empty() {
        return Err(DecodeError::Empty);
    }
    serde_json::from_str(payload).map_err(|e| DecodeError::Schema(e.to_string()))
}

/// Decode a workout suggestion. Requires a known muscle group and a
/// non-empty list of valid exercises.
pub fn decode_suggestion(text: &str) -> Result<Suggestion, DecodeError> {
    let raw: RawSuggestion = parse_object(text)?;

    let muscle_group: MuscleGroup =
        raw.muscle_group
            .parse()
            .map_err(|_| DecodeError::InvalidField {
                field: "muscleGroup",
                reason: format!("unknown muscle group {:?}", raw.muscle_group),
            })?;

    if raw.exercises.is_empty() {
        return Err(DecodeError::InvalidField {
            field: "exercises",
            reason: "must contain at least one exercise".into(),
        });
    }

    let exercises = raw
        .exercises
        .into_iter()
        .map(|e| {
            let entry = ExerciseEntry::new(e.name, e.sets, e.reps, e.weight);
            entry
                .validate()
                .map(|_| entry)
                .map_err(|err| DecodeError::InvalidField {
                    field: "exercises",
                    reason: err.to_string(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Suggestion {
        muscle_group,
        reasoning: raw.reasoning,
        exercises,
        tips: raw.tips.filter(|tips| !tips.trim().is_empty()),
    })
}

/// Decode a menu analysis. The score must be a finite number in [0, 100];
/// fractional scores are rounded.
pub fn decode_menu_analysis(text: &str) -> Result<MenuAnalysis, DecodeError> {
    let raw: RawMenuAnalysis = parse_object(text)?;

    if !raw.score.is_finite() || !(0.0..=100.0).contains(&raw.score) {
        return Err(DecodeError::InvalidField {
            field: "score",
            reason: format!("{} is outside 0-100", raw.score),
        });
    }

    Ok(MenuAnalysis {
        score: raw.score.round() as u8,
        highlights: raw.highlights,
        recommendations: raw.recommendations,
        macro_balance: raw.macro_balance,
        calorie_assessment: raw.calorie_assessment,
        goal_alignment: raw.goal_alignment,
    })
}
