//! Meal-plan analysis against the user's fitness goal.

use crate::decode::decode_menu_analysis;
use crate::llm::{GenerationRequest, TextGenerator};
use crate::prompt::build_menu_prompt;
use crate::types::{Advice, FitnessGoal, MenuAnalysis};

/// Default sampling temperature for menu analysis
pub const DEFAULT_MENU_TEMPERATURE: f32 = 0.3;

/// The fixed analysis returned whenever the service path fails.
pub fn fallback_menu_analysis() -> MenuAnalysis {
    MenuAnalysis {
        score: 70,
        highlights: vec!["Menu uploaded successfully".into()],
        recommendations: vec![
            "Consider adding more protein sources".into(),
            "Include more vegetables".into(),
        ],
        macro_balance: "Analysis pending - please try again".into(),
        calorie_assessment: "Manual review recommended".into(),
        goal_alignment: "Good".into(),
    }
}

/// Analyze a free-text menu for `goal`. Never fails; see [`fallback_menu_analysis`].
pub fn analyze_menu<G: TextGenerator + ?Sized>(
    generator: &G,
    menu_text: &str,
    goal: FitnessGoal,
    temperature: f32,
) -> Advice<MenuAnalysis> {
    let request = GenerationRequest::new(build_menu_prompt(menu_text, goal), temperature);

    let reason = match generator.generate(&request) {
        Ok(text) => match decode_menu_analysis(&text) {
            Ok(analysis) => {
                tracing::info!("Menu analysis for {} goal scored {}", goal, analysis.score);
                return Advice::generated(analysis);
            }
            Err(e) => format!("unusable response: {e}"),
        },
        Err(e) => format!("generation failed: {e}"),
    };

    tracing::warn!("Menu analysis falling back: {}", reason);
    Advice::fallback(fallback_menu_analysis(), reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{ScriptedGenerator, UnavailableGenerator};

    const MENU: &str = "Breakfast: oats, whey\nLunch: chicken, rice, broccoli\nDinner: salmon, potatoes";

    #[test]
    fn test_generated_analysis() {
        let generator = ScriptedGenerator::new().reply(
            r#"{"score": 91, "highlights": ["Lean protein at every meal"],
                "recommendations": ["Add a calorie-dense snack"],
                "macroBalance": "High protein, moderate carbs, low fat",
                "calorieAssessment": "Slightly low for a surplus",
                "goalAlignment": "Excellent"}"#,
        );

        let advice = analyze_menu(&generator, MENU, FitnessGoal::Bulking, DEFAULT_MENU_TEMPERATURE);

        assert!(advice.is_generated());
        assert_eq!(advice.value.score, 91);
        let requests = generator.requests();
        assert!((requests[0].temperature - 0.3).abs() < f32::EPSILON);
        assert!(requests[0].prompt.contains("bulking fitness goal"));
        assert!(requests[0].prompt.contains("salmon, potatoes"));
    }

    #[test]
    fn test_out_of_range_score_forces_fallback() {
        for score in ["120", "-4", "\"ninety\""] {
            let reply = format!(
                r#"{{"score": {score}, "highlights": [], "recommendations": [],
                    "macroBalance": "", "calorieAssessment": "", "goalAlignment": ""}}"#
            );
            let generator = ScriptedGenerator::new().reply(&reply);
            let advice = analyze_menu(&generator, MENU, FitnessGoal::Cutting, 0.3);
            assert!(!advice.is_generated(), "score {score}");
            assert_eq!(advice.value, fallback_menu_analysis());
        }
    }

    #[test]
    fn test_fallback_is_exact() {
        let advice = analyze_menu(
            &UnavailableGenerator::new("offline"),
            MENU,
            FitnessGoal::Maintenance,
            0.3,
        );
        let value = serde_json::to_value(&advice.value).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "score": 70,
                "highlights": ["Menu uploaded successfully"],
                "recommendations": ["Consider adding more protein sources", "Include more vegetables"],
                "macroBalance": "Analysis pending - please try again",
                "calorieAssessment": "Manual review recommended",
                "goalAlignment": "Good"
            })
        );
    }

    #[test]
    fn test_score_always_in_range() {
        let replies = ["not json", "{}", r#"{"score": 100.4}"#];
        for reply in replies {
            let generator = ScriptedGenerator::new().reply(reply);
            let advice = analyze_menu(&generator, MENU, FitnessGoal::Bulking, 0.3);
            assert!(advice.value.score <= 100);
        }
    }
}
