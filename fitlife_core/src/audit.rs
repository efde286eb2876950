//! Audit log of generated advice.
//!
//! Only service-generated results are recorded; fallbacks are not.

use crate::journal::Journal;
use crate::{FitnessGoal, MenuAnalysis, Result, Suggestion};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// Destination for audit records
pub trait AuditSink {
    fn record_suggestion(
        &self,
        user_id: Uuid,
        at: DateTime<Utc>,
        suggestion: &Suggestion,
    ) -> Result<()>;

    fn record_menu_analysis(
        &self,
        user_id: Uuid,
        at: DateTime<Utc>,
        menu_text: &str,
        goal: FitnessGoal,
        analysis: &MenuAnalysis,
    ) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuditRecord {
    WorkoutSuggestion {
        suggestion: Suggestion,
    },
    MenuAnalysis {
        menu_text: String,
        goal: FitnessGoal,
        analysis: MenuAnalysis,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub recorded_at: DateTime<Utc>,
    #[serde(flatten)]
    pub record: AuditRecord,
}

/// [`AuditSink`] appending to a JSONL file
pub struct JsonlAuditLog {
    journal: Journal<AuditEntry>,
}

impl JsonlAuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            journal: Journal::new(path),
        }
    }

    pub fn entries(&self) -> Result<Vec<AuditEntry>> {
        self.journal.read_all()
    }

    fn append(&self, user_id: Uuid, at: DateTime<Utc>, record: AuditRecord) -> Result<()> {
        let entry = AuditEntry {
            id: Uuid::new_v4(),
            user_id,
            recorded_at: at,
            record,
        };
        self.journal.append(&entry)?;
        tracing::debug!("Recorded audit entry {}", entry.id);
        Ok(())
    }
}

impl AuditSink for JsonlAuditLog {
    fn record_suggestion(
        &self,
        user_id: Uuid,
        at: DateTime<Utc>,
        suggestion: &Suggestion,
    ) -> Result<()> {
        self.append(
            user_id,
            at,
            AuditRecord::WorkoutSuggestion {
                suggestion: suggestion.clone(),
            },
        )
    }

    fn record_menu_analysis(
        &self,
        user_id: Uuid,
        at: DateTime<Utc>,
        menu_text: &str,
        goal: FitnessGoal,
        analysis: &MenuAnalysis,
    ) -> Result<()> {
        self.append(
            user_id,
            at,
            AuditRecord::MenuAnalysis {
                menu_text: menu_text.to_string(),
                goal,
                analysis: analysis.clone(),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fallback_suggestion;
    use crate::menu::fallback_menu_analysis;
    use crate::MuscleGroup;

    #[test]
    fn test_records_both_kinds() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log = JsonlAuditLog::new(temp_dir.path().join("audit.jsonl"));
        let user_id = Uuid::new_v4();
        let now = Utc::now();

        log.record_suggestion(user_id, now, &fallback_suggestion(MuscleGroup::Back))
            .unwrap();
        log.record_menu_analysis(
            user_id,
            now,
            "oats",
            FitnessGoal::Cutting,
            &fallback_menu_analysis(),
        )
        .unwrap();

        let entries = log.entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.user_id == user_id));
        assert!(matches!(
            &entries[0].record,
            AuditRecord::WorkoutSuggestion { suggestion } if suggestion.muscle_group == MuscleGroup::Back
        ));
        assert!(matches!(
            &entries[1].record,
            AuditRecord::MenuAnalysis { goal: FitnessGoal::Cutting, .. }
        ));
    }

    #[test]
    fn test_entry_line_format() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("audit.jsonl");
        let log = JsonlAuditLog::new(&path);

        log.record_suggestion(Uuid::new_v4(), Utc::now(), &fallback_suggestion(MuscleGroup::Legs))
            .unwrap();

        let line = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(line.trim()).unwrap();
        assert_eq!(value["type"], "workout_suggestion");
        assert_eq!(value["suggestion"]["muscleGroup"], "Legs");
    }
}
