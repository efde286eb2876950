//! CSV export of the workout log.
//!
//! One row per exercise, so a spreadsheet can pivot on any column. The file
//! is written to a temp file next to the destination, synced, then renamed
//! over it; a failed export never leaves a half-written CSV behind.

use crate::{Error, Result, WorkoutRecord};
use std::path::Path;
use tempfile::NamedTempFile;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow<'a> {
    workout_id: String,
    date: String,
    muscle_group: &'static str,
    duration_minutes: u32,
    exercise: &'a str,
    sets: u32,
    reps: u32,
    weight: f64,
}

fn rows(workout: &WorkoutRecord) -> impl Iterator<Item = CsvRow<'_>> {
    let workout_id = workout.id.to_string();
    let date = workout.date.to_rfc3339();

    workout.exercises.iter().map(move |exercise| CsvRow {
        workout_id: workout_id.clone(),
        date: date.clone(),
        muscle_group: workout.muscle_group.as_str(),
        duration_minutes: workout.duration_minutes,
        exercise: &exercise.name,
        sets: exercise.sets,
        reps: exercise.reps,
        weight: exercise.weight,
    })
}

/// Export `workouts` to `csv_path`, replacing any existing file.
///
/// Returns the number of rows written (exercises, not workouts).
pub fn export_workouts_csv(workouts: &[WorkoutRecord], csv_path: &Path) -> Result<usize> {
    let parent = match csv_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => std::env::current_dir()?,
    };
    std::fs::create_dir_all(&parent)?;

    let temp = NamedTempFile::new_in(&parent)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(temp.as_file());

    let mut count = 0;
    for workout in workouts {
        for row in rows(workout) {
            writer.serialize(row)?;
            count += 1;
        }
    }

    if count == 0 {
        // serialize() writes headers lazily; emit them for an empty export.
        writer.write_record([
            "workout_id",
            "date",
            "muscle_group",
            "duration_minutes",
            "exercise",
            "sets",
            "reps",
            "weight",
        ])?;
    }

    writer.flush()?;
    drop(writer);

    temp.as_file().sync_all()?;
    temp.persist(csv_path).map_err(|e| Error::Io(e.error))?;

    tracing::info!(
        "Exported {} exercise rows from {} workouts to {:?}",
        count,
        workouts.len(),
        csv_path
    );
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ExerciseEntry, MuscleGroup};
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn workout(group: MuscleGroup, exercises: Vec<ExerciseEntry>) -> WorkoutRecord {
        WorkoutRecord {
            id: Uuid::new_v4(),
            muscle_group: group,
            date: Utc.with_ymd_and_hms(2024, 3, 1, 18, 30, 0).unwrap(),
            duration_minutes: 50,
            notes: String::new(),
            exercises,
        }
    }

    #[test]
    fn test_one_row_per_exercise() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("out/workouts.csv");

        let workouts = vec![
            workout(
                MuscleGroup::FullBody,
                vec![
                    ExerciseEntry::new("Squats", 4, 10, 185.0),
                    ExerciseEntry::new("Push-ups", 3, 12, 0.0),
                ],
            ),
            workout(MuscleGroup::Core, vec![ExerciseEntry::new("Plank", 3, 1, 0.0)]),
        ];

        let count = export_workouts_csv(&workouts, &csv_path).unwrap();
        assert_eq!(count, 3);

        let mut reader = csv::Reader::from_path(&csv_path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], "workout_id");
        assert_eq!(&headers[7], "weight");

        let records: Vec<_> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 3);
        assert_eq!(&records[0][1], "2024-03-01T18:30:00+00:00");
        assert_eq!(&records[0][2], "Full Body");
        assert_eq!(&records[0][4], "Squats");
        assert_eq!(&records[2][0], workouts[1].id.to_string());
    }

    #[test]
    fn test_export_replaces_existing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("workouts.csv");
        std::fs::write(&csv_path, "stale contents\n").unwrap();

        let count = export_workouts_csv(&[], &csv_path).unwrap();
        assert_eq!(count, 0);

        let contents = std::fs::read_to_string(&csv_path).unwrap();
        assert!(contents.starts_with("workout_id,date,muscle_group"));
        assert!(!contents.contains("stale"));
    }
}
