//! File-backed data store.
//!
//! Layout under the data directory:
//! - `profile.json`, `medicines.json`, `todos.json`: JSON documents, saved
//!   atomically (temp file + rename); writers are serialized through an
//!   exclusive lock on a sibling `<name>.lock` file
//! - `workouts.jsonl`: append-only workout journal
//!
//! [`FitnessStore`] is the data-access interface the assistant depends on,
//! so the engine and evaluator can be driven without touching disk.

use crate::journal::Journal;
use crate::{
    Error, Medicine, NewMedicine, NewWorkout, Priority, Result, Todo, UserProfile, WorkoutRecord,
};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

pub trait FitnessStore {
    /// The local profile, created with defaults on first access
    fn profile(&self) -> Result<UserProfile>;
    fn save_profile(&self, profile: &UserProfile) -> Result<()>;

    /// Workouts from the `days` days before `now`, newest first, at most `limit`
    fn recent_workouts(&self, now: DateTime<Utc>, days: i64, limit: usize)
        -> Result<Vec<WorkoutRecord>>;
    /// Every logged workout, newest first
    fn workouts(&self) -> Result<Vec<WorkoutRecord>>;
    fn log_workout(&self, workout: NewWorkout, at: DateTime<Utc>) -> Result<WorkoutRecord>;

    /// Medicines ordered by scheduled time
    fn medicines(&self) -> Result<Vec<Medicine>>;
    fn add_medicine(&self, medicine: NewMedicine, at: DateTime<Utc>) -> Result<Medicine>;
    fn mark_medicine_taken(&self, id: Uuid, at: DateTime<Utc>) -> Result<Medicine>;
    fn delete_medicine(&self, id: Uuid) -> Result<Medicine>;

    /// Todos, newest first
    fn todos(&self) -> Result<Vec<Todo>>;
    fn add_todo(&self, text: &str, priority: Priority, at: DateTime<Utc>) -> Result<Todo>;
    fn set_todo_completed(&self, id: Uuid, completed: bool, at: DateTime<Utc>) -> Result<Todo>;
    fn delete_todo(&self, id: Uuid) -> Result<Todo>;
}

// ============================================================================
// JSON documents
// ============================================================================

/// Load a JSON document with shared locking. A missing file yields `None`.
fn load_document<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let mut contents = String::new();
    let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
    file.unlock()?;
    read?;

    match serde_json::from_str(&contents) {
        Ok(document) => {
            tracing::debug!("Loaded {:?}", path);
            Ok(Some(document))
        }
        Err(e) => {
            // Refuse to continue: a later save would overwrite the user's data.
            tracing::warn!("Failed to parse {:?}: {}", path, e);
            Err(Error::Json(e))
        }
    }
}

/// Save a JSON document atomically:
/// 1. Write to a temp file in the same directory
/// 2. Sync to disk
/// 3. Rename over the original
fn save_document<T: Serialize>(path: &Path, document: &T) -> Result<()> {
    let parent = path.parent().ok_or_else(|| {
        Error::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "document path missing parent",
        ))
    })?;
    std::fs::create_dir_all(parent)?;

    let temp = NamedTempFile::new_in(parent)?;

    {
        let mut writer = std::io::BufWriter::new(temp.as_file());
        serde_json::to_writer_pretty(&mut writer, document)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    }

    temp.as_file().sync_all()?;

    temp.persist(path).map_err(|e| Error::Io(e.error))?;

    tracing::debug!("Saved {:?}", path);
    Ok(())
}

/// Exclusive lock on `<document>.lock`, held across a whole
/// load-modify-save. The document itself is replaced by rename on every
/// save, so it cannot carry the writer lock.
struct DocumentLock {
    file: File,
}

impl DocumentLock {
    fn acquire(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut lock_path = path.as_os_str().to_owned();
        lock_path.push(".lock");

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(PathBuf::from(lock_path))?;
        file.lock_exclusive()?;

        Ok(Self { file })
    }
}

impl Drop for DocumentLock {
    fn drop(&mut self) {
        if let Err(e) = self.file.unlock() {
            tracing::warn!("Failed to release document lock: {}", e);
        }
    }
}

/// Load a list document, apply `f`, save it back, and return `f`'s result.
/// Concurrent writers to the same document are serialized.
fn update_list<T, R, F>(path: &Path, f: F) -> Result<R>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce(&mut Vec<T>) -> Result<R>,
{
    let _lock = DocumentLock::acquire(path)?;
    let mut items: Vec<T> = load_document(path)?.unwrap_or_default();
    let result = f(&mut items)?;
    save_document(path, &items)?;
    Ok(result)
}

/// Resolve a full id or a unique id prefix (as shown by list commands).
pub fn resolve_id<T>(
    items: &[T],
    id_of: impl Fn(&T) -> Uuid,
    needle: &str,
    kind: &'static str,
) -> Result<Uuid> {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return Err(Error::validation(format!("{kind} id is required")));
    }

    let matches: Vec<Uuid> = items
        .iter()
        .map(&id_of)
        .filter(|id| id.to_string().starts_with(&needle))
        .collect();

    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(Error::not_found(kind, needle)),
        _ => Err(Error::validation(format!(
            "{kind} id prefix {needle:?} is ambiguous ({} matches)",
            matches.len()
        ))),
    }
}

// ============================================================================
// FileStore
// ============================================================================

/// [`FitnessStore`] over a data directory
pub struct FileStore {
    data_dir: PathBuf,
    workouts: Journal<WorkoutRecord>,
}

impl FileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        let workouts = Journal::new(data_dir.join("workouts.jsonl"));
        Self { data_dir, workouts }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn profile_path(&self) -> PathBuf {
        self.data_dir.join("profile.json")
    }

    fn medicines_path(&self) -> PathBuf {
        self.data_dir.join("medicines.json")
    }

    fn todos_path(&self) -> PathBuf {
        self.data_dir.join("todos.json")
    }
}

impl FitnessStore for FileStore {
    fn profile(&self) -> Result<UserProfile> {
        let path = self.profile_path();
        if let Some(profile) = load_document(&path)? {
            return Ok(profile);
        }

        // Re-check under the lock: another process may have created it.
        let _lock = DocumentLock::acquire(&path)?;
        match load_document(&path)? {
            Some(profile) => Ok(profile),
            None => {
                let profile = UserProfile::default();
                save_document(&path, &profile)?;
                tracing::info!("Created new profile {}", profile.user_id);
                Ok(profile)
            }
        }
    }

    fn save_profile(&self, profile: &UserProfile) -> Result<()> {
        let path = self.profile_path();
        let _lock = DocumentLock::acquire(&path)?;
        save_document(&path, profile)
    }

    fn recent_workouts(
        &self,
        now: DateTime<Utc>,
        days: i64,
        limit: usize,
    ) -> Result<Vec<WorkoutRecord>> {
        crate::history::load_recent_workouts(&self.workouts, now, days, limit)
    }

    fn workouts(&self) -> Result<Vec<WorkoutRecord>> {
        let mut workouts = self.workouts.read_all()?;
        workouts.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(workouts)
    }

    fn log_workout(&self, workout: NewWorkout, at: DateTime<Utc>) -> Result<WorkoutRecord> {
        workout.validate()?;

        let record = WorkoutRecord {
            id: Uuid::new_v4(),
            muscle_group: workout.muscle_group,
            date: at,
            duration_minutes: workout.duration_minutes,
            notes: workout.notes.trim().to_string(),
            exercises: workout.exercises,
        };
        self.workouts.append(&record)?;

        tracing::info!(
            "Logged {} workout {} with {} exercises",
            record.muscle_group,
            record.id,
            record.exercises.len()
        );
        Ok(record)
    }

    fn medicines(&self) -> Result<Vec<Medicine>> {
        let mut medicines: Vec<Medicine> =
            load_document(&self.medicines_path())?.unwrap_or_default();
        medicines.sort_by_key(|m| m.scheduled_time);
        Ok(medicines)
    }

    fn add_medicine(&self, medicine: NewMedicine, at: DateTime<Utc>) -> Result<Medicine> {
        medicine.validate()?;

        let record = Medicine {
            id: Uuid::new_v4(),
            name: medicine.name.trim().to_string(),
            dosage: medicine.dosage.trim().to_string(),
            scheduled_time: medicine.scheduled_time,
            frequency: medicine.frequency,
            notes: medicine.notes.trim().to_string(),
            last_taken_at: None,
            created_at: at,
        };

        update_list(&self.medicines_path(), |medicines: &mut Vec<Medicine>| {
            medicines.push(record.clone());
            Ok(())
        })?;

        tracing::info!("Added medicine {} ({})", record.name, record.id);
        Ok(record)
    }

    fn mark_medicine_taken(&self, id: Uuid, at: DateTime<Utc>) -> Result<Medicine> {
        update_list(&self.medicines_path(), |medicines: &mut Vec<Medicine>| {
            let medicine = medicines
                .iter_mut()
                .find(|m| m.id == id)
                .ok_or_else(|| Error::not_found("medicine", id))?;
            medicine.last_taken_at = Some(at);
            tracing::info!("Marked {} taken at {}", medicine.name, at);
            Ok(medicine.clone())
        })
    }

    fn delete_medicine(&self, id: Uuid) -> Result<Medicine> {
        update_list(&self.medicines_path(), |medicines: &mut Vec<Medicine>| {
            let index = medicines
                .iter()
                .position(|m| m.id == id)
                .ok_or_else(|| Error::not_found("medicine", id))?;
            Ok(medicines.remove(index))
        })
    }

    fn todos(&self) -> Result<Vec<Todo>> {
        let mut todos: Vec<Todo> = load_document(&self.todos_path())?.unwrap_or_default();
        todos.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(todos)
    }

    fn add_todo(&self, text: &str, priority: Priority, at: DateTime<Utc>) -> Result<Todo> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::validation("text is required"));
        }

        let todo = Todo {
            id: Uuid::new_v4(),
            text: text.to_string(),
            completed: false,
            priority,
            created_at: at,
            updated_at: at,
        };

        update_list(&self.todos_path(), |todos: &mut Vec<Todo>| {
            todos.push(todo.clone());
            Ok(())
        })?;
        Ok(todo)
    }

    fn set_todo_completed(&self, id: Uuid, completed: bool, at: DateTime<Utc>) -> Result<Todo> {
        update_list(&self.todos_path(), |todos: &mut Vec<Todo>| {
            let todo = todos
                .iter_mut()
                .find(|t| t.id == id)
                .ok_or_else(|| Error::not_found("todo", id))?;
            todo.completed = completed;
            todo.updated_at = at;
            Ok(todo.clone())
        })
    }

    fn delete_todo(&self, id: Uuid) -> Result<Todo> {
        update_list(&self.todos_path(), |todos: &mut Vec<Todo>| {
            let index = todos
                .iter()
                .position(|t| t.id == id)
                .ok_or_else(|| Error::not_found("todo", id))?;
            Ok(todos.remove(index))
        })
    }
}
