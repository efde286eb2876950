//! Append-only JSONL journals.
//!
//! Records are appended one JSON document per line, under an exclusive
//! file lock, so concurrent CLI invocations never interleave partial lines.
//! Used for the workout log and the AI audit log.

use crate::Result;
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// A JSONL file holding records of type `T`
pub struct Journal<T> {
    path: PathBuf,
    _record: PhantomData<fn() -> T>,
}

impl<T> Journal<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure the parent directory exists
    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

/// Whether `file` is empty or ends with a newline
fn ends_with_newline(mut file: &File) -> Result<bool> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(true);
    }
    file.seek(SeekFrom::Start(len - 1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

impl<T: Serialize> Journal<T> {
    /// Append one record as a JSON line
    pub fn append(&self, record: &T) -> Result<()> {
        self.ensure_parent_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)?;

        file.lock_exclusive()?;

        // Serialize the whole line first so a failure writes nothing.
        let mut line = String::new();
        if !ends_with_newline(&file)? {
            // Previous write was cut off; keep it from swallowing this record.
            line.push('\n');
        }
        line.push_str(&serde_json::to_string(record)?);
        line.push('\n');

        let mut writer = std::io::BufWriter::new(&file);
        writer.write_all(line.as_bytes())?;
        writer.flush()?;
        drop(writer);

        file.unlock()?;

        tracing::debug!("Appended record to {:?}", self.path);
        Ok(())
    }
}

impl<T: DeserializeOwned> Journal<T> {
    /// Read every record. A missing file is an empty journal; lines that do
    /// not parse are logged and skipped.
    pub fn read_all(&self) -> Result<Vec<T>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        file.lock_shared()?;

        let reader = BufReader::new(&file);
        let mut records = Vec::new();

        // Split on raw bytes: a line cut off inside a multi-byte character
        // is skipped like any other unreadable line.
        for (line_num, line_result) in reader.split(b'\n').enumerate() {
            let line = line_result?;
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }

            match serde_json::from_slice::<T>(&line) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!(
                        "Skipping unreadable record in {:?} at line {}: {}",
                        self.path,
                        line_num + 1,
                        e
                    );
                }
            }
        }

        file.unlock()?;
        tracing::debug!("Read {} records from {:?}", records.len(), self.path);
        Ok(records)
    }
}
