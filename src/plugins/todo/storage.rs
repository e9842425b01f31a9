use super::types::TodoRecord;
use crate::shared::errors::StorageError;
use crate::shared::paths::{atomic_write, ARCHIVE_FILE_NAME, TODOS_FILE_NAME};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use uuid::Uuid;

// ============================================================================
// File Locations
// ============================================================================

/// The pair of files backing a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoFiles {
    pub todos: PathBuf,
    pub archive: PathBuf,
}

impl TodoFiles {
    /// `todos.json` and `archive.json` inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            todos: dir.join(TODOS_FILE_NAME),
            archive: dir.join(ARCHIVE_FILE_NAME),
        }
    }
}

// ============================================================================
// Codec
// ============================================================================

pub fn encode_records(records: &[TodoRecord]) -> Result<String, StorageError> {
    Ok(serde_json::to_string_pretty(records)?)
}

pub fn decode_records(path: &Path, content: &str) -> Result<Vec<TodoRecord>, StorageError> {
    serde_json::from_str(content).map_err(|e| StorageError::parse(path, e))
}

// ============================================================================
// Reading
// ============================================================================

/// Reads a record file, keeping not-found and decode failures distinct.
pub fn read_records(path: &Path) -> Result<Vec<TodoRecord>, StorageError> {
    let content = std::fs::read_to_string(path).map_err(|e| StorageError::read(path, e))?;
    decode_records(path, &content)
}

/// Reads a record file, treating any failure as "no data yet".
///
/// The file itself is never touched here, so a corrupt file survives until the
/// next successful save.
pub fn load_records(path: &Path) -> Vec<TodoRecord> {
    match read_records(path) {
        Ok(records) => {
            tracing::debug!(
                target: "todo::storage",
                path = %path.display(),
                count = records.len(),
                "Loaded records"
            );
            records
        }
        Err(e) if e.is_not_found() => {
            tracing::info!(
                target: "todo::storage",
                path = %path.display(),
                "No data file yet, starting empty"
            );
            Vec::new()
        }
        Err(e) => {
            tracing::warn!(target: "todo::storage", "Loading error, starting empty: {}", e);
            Vec::new()
        }
    }
}

// ============================================================================
// Writing
// ============================================================================

/// Replaces `path` with the encoded records.
pub fn write_records(path: &Path, records: &[TodoRecord]) -> Result<(), StorageError> {
    let content = encode_records(records)?;
    atomic_write(path, &content)
}

/// First `archive.json.bak`, `archive.json-1.bak`, ... path that does not exist yet.
fn unused_backup_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let base = path.with_file_name(format!("{}.bak", name));
    if !base.exists() {
        return base;
    }

    let mut counter = 1;
    loop {
        let candidate = path.with_file_name(format!("{}-{}.bak", name, counter));
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

/// Copies an unreadable archive aside. Earlier backups are never overwritten.
fn back_up_unreadable(path: &Path) {
    let backup_path = unused_backup_path(path);
    match std::fs::copy(path, &backup_path) {
        Ok(_) => tracing::info!(
            target: "todo::storage",
            "Unreadable archive backed up to {:?}",
            backup_path
        ),
        Err(e) => tracing::warn!(
            target: "todo::storage",
            "Could not back up unreadable archive: {}",
            e
        ),
    }
}

/// Appends `records` to the archive file and writes it back.
///
/// A missing or corrupt archive counts as an empty prior archive. Records whose
/// id is already archived are skipped, so archiving the same records twice
/// leaves a single copy. Returns the total number of records now in the archive.
pub fn append_to_archive(path: &Path, records: &[TodoRecord]) -> Result<usize, StorageError> {
    let mut archived = match read_records(path) {
        Ok(existing) => existing,
        Err(e) if e.is_not_found() => Vec::new(),
        Err(e) => {
            tracing::warn!(
                target: "todo::storage",
                "Archive unreadable, starting a new one: {}",
                e
            );
            back_up_unreadable(path);
            Vec::new()
        }
    };

    let mut known: HashSet<Uuid> = archived.iter().map(|r| r.id).collect();
    let fresh: Vec<TodoRecord> = records
        .iter()
        .filter(|r| known.insert(r.id))
        .cloned()
        .collect();

    let skipped = records.len() - fresh.len();
    if skipped > 0 {
        tracing::warn!(
            target: "todo::storage",
            skipped,
            "Records already archived, not appending them again"
        );
    }
    if fresh.is_empty() {
        return Ok(archived.len());
    }

    archived.extend(fresh);
    write_records(path, &archived)?;
    Ok(archived.len())
}
