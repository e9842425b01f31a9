use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub type Timestamp = DateTime<Utc>;

/// One todo item as stored in `todos.json` and `archive.json`.
///
/// `created` and `completed` are optional so files written before those fields
/// existed still decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoRecord {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due: Option<Timestamp>,
}

impl TodoRecord {
    pub fn new(title: impl Into<String>, now: Timestamp) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            is_completed: false,
            created: Some(now),
            completed: None,
            due: None,
        }
    }

    /// Flip completion, keeping `completed` present exactly when the item is done.
    pub fn toggle(&mut self, now: Timestamp) {
        self.is_completed = !self.is_completed;
        self.completed = if self.is_completed { Some(now) } else { None };
    }
}

/// Durability outcome of a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveStatus {
    /// Nothing changed, nothing written.
    Skipped,
    /// Written to disk before the call returned.
    Saved,
    /// Handed to the background writer under this generation.
    Queued(u64),
    /// The write failed; the change is applied in memory only.
    Failed(String),
}

impl SaveStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, SaveStatus::Failed(_))
    }
}

/// Result of a store mutation, for the presentation layer to re-render from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mutation {
    pub changed: bool,
    pub save: SaveStatus,
    /// Id of the record created by `add`.
    pub created: Option<Uuid>,
}

impl Mutation {
    pub fn unchanged() -> Self {
        Self {
            changed: false,
            save: SaveStatus::Skipped,
            created: None,
        }
    }

    pub fn applied(save: SaveStatus) -> Self {
        Self {
            changed: true,
            save,
            created: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveOutcome {
    /// Number of records moved into the archive file.
    pub archived: usize,
    pub save: SaveStatus,
}

/// A position or id prefix that does not pick out exactly one todo.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    #[error("No todo matches {0}")]
    NotFound(String),

    #[error("{0} matches several todos, use a longer prefix")]
    Ambiguous(String),
}
