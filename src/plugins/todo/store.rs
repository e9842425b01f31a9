use super::helpers::{
    find_record, find_record_mut, move_indices, remove_indices, resolve_reference,
};
use super::saver::SaveWriter;
use super::storage::{append_to_archive, load_records, write_records, TodoFiles};
use super::types::{
    ArchiveOutcome, Mutation, ReferenceError, SaveStatus, Timestamp, TodoRecord,
};
use chrono::Utc;
use uuid::Uuid;

/// The single owner of the active todo list.
///
/// Every mutation is applied in memory first and then persisted as a full
/// rewrite of `todos.json`. Failures are logged and reported through
/// [`SaveStatus`], never returned as errors.
pub struct TodoStore {
    files: TodoFiles,
    records: Vec<TodoRecord>,
    saver: Option<SaveWriter>,
}

impl TodoStore {
    /// An empty store writing inline to `files`.
    pub fn new(files: TodoFiles) -> Self {
        Self {
            files,
            records: Vec::new(),
            saver: None,
        }
    }

    /// A store populated from `files.todos`, writing inline.
    pub fn open(files: TodoFiles) -> Self {
        let mut store = Self::new(files);
        store.records = store.load();
        tracing::info!(
            target: "todo",
            "Todo store initialized: {} todos from {:?}",
            store.records.len(),
            store.files.todos
        );
        store
    }

    /// A store populated from `files.todos` whose saves run on a background
    /// writer thread.
    pub fn with_background_saves(files: TodoFiles) -> Self {
        let mut store = Self::open(files);
        store.saver = Some(SaveWriter::spawn(store.files.todos.clone()));
        store
    }

    // ------------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------------

    pub fn files(&self) -> &TodoFiles {
        &self.files
    }

    pub fn records(&self) -> &[TodoRecord] {
        &self.records
    }

    pub fn get(&self, id: Uuid) -> Option<&TodoRecord> {
        find_record(&self.records, id)
    }

    pub fn position(&self, id: Uuid) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }

    /// Index of the todo named by a 1-based position or an id prefix.
    pub fn resolve(&self, reference: &str) -> Result<usize, ReferenceError> {
        resolve_reference(&self.records, reference)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn completed_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_completed).count()
    }

    /// Reads the active file. Missing or corrupt files yield an empty list.
    pub fn load(&self) -> Vec<TodoRecord> {
        tracing::debug!(target: "todo", "Loading todos from: {:?}", self.files.todos);
        load_records(&self.files.todos)
    }

    /// Reads the archive file for display.
    pub fn archived(&self) -> Vec<TodoRecord> {
        load_records(&self.files.archive)
    }

    // ------------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------------

    /// Persists the current list, inline or through the background writer.
    pub fn save(&mut self) -> SaveStatus {
        if let Some(saver) = self.saver.as_mut() {
            return saver.enqueue(self.records.clone());
        }

        match write_records(&self.files.todos, &self.records) {
            Ok(()) => SaveStatus::Saved,
            Err(e) => {
                tracing::error!(target: "todo", "Saving error: {}", e);
                SaveStatus::Failed(e.to_string())
            }
        }
    }

    /// Waits for queued background saves. Inline stores have nothing pending.
    pub fn flush(&self) -> SaveStatus {
        match &self.saver {
            Some(saver) => saver.flush(),
            None => SaveStatus::Skipped,
        }
    }

    fn commit(&mut self) -> Mutation {
        Mutation::applied(self.save())
    }

    // ------------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------------

    /// Inserts a new todo at the front. Blank titles are ignored.
    pub fn add(&mut self, title: &str) -> Mutation {
        self.add_at(title, Utc::now())
    }

    pub(crate) fn add_at(&mut self, title: &str, now: Timestamp) -> Mutation {
        let title = title.trim();
        if title.is_empty() {
            tracing::debug!(target: "todo", "Ignoring todo with empty title");
            return Mutation::unchanged();
        }

        let record = TodoRecord::new(title, now);
        let id = record.id;
        self.records.insert(0, record);
        tracing::debug!(target: "todo", id = %id, "Todo added");

        Mutation {
            created: Some(id),
            ..self.commit()
        }
    }

    pub fn toggle_completion(&mut self, id: Uuid) -> Mutation {
        self.toggle_completion_at(id, Utc::now())
    }

    pub(crate) fn toggle_completion_at(&mut self, id: Uuid, now: Timestamp) -> Mutation {
        let Some(record) = find_record_mut(&mut self.records, id) else {
            tracing::debug!(target: "todo", id = %id, "Toggle ignored, todo not found");
            return Mutation::unchanged();
        };

        record.toggle(now);
        tracing::debug!(
            target: "todo",
            id = %id,
            completed = record.is_completed,
            "Todo toggled"
        );
        self.commit()
    }

    /// Replaces the title. Blank titles are ignored, same as `add`.
    pub fn update_title(&mut self, id: Uuid, title: &str) -> Mutation {
        let title = title.trim();
        if title.is_empty() {
            tracing::debug!(target: "todo", id = %id, "Ignoring empty title update");
            return Mutation::unchanged();
        }

        let Some(record) = find_record_mut(&mut self.records, id) else {
            return Mutation::unchanged();
        };

        if record.title == title {
            return Mutation::unchanged();
        }

        record.title = title.to_string();
        self.commit()
    }

    /// Sets or clears the due date.
    pub fn set_due(&mut self, id: Uuid, due: Option<Timestamp>) -> Mutation {
        let Some(record) = find_record_mut(&mut self.records, id) else {
            return Mutation::unchanged();
        };

        if record.due == due {
            return Mutation::unchanged();
        }

        record.due = due;
        self.commit()
    }

    pub fn remove(&mut self, id: Uuid) -> Mutation {
        match self.position(id) {
            Some(index) => {
                self.records.remove(index);
                tracing::debug!(target: "todo", id = %id, "Todo removed");
                self.commit()
            }
            None => Mutation::unchanged(),
        }
    }

    /// Removes the records at the given positions. Out-of-range positions are
    /// ignored.
    pub fn remove_at(&mut self, indices: &[usize]) -> Mutation {
        let removed = remove_indices(&mut self.records, indices);
        if removed == 0 {
            return Mutation::unchanged();
        }

        tracing::debug!(target: "todo", removed, "Todos removed");
        self.commit()
    }

    /// Moves the records at `from` before the record originally at `to`.
    pub fn reorder(&mut self, from: &[usize], to: usize) -> Mutation {
        if !move_indices(&mut self.records, from, to) {
            return Mutation::unchanged();
        }
        self.commit()
    }

    pub fn delete_all(&mut self) -> Mutation {
        if self.records.is_empty() {
            return Mutation::unchanged();
        }

        let removed = self.records.len();
        self.records.clear();
        tracing::info!(target: "todo", removed, "All todos deleted");
        self.commit()
    }

    /// Moves completed records to the end of the archive file.
    ///
    /// The active list changes only after the archive write succeeded.
    pub fn archive_completed(&mut self) -> ArchiveOutcome {
        let completed: Vec<TodoRecord> = self
            .records
            .iter()
            .filter(|r| r.is_completed)
            .cloned()
            .collect();

        if completed.is_empty() {
            return ArchiveOutcome {
                archived: 0,
                save: SaveStatus::Skipped,
            };
        }

        match append_to_archive(&self.files.archive, &completed) {
            Ok(total) => {
                tracing::info!(
                    target: "todo",
                    archived = completed.len(),
                    total,
                    "Archived completed todos"
                );
            }
            Err(e) => {
                tracing::error!(target: "todo", "Archiving error: {}", e);
                return ArchiveOutcome {
                    archived: 0,
                    save: SaveStatus::Failed(e.to_string()),
                };
            }
        }

        self.records.retain(|r| !r.is_completed);
        ArchiveOutcome {
            archived: completed.len(),
            save: self.save(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn store() -> (TempDir, TodoStore) {
        let tmp = TempDir::new().unwrap();
        let store = TodoStore::open(TodoFiles::in_dir(tmp.path()));
        (tmp, store)
    }

    fn at(secs: i64) -> Timestamp {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_add_uses_given_clock_and_trims() {
        let (_tmp, mut store) = store();
        let result = store.add_at("  Buy milk  ", at(42));

        let id = result.created.unwrap();
        let record = store.get(id).unwrap();
        assert_eq!(record.title, "Buy milk");
        assert_eq!(record.created, Some(at(42)));
        assert_eq!(result.save, SaveStatus::Saved);
    }

    #[test]
    fn test_toggle_records_completion_time() {
        let (_tmp, mut store) = store();
        let id = store.add("Task").created.unwrap();

        store.toggle_completion_at(id, at(7));
        assert_eq!(store.get(id).unwrap().completed, Some(at(7)));
        assert_eq!(store.completed_count(), 1);
    }

    #[test]
    fn test_update_title_rejects_blank_and_same_title() {
        let (_tmp, mut store) = store();
        let id = store.add("Original").created.unwrap();

        assert!(!store.update_title(id, "   ").changed);
        assert!(!store.update_title(id, "Original").changed);
        assert!(store.update_title(id, " Renamed ").changed);
        assert_eq!(store.get(id).unwrap().title, "Renamed");
    }

    #[test]
    fn test_archive_with_nothing_completed_is_skipped() {
        let (tmp, mut store) = store();
        store.add("Open");

        let outcome = store.archive_completed();
        assert_eq!(outcome.archived, 0);
        assert_eq!(outcome.save, SaveStatus::Skipped);
        assert!(!tmp.path().join("archive.json").exists());
    }

    #[test]
    fn test_flush_on_inline_store_is_skipped() {
        let (_tmp, store) = store();
        assert_eq!(store.flush(), SaveStatus::Skipped);
    }
}
