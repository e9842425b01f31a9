use super::storage::write_records;
use super::types::{SaveStatus, TodoRecord};
use crossbeam_channel::{unbounded, Receiver, SendError, Sender, TryRecvError};
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

enum SaveCommand {
    Write {
        generation: u64,
        records: Vec<TodoRecord>,
    },
    Flush(Sender<SaveStatus>),
}

/// Background writer for the active todo file.
///
/// Snapshots are written strictly in the order they were queued. When several
/// are waiting, only the newest is written, so an older snapshot can never
/// land after a newer one. Without a running thread, snapshots are written
/// inline instead.
pub struct SaveWriter {
    path: PathBuf,
    tx: Option<Sender<SaveCommand>>,
    handle: Option<JoinHandle<()>>,
    next_generation: u64,
}

impl SaveWriter {
    /// Spawn the writer thread for `path`.
    pub fn spawn(path: PathBuf) -> Self {
        let (tx, rx) = unbounded::<SaveCommand>();
        let thread_path = path.clone();

        let handle = thread::Builder::new()
            .name("todo-saver".to_string())
            .spawn(move || writer_loop(thread_path, rx))
            .map_err(|e| {
                tracing::error!(
                    target: "todo::saver",
                    "Failed to spawn save writer, saving inline: {}",
                    e
                );
            })
            .ok();

        Self {
            path,
            tx: handle.as_ref().map(|_| tx),
            handle,
            next_generation: 1,
        }
    }

    /// A writer with no thread; every snapshot is written inline.
    #[cfg(test)]
    fn inline(path: PathBuf) -> Self {
        Self {
            path,
            tx: None,
            handle: None,
            next_generation: 1,
        }
    }

    /// Queue a snapshot and return `Queued(generation)`.
    ///
    /// When the writer thread is not running the snapshot is written inline
    /// and the outcome of that write is returned. Generations only advance for
    /// queued snapshots.
    pub fn enqueue(&mut self, records: Vec<TodoRecord>) -> SaveStatus {
        let Some(tx) = &self.tx else {
            return self.write_inline(&records);
        };

        let generation = self.next_generation;
        match tx.send(SaveCommand::Write {
            generation,
            records,
        }) {
            Ok(()) => {
                self.next_generation += 1;
                SaveStatus::Queued(generation)
            }
            Err(SendError(command)) => {
                tracing::error!(
                    target: "todo::saver",
                    generation,
                    "Save writer disconnected, saving inline"
                );
                self.tx = None;
                match command {
                    SaveCommand::Write { records, .. } => self.write_inline(&records),
                    SaveCommand::Flush(_) => SaveStatus::Skipped,
                }
            }
        }
    }

    /// Block until every queued snapshot is on disk.
    ///
    /// Returns the outcome of the most recent queued write, or `Skipped` if
    /// nothing has been queued.
    pub fn flush(&self) -> SaveStatus {
        let Some(tx) = &self.tx else {
            return SaveStatus::Skipped;
        };

        let (ack_tx, ack_rx) = crossbeam_channel::bounded(1);
        if tx.send(SaveCommand::Flush(ack_tx)).is_err() {
            return SaveStatus::Failed("save writer disconnected".to_string());
        }

        ack_rx
            .recv()
            .unwrap_or_else(|_| SaveStatus::Failed("save writer disconnected".to_string()))
    }

    fn write_inline(&self, records: &[TodoRecord]) -> SaveStatus {
        write_snapshot(&self.path, 0, records)
    }
}

impl Drop for SaveWriter {
    fn drop(&mut self) {
        // Closing the channel lets the loop drain what is left and exit.
        self.tx.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!(target: "todo::saver", "Save writer panicked");
            }
        }
    }
}

fn writer_loop(path: PathBuf, rx: Receiver<SaveCommand>) {
    let mut pending: Option<(u64, Vec<TodoRecord>)> = None;
    let mut last = SaveStatus::Skipped;

    loop {
        let command = if pending.is_some() {
            match rx.try_recv() {
                Ok(command) => command,
                Err(TryRecvError::Empty) => {
                    if let Some((generation, records)) = pending.take() {
                        last = write_snapshot(&path, generation, &records);
                    }
                    continue;
                }
                Err(TryRecvError::Disconnected) => {
                    if let Some((generation, records)) = pending.take() {
                        write_snapshot(&path, generation, &records);
                    }
                    break;
                }
            }
        } else {
            match rx.recv() {
                Ok(command) => command,
                Err(_) => break,
            }
        };

        match command {
            SaveCommand::Write {
                generation,
                records,
            } => {
                if let Some((superseded, _)) = pending.replace((generation, records)) {
                    tracing::trace!(
                        target: "todo::saver",
                        superseded,
                        generation,
                        "Coalesced pending snapshot"
                    );
                }
            }
            SaveCommand::Flush(ack) => {
                if let Some((generation, records)) = pending.take() {
                    last = write_snapshot(&path, generation, &records);
                }
                let _ = ack.send(last.clone());
            }
        }
    }
}

fn write_snapshot(path: &Path, generation: u64, records: &[TodoRecord]) -> SaveStatus {
    match write_records(path, records) {
        Ok(()) => {
            tracing::debug!(
                target: "todo::saver",
                generation,
                count = records.len(),
                "Snapshot saved"
            );
            SaveStatus::Saved
        }
        Err(e) => {
            tracing::error!(target: "todo::saver", generation, "Saving error: {}", e);
            SaveStatus::Failed(e.to_string())
        }
    }
}
