pub mod core;
pub mod plugins;
pub mod shared;

use crate::core::logging::{self, LoggingGuards};
use crate::core::settings::{load_settings, AppSettings};
use crate::plugins::todo::{init_todo_store, TodoStore};
use crate::shared::paths::get_log_dir;

/// Everything a front end needs: settings, the todo store and the log guards.
pub struct AppState {
    pub settings: AppSettings,
    pub store: TodoStore,
    _logging: Option<LoggingGuards>,
}

impl AppState {
    /// Initialize logging first, then settings, then the store.
    ///
    /// A log directory that cannot be created only costs the log files.
    pub fn init(background_saves: bool) -> Self {
        let logging = match logging::init_logging(&get_log_dir()) {
            Ok(guards) => Some(guards),
            Err(e) => {
                eprintln!("Failed to initialize logging: {}", e);
                None
            }
        };

        let settings = load_settings();
        let data_dir = settings.data_dir();
        let store = init_todo_store(&data_dir, background_saves);

        Self {
            settings,
            store,
            _logging: logging,
        }
    }
}

impl Drop for AppState {
    fn drop(&mut self) {
        // Queued saves must reach disk before the log guards go away.
        if self.store.flush().is_failed() {
            tracing::error!(target: "todo", "Final save failed");
        }
    }
}
