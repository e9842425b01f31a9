pub mod helpers;
pub mod saver;
pub mod storage;
pub mod store;
pub mod types;

use std::path::Path;
use storage::TodoFiles;
pub use store::TodoStore;

/// Initialize the todo store for a data directory, loading `todos.json`.
pub fn init_todo_store(data_dir: &Path, background_saves: bool) -> TodoStore {
    let files = TodoFiles::in_dir(data_dir);
    if background_saves {
        TodoStore::with_background_saves(files)
    } else {
        TodoStore::open(files)
    }
}
