use super::errors::StorageError;
use std::path::{Path, PathBuf};

pub const APP_DIR_NAME: &str = "todomenubar";
pub const TODOS_FILE_NAME: &str = "todos.json";
pub const ARCHIVE_FILE_NAME: &str = "archive.json";

/// Overrides the app storage directory (settings + logs).
pub const HOME_ENV: &str = "TODOMENUBAR_HOME";
/// Overrides the directory holding `todos.json` and `archive.json`.
pub const DATA_DIR_ENV: &str = "TODOMENUBAR_DATA_DIR";

/// Get the app storage directory.
/// Returns `$TODOMENUBAR_HOME` or `{data_local_dir}/todomenubar`.
pub fn get_storage_dir() -> PathBuf {
    if let Some(dir) = env_dir(HOME_ENV) {
        return dir;
    }

    dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local").join("share")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

/// Get the logs directory path.
/// Returns `{storage_dir}/logs`.
pub fn get_log_dir() -> PathBuf {
    get_storage_dir().join("logs")
}

/// Get the settings file path.
/// Returns `{storage_dir}/settings.json`.
pub fn get_settings_path() -> PathBuf {
    get_storage_dir().join("settings.json")
}

/// Resolve the directory holding the todo files.
///
/// `$TODOMENUBAR_DATA_DIR` wins over the configured directory, which wins over
/// the per-user documents directory.
pub fn resolve_data_dir(configured: Option<&Path>) -> PathBuf {
    if let Some(dir) = env_dir(DATA_DIR_ENV) {
        return dir;
    }

    if let Some(dir) = configured {
        return dir.to_path_buf();
    }

    get_documents_dir()
}

/// Get the per-user documents directory (`~/Documents` when the platform has none).
pub fn get_documents_dir() -> PathBuf {
    dirs::document_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Documents")))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Replace `path` with `content` via a sibling temp file and a rename, so a
/// reader sees either the old or the new file. Creates the parent directory.
pub fn atomic_write(path: &Path, content: &str) -> Result<(), StorageError> {
    if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(dir)
            .map_err(|e| StorageError::directory(format!("{}: {}", dir.display(), e)))?;
    }

    let temp_path = temp_path_for(path);
    std::fs::write(&temp_path, content).map_err(|e| StorageError::write(&temp_path, e))?;

    if let Err(e) = std::fs::rename(&temp_path, path) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(StorageError::write(path, e));
    }

    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "data".to_string());
    path.with_file_name(format!(".{}.tmp", name))
}

fn env_dir(key: &str) -> Option<PathBuf> {
    std::env::var_os(key)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_dir_structure() {
        let logs = get_log_dir();
        assert!(logs.ends_with("logs"));

        let settings = get_settings_path();
        assert!(settings.ends_with("settings.json"));
        assert_eq!(logs.parent(), settings.parent());
    }

    #[test]
    fn test_configured_data_dir_used_without_env_override() {
        if std::env::var_os(DATA_DIR_ENV).is_some() {
            return;
        }
        let configured = Path::new("/tmp/my-todos");
        assert_eq!(resolve_data_dir(Some(configured)), configured);
    }

    #[test]
    fn test_ensure_dir_creates_nested_directories() {
        let tmp = tempfile::TempDir::new().unwrap();
        let nested = tmp.path().join("a").join("b");
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
        // Second call is a no-op
        ensure_dir(&nested).unwrap();
    }

    #[test]
    fn test_atomic_write_replaces_content() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("settings.json");

        atomic_write(&path, "first").unwrap();
        atomic_write(&path, "second").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
        assert!(!tmp.path().join(".settings.json.tmp").exists());
    }
}
