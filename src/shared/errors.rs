use std::path::{Path, PathBuf};
use thiserror::Error;

/// Storage errors shared by the todo files and the settings file.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read {}: {source}", .path.display())]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    ParseError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode data: {0}")]
    EncodeError(#[from] serde_json::Error),

    #[error("Failed to create directory: {0}")]
    DirectoryError(String),
}

impl StorageError {
    pub fn read(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            return StorageError::NotFound(path.to_path_buf());
        }
        StorageError::ReadError {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn write(path: &Path, source: std::io::Error) -> Self {
        StorageError::WriteError {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn parse(path: &Path, source: serde_json::Error) -> Self {
        StorageError::ParseError {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn directory(msg: impl Into<String>) -> Self {
        StorageError::DirectoryError(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_maps_missing_file_to_not_found() {
        let path = Path::new("/nowhere/todos.json");
        let err = StorageError::read(path, std::io::Error::from(std::io::ErrorKind::NotFound));
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "File not found: /nowhere/todos.json");
    }

    #[test]
    fn test_read_keeps_other_io_errors() {
        let path = Path::new("/nowhere/todos.json");
        let err = StorageError::read(
            path,
            std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        );
        assert!(!err.is_not_found());
        assert!(err.to_string().starts_with("Failed to read /nowhere/todos.json"));
    }
}
