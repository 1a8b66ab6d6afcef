//! File-based persistence backend.
//!
//! Stores one value as one UTF-8 text file under a base directory. The file
//! name is validated at construction to prevent directory escape.

use crate::storage::traits::{BackendError, BackendResult, PersistenceBackend, ValueInfo};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Maximum size for a stored value file (1MB).
/// Prevents memory exhaustion from maliciously large files. Enforced on both
/// write and read, so a value this backend accepts can always be read back.
const MAX_FILE_SIZE: u64 = 1024 * 1024;

/// File-based persistence backend bound to a single file.
pub struct FilesystemBackend {
    /// Full path of the backing file.
    path: PathBuf,
}

impl FilesystemBackend {
    /// Creates a backend for `file_name` under `base_dir`.
    ///
    /// The base directory is created if missing.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotAvailable` if the directory cannot be
    /// created, and `BackendError::Io` if the file name contains path
    /// separators or other unsafe characters.
    pub fn new(base_dir: impl Into<PathBuf>, file_name: &str) -> BackendResult<Self> {
        let base_dir = base_dir.into();

        if !Self::is_safe_filename(file_name) {
            return Err(BackendError::Io {
                operation: "validate_file_name".to_string(),
                cause: format!("file name contains invalid characters: {file_name}"),
            });
        }

        fs::create_dir_all(&base_dir)
            .map_err(|e| BackendError::NotAvailable(format!("cannot create storage dir: {e}")))?;

        Ok(Self {
            path: base_dir.join(file_name),
        })
    }

    /// Checks if a file name is safe (no path traversal).
    fn is_safe_filename(name: &str) -> bool {
        // Only allow alphanumeric, dash, underscore, and extension dots.
        // Reject: .. / \ NUL and other special chars.
        !name.is_empty()
            && name.len() <= 255
            && !name.starts_with('.')
            && !name.contains("..")
            && name
                .chars()
                .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '.')
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PersistenceBackend for FilesystemBackend {
    fn read(&self) -> BackendResult<Option<String>> {
        let metadata = match fs::metadata(&self.path) {
            Ok(m) => m,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(BackendError::io("read_file_metadata", e)),
        };

        if metadata.len() > MAX_FILE_SIZE {
            return Err(BackendError::Io {
                operation: "read_value_file".to_string(),
                cause: format!(
                    "file exceeds maximum size of {MAX_FILE_SIZE} bytes: {}",
                    self.path.display()
                ),
            });
        }

        let raw = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(BackendError::io("read_value_file", e)),
        };

        let content = String::from_utf8(raw)
            .map_err(|e| BackendError::Decode(format!("file is not valid UTF-8: {e}")))?;

        Ok(Some(content))
    }

    fn write(&self, content: &str) -> BackendResult<()> {
        if u64::try_from(content.len()).unwrap_or(u64::MAX) > MAX_FILE_SIZE {
            return Err(BackendError::Io {
                operation: "write_value_file".to_string(),
                cause: format!(
                    "value exceeds maximum size of {MAX_FILE_SIZE} bytes: {} bytes",
                    content.len()
                ),
            });
        }

        tracing::debug!(path = %self.path.display(), bytes = content.len(), "writing value file");
        fs::write(&self.path, content).map_err(|e| BackendError::io("write_value_file", e))
    }

    fn delete(&self) -> BackendResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BackendError::io("delete_value_file", e)),
        }
    }

    fn stat(&self) -> BackendResult<ValueInfo> {
        match fs::metadata(&self.path) {
            Ok(m) => Ok(ValueInfo {
                exists: true,
                size: m.len(),
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(ValueInfo {
                exists: false,
                size: 0,
            }),
            Err(e) => Err(BackendError::io("stat_value_file", e)),
        }
    }
}
