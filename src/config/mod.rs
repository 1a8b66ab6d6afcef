//! Configuration management.

use crate::models::InsertPosition;
use crate::store::DecodePolicy;
use crate::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::str::FromStr;

/// Which persistence backend a store is built over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    /// `SQLite` key-value table (the default).
    #[default]
    Sqlite,
    /// Flat UTF-8 text file.
    File,
    /// In-process memory slot; nothing survives the process.
    Memory,
}

impl BackendKind {
    /// Returns the canonical string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::File => "file",
            Self::Memory => "memory",
        }
    }
}

impl FromStr for BackendKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "sqlite" | "kv" => Ok(Self::Sqlite),
            "file" | "fs" => Ok(Self::File),
            "memory" | "mem" => Ok(Self::Memory),
            other => Err(Error::InvalidInput(format!(
                "unknown backend '{other}' (expected sqlite, file, or memory)"
            ))),
        }
    }
}

/// Main configuration for listkeep.
#[derive(Debug, Clone)]
pub struct ListkeepConfig {
    /// Directory holding the database file and value files.
    pub data_dir: PathBuf,
    /// Backend the list store is built over.
    pub backend: BackendKind,
    /// Key (and file stem) under which the list is stored.
    pub list_key: String,
    /// File name (and key) under which the single document is stored.
    pub document_name: String,
    /// Insertion position used when the caller does not specify one.
    pub default_position: InsertPosition,
    /// How undecodable stored lists are handled.
    pub decode_policy: DecodePolicy,
}

impl Default for ListkeepConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".listkeep"),
            backend: BackendKind::default(),
            list_key: "my_items".to_string(),
            document_name: "document.txt".to_string(),
            default_position: InsertPosition::default(),
            decode_policy: DecodePolicy::default(),
        }
    }
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Data directory.
    pub data_dir: Option<String>,
    /// Backend name: "sqlite", "file", or "memory".
    pub backend: Option<String>,
    /// List key.
    pub list_key: Option<String>,
    /// Document file name.
    pub document_name: Option<String>,
    /// Default insertion position: "prepend" or "append".
    pub default_position: Option<String>,
    /// Decode policy: "error" or "reset".
    pub decode_policy: Option<String>,
}

impl ListkeepConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if it names
    /// an unknown backend.
    pub fn load_from_file(path: &std::path::Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::InvalidInput(format!("cannot read config file: {e}")))?;

        let file: ConfigFile = toml::from_str(&contents)
            .map_err(|e| Error::InvalidInput(format!("cannot parse config file: {e}")))?;

        Self::from_config_file(file)
    }

    /// Loads configuration from the default location.
    ///
    /// Checks the following paths in order:
    /// 1. Platform-specific config dir (`~/Library/Application Support/listkeep/` on macOS)
    /// 2. XDG config dir (`~/.config/listkeep/` for Unix compatibility)
    ///
    /// Returns default configuration if no config file is found.
    #[must_use]
    pub fn load_default() -> Self {
        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Self::default();
        };

        let platform_config = base_dirs.config_dir().join("listkeep").join("config.toml");
        if platform_config.exists() {
            if let Ok(config) = Self::load_from_file(&platform_config) {
                return config;
            }
        }

        let xdg_config = base_dirs
            .home_dir()
            .join(".config")
            .join("listkeep")
            .join("config.toml");
        if xdg_config.exists() {
            if let Ok(config) = Self::load_from_file(&xdg_config) {
                return config;
            }
        }

        Self::default()
    }

    /// Converts a `ConfigFile` to `ListkeepConfig`.
    fn from_config_file(file: ConfigFile) -> Result<Self> {
        let mut config = Self::default();

        if let Some(data_dir) = file.data_dir {
            config.data_dir = PathBuf::from(data_dir);
        }
        if let Some(backend) = file.backend {
            config.backend = backend.parse()?;
        }
        if let Some(list_key) = file.list_key {
            config.list_key = list_key;
        }
        if let Some(document_name) = file.document_name {
            config.document_name = document_name;
        }
        if let Some(position) = file.default_position {
            config.default_position = position.parse()?;
        }
        if let Some(policy) = file.decode_policy {
            config.decode_policy = policy.parse()?;
        }

        Ok(config)
    }

    /// Sets the data directory.
    #[must_use]
    pub fn with_data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_dir = path.into();
        self
    }

    /// Sets the backend kind.
    #[must_use]
    pub const fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    /// Sets the list key.
    #[must_use]
    pub fn with_list_key(mut self, key: impl Into<String>) -> Self {
        self.list_key = key.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use test_case::test_case;

    #[test]
    fn test_defaults() {
        let config = ListkeepConfig::default();
        assert_eq!(config.backend, BackendKind::Sqlite);
        assert_eq!(config.list_key, "my_items");
        assert_eq!(config.default_position, InsertPosition::Append);
        assert_eq!(config.decode_policy, DecodePolicy::Error);
    }

    #[test_case("sqlite", BackendKind::Sqlite)]
    #[test_case("kv", BackendKind::Sqlite)]
    #[test_case("FILE", BackendKind::File)]
    #[test_case("mem", BackendKind::Memory)]
    fn test_backend_parse(input: &str, expected: BackendKind) {
        assert_eq!(input.parse::<BackendKind>().unwrap(), expected);
    }

    #[test]
    fn test_backend_parse_unknown_is_invalid_input() {
        let result = "redis".parse::<BackendKind>();
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "backend = \"file\"\nlist_key = \"groceries\"\ndefault_position = \"prepend\"\ndecode_policy = \"reset\""
        )
        .unwrap();

        let config = ListkeepConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.backend, BackendKind::File);
        assert_eq!(config.list_key, "groceries");
        assert_eq!(config.default_position, InsertPosition::Prepend);
        assert_eq!(config.decode_policy, DecodePolicy::ResetToEmpty);
        // Unset keys keep their defaults.
        assert_eq!(config.document_name, "document.txt");
    }

    #[test]
    fn test_load_from_file_unknown_backend_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "backend = \"postgres\"").unwrap();

        assert!(ListkeepConfig::load_from_file(file.path()).is_err());
    }

    #[test_case("default_position = \"middle\"")]
    #[test_case("decode_policy = \"ignore\"")]
    fn test_load_from_file_unknown_enum_value_fails(line: &str) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{line}").unwrap();

        let result = ListkeepConfig::load_from_file(file.path());
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_builders() {
        let config = ListkeepConfig::new()
            .with_data_dir("/tmp/lists")
            .with_backend(BackendKind::Memory)
            .with_list_key("todo");

        assert_eq!(config.data_dir, PathBuf::from("/tmp/lists"));
        assert_eq!(config.backend, BackendKind::Memory);
        assert_eq!(config.list_key, "todo");
    }
}
