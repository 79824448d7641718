//! Explicit runtime configuration.
//!
//! # Responsibility
//! - Describe where collections live and how the model is reached.
//! - Validate user-provided values before any I/O happens.
//!
//! # Invariants
//! - Store roots are absolute; relative paths are resolved by the caller.
//! - A `ModelConfig` without `base_url` selects the offline echo gateway.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// File name of the notes collection inside the store root.
pub const NOTES_FILE_NAME: &str = "notes.json";
/// File name of the study-plan collection inside the store root.
pub const TASKS_FILE_NAME: &str = "tasks.json";
/// Log subdirectory used when no explicit log directory is configured.
pub const DEFAULT_LOG_DIR_NAME: &str = "logs";

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_TEMPERATURE: f64 = 0.3;

/// Configuration validation error.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    EmptyPath(&'static str),
    RelativePath { field: &'static str, path: String },
    InvalidModelUrl(String),
    EmptyModelName,
    InvalidTimeout(u64),
    InvalidTemperature(f64),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyPath(field) => write!(f, "{field} cannot be empty"),
            Self::RelativePath { field, path } => {
                write!(f, "{field} must be an absolute path, got `{path}`")
            }
            Self::InvalidModelUrl(url) => {
                write!(f, "model url must start with http:// or https://, got `{url}`")
            }
            Self::EmptyModelName => write!(f, "model name cannot be empty"),
            Self::InvalidTimeout(secs) => write!(f, "timeout must be positive, got {secs}"),
            Self::InvalidTemperature(value) => {
                write!(f, "temperature must be within 0.0..=2.0, got {value}")
            }
        }
    }
}

impl Error for ConfigError {}

/// Location of the on-disk collections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    root: PathBuf,
}

impl StoreConfig {
    /// Creates a store configuration rooted at an absolute directory.
    ///
    /// The directory is not created here; it appears on first write.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Ok(Self {
            root: require_absolute("data_dir", root.as_ref())?,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn notes_path(&self) -> PathBuf {
        self.root.join(NOTES_FILE_NAME)
    }

    pub fn tasks_path(&self) -> PathBuf {
        self.root.join(TASKS_FILE_NAME)
    }
}

/// How to reach the language model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    /// OpenAI-compatible API base, e.g. `https://api.openai.com/v1`.
    /// `None` selects the offline echo gateway.
    pub base_url: Option<String>,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub temperature: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl ModelConfig {
    /// Returns whether no remote endpoint is configured.
    pub fn is_offline(&self) -> bool {
        self.base_url.is_none()
    }

    /// Validates endpoint, model name, timeout and temperature.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(url) = self.base_url.as_deref() {
            let trimmed = url.trim();
            if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
                return Err(ConfigError::InvalidModelUrl(url.to_string()));
            }
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::EmptyModelName);
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout(self.timeout_secs));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::InvalidTemperature(self.temperature));
        }
        Ok(())
    }
}

/// Full assistant configuration assembled at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct AssistantConfig {
    pub store: StoreConfig,
    pub model: ModelConfig,
    pub log_level: String,
    pub log_dir: PathBuf,
}

impl AssistantConfig {
    /// Builds a configuration with logs under `<data_dir>/logs`.
    pub fn new(store: StoreConfig, model: ModelConfig, log_level: impl Into<String>) -> Self {
        let log_dir = store.root().join(DEFAULT_LOG_DIR_NAME);
        Self {
            store,
            model,
            log_level: log_level.into(),
            log_dir,
        }
    }

    /// Overrides the log directory; must be absolute.
    pub fn with_log_dir(mut self, log_dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        self.log_dir = require_absolute("log_dir", log_dir.as_ref())?;
        Ok(self)
    }
}

fn require_absolute(field: &'static str, path: &Path) -> Result<PathBuf, ConfigError> {
    let text = path.to_string_lossy();
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::EmptyPath(field));
    }
    let path = Path::new(trimmed);
    if !path.is_absolute() {
        return Err(ConfigError::RelativePath {
            field,
            path: trimmed.to_string(),
        });
    }
    Ok(path.to_path_buf())
}
