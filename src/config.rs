//! Client Settings
//!
//! Local settings of the dashboard client: where the application is served
//! from, who is acting, and how to log. Loaded from a TOML file with
//! environment variable overrides. The project configuration itself is
//! fetched at runtime, see [`crate::project`].

use crate::project::ConfigSource;
use crate::upload::DEFAULT_UPLOAD_ENDPOINT;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main settings structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: AppSettings,

    #[serde(default)]
    pub session: SessionSettings,

    #[serde(default)]
    pub upload: UploadSettings,

    #[serde(default)]
    pub cache: CacheSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Where the application and its configuration document live
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Read the configuration document from disk instead of the origin
    pub config_file: Option<PathBuf>,
}

fn default_origin() -> String {
    "http://localhost:5173".to_string()
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            origin: default_origin(),
            config_file: None,
        }
    }
}

/// Acting user
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionSettings {
    /// Access token of a signed-in user
    pub access_token: Option<String>,

    /// Id of the acting user
    pub user_id: Option<String>,
}

/// Image host settings
#[derive(Debug, Clone, Deserialize)]
pub struct UploadSettings {
    #[serde(default = "default_upload_endpoint")]
    pub endpoint: String,
}

fn default_upload_endpoint() -> String {
    DEFAULT_UPLOAD_ENDPOINT.to_string()
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            endpoint: default_upload_endpoint(),
        }
    }
}

/// Query cache settings
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_stale_time")]
    pub stale_time_secs: u64,
}

fn default_stale_time() -> u64 {
    30
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            stale_time_secs: default_stale_time(),
        }
    }
}

impl CacheSettings {
    pub fn stale_time(&self) -> Duration {
        Duration::from_secs(self.stale_time_secs)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Settings {
    /// Load settings from a file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|e| SettingsError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| SettingsError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Defaults with environment variable overrides
    pub fn from_env() -> Self {
        let mut settings = Settings::default();
        settings.apply_env_overrides();
        settings
    }

    /// Load settings from a file, then apply environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, SettingsError> {
        let mut settings = Self::load(path)?;
        settings.apply_env_overrides();
        Ok(settings)
    }

    /// First settings file found in the default locations
    pub fn default_path() -> Option<PathBuf> {
        let paths = [
            dirs::config_dir().map(|p| p.join("depositboard").join("config.toml")),
            Some(PathBuf::from("./depositboard.toml")),
        ];
        first_existing(paths.into_iter().flatten())
    }

    /// Load from the default location, or defaults with environment overrides.
    ///
    /// A settings file that exists but cannot be read or parsed is an error,
    /// the same as when its path is given explicitly.
    pub fn load_default() -> Result<Self, SettingsError> {
        Self::load_optional(Self::default_path().as_deref())
    }

    /// Load `path` if there is one, otherwise defaults with environment overrides
    pub fn load_optional(path: Option<&Path>) -> Result<Self, SettingsError> {
        match path {
            Some(path) => Self::load_with_env(path),
            None => Ok(Self::from_env()),
        }
    }

    /// Where the project configuration document is read from
    pub fn config_source(&self) -> ConfigSource {
        match &self.app.config_file {
            Some(path) => ConfigSource::File { path: path.clone() },
            None => ConfigSource::from_origin(&self.app.origin),
        }
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides<F: Fn(&str) -> Option<String>>(&mut self, var: F) {
        if let Some(origin) = var("DEPOSITBOARD_ORIGIN") {
            self.app.origin = origin;
        }
        if let Some(path) = var("DEPOSITBOARD_CONFIG_FILE") {
            self.app.config_file = Some(PathBuf::from(path));
        }

        if let Some(token) = var("DEPOSITBOARD_ACCESS_TOKEN") {
            self.session.access_token = Some(token);
        }
        if let Some(user_id) = var("DEPOSITBOARD_USER_ID") {
            self.session.user_id = Some(user_id);
        }

        if let Some(endpoint) = var("DEPOSITBOARD_UPLOAD_ENDPOINT") {
            self.upload.endpoint = endpoint;
        }

        if let Some(secs) = var("DEPOSITBOARD_CACHE_STALE_SECS") {
            if let Ok(s) = secs.parse() {
                self.cache.stale_time_secs = s;
            }
        }

        if let Some(level) = var("DEPOSITBOARD_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("DEPOSITBOARD_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

fn first_existing(paths: impl IntoIterator<Item = PathBuf>) -> Option<PathBuf> {
    paths.into_iter().find(|path| path.exists())
}

/// Settings errors
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to read settings file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse settings file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default settings file content
pub fn generate_default_config() -> String {
    r#"# Depositboard Settings
#
# Environment variables override these settings:
# - DEPOSITBOARD_ORIGIN
# - DEPOSITBOARD_CONFIG_FILE
# - DEPOSITBOARD_ACCESS_TOKEN
# - DEPOSITBOARD_USER_ID
# - DEPOSITBOARD_UPLOAD_ENDPOINT
# - DEPOSITBOARD_CACHE_STALE_SECS
# - DEPOSITBOARD_LOG_LEVEL
# - DEPOSITBOARD_LOG_FORMAT

[app]
# Origin the application is served from; config.json is fetched from here
origin = "http://localhost:5173"

# Read the configuration document from disk instead
# config_file = "./public/config.json"

[session]
# Access token of a signed-in user (the publishable key is used otherwise)
# access_token = ""

# Acting user id for per-user views
# user_id = ""

[upload]
# Image host upload endpoint
endpoint = "https://api.imgbb.com/1/upload"

[cache]
# How long query results stay fresh (seconds)
stale_time_secs = 30

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
