//! Project Configuration
//!
//! The static configuration document published with the application and
//! everything derived from it.
//!
//! - **types**: `ProjectConfig` document shape and the `AppInfo` projection
//! - **loader**: fetch-once `ConfigLoader`
//! - **info**: `DerivedAppInfo` for info panels

mod info;
mod loader;
mod types;

pub use info::DerivedAppInfo;
pub use loader::{ConfigError, ConfigLoader, ConfigSource, CONFIG_PATH};
pub use types::{AppInfo, ProjectConfig, ProjectInfo, SupabaseSettings, UiConfig};
