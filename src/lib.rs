//! # Depositboard
//!
//! Client core of the deposit platform dashboard: loads the published
//! project configuration, reads rankings and transactions from the hosted
//! data service through a keyed query cache, runs the NFT return payout
//! procedure, and uploads images to the image host.
//!
//! ## Modules
//!
//! - [`project`]: configuration document, fetch-once loader, derived app info
//! - [`backend`]: `DataService` trait and the Supabase implementation
//! - [`cache`]: keyed query cache with in-flight sharing and invalidation
//! - [`hooks`]: per-feature query handles publishing [`Remote`] state
//! - [`upload`]: image upload client
//! - [`views`]: plain-text panels
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use depositboard::{views, App, Settings};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let app = App::init(Settings::load_default()?).await?;
//!
//!     let ranking = app.top_depositors().load().await;
//!     println!("{}", views::render_top_depositors(&ranking, app.ui()));
//!
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod backend;
pub mod cache;
pub mod config;
pub mod hooks;
pub mod project;
pub mod remote;
pub mod telemetry;
pub mod upload;
pub mod views;

pub use app::App;

pub use remote::Remote;

pub use project::{
    AppInfo, ConfigError, ConfigLoader, ConfigSource, DerivedAppInfo, ProjectConfig, UiConfig,
};

pub use backend::{
    BackendError, BackendResult, DataService, DepositUser, SupabaseClient, Transaction,
    TransactionKind,
};

pub use cache::{CacheError, QueryCache, QueryKey};

pub use hooks::{NftReturns, QueryHandle, TopDepositors};

pub use upload::{ImageFile, ImageUploader, UploadError};

pub use config::{generate_default_config, Settings, SettingsError};
