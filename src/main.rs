//! Depositboard CLI
//!
//! Terminal front end for the deposit platform dashboard:
//! - Show project info
//! - Show the top depositors ranking
//! - Show NFT return notifications and process due returns
//! - Upload images to the image host

use anyhow::Context;
use clap::{Parser, Subcommand};
use depositboard::project::{ConfigLoader, DerivedAppInfo};
use depositboard::telemetry::init_logging;
use depositboard::{generate_default_config, views, App, ImageFile, Remote, Settings};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "depositboard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Dashboard client for the deposit platform")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Settings file (default: search the usual locations)
    #[arg(short, long, global = true)]
    pub settings: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show project information
    Info,

    /// Show the top depositors
    TopDepositors,

    /// Show NFT return notifications of a user
    NftReturns {
        /// User id (default: session user)
        #[arg(short, long)]
        user_id: Option<String>,
    },

    /// Process due NFT returns
    ProcessReturns {
        /// Show this user's returns afterwards (default: session user)
        #[arg(short, long)]
        user_id: Option<String>,
    },

    /// Upload an image and print its URL
    Upload {
        /// Path to the image file
        path: PathBuf,
    },

    /// Generate default settings file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let path = cli.settings.clone().or_else(Settings::default_path);
    let settings = Settings::load_optional(path.as_deref())?;
    init_logging(&settings.logging);

    match &path {
        Some(path) => tracing::debug!("Loaded settings from {:?}", path),
        None => tracing::debug!("Using default settings with environment overrides"),
    }

    let json = cli.format == "json";

    match cli.command {
        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)
                        .with_context(|| format!("writing {:?}", path))?;
                    println!("Wrote default settings to {:?}", path);
                }
                None => print!("{}", content),
            }
        }

        Commands::Info => {
            let loader = ConfigLoader::new(reqwest::Client::new(), settings.config_source());
            loader
                .init()
                .await
                .context("Failed to load configuration")?;

            let derived = DerivedAppInfo::from_state(&loader.state());
            if json {
                print_json(&derived.info)?;
            } else {
                println!("{}", views::render_app_info(&derived));
            }
        }

        Commands::TopDepositors => {
            let app = App::init(settings).await?;
            let state = app.top_depositors().load().await;
            if json {
                print_state_json(&state)?;
            } else {
                println!("{}", views::render_top_depositors(&state, app.ui()));
            }
            exit_on_failure(&state);
        }

        Commands::NftReturns { user_id } => {
            let app = App::init(settings).await?;
            let returns = app.nft_returns(user_id);
            if !returns.is_enabled() {
                tracing::warn!("No user id given, nothing to show");
            }

            let state = returns.load().await;
            if json {
                print_state_json(&state)?;
            } else {
                println!("{}", views::render_notifications(&state, app.ui()));
            }
            exit_on_failure(&state);
        }

        Commands::ProcessReturns { user_id } => {
            let app = App::init(settings).await?;
            let returns = app.nft_returns(user_id);

            let result = returns
                .process_returns()
                .await
                .context("processing NFT returns")?;

            if json {
                print_json(&result)?;
            } else {
                println!("Processed NFT returns: {}", result);
                if returns.is_enabled() {
                    let state = returns.load().await;
                    println!("{}", views::render_notifications(&state, app.ui()));
                }
            }
        }

        Commands::Upload { path } => {
            let app = App::init(settings).await?;
            let image = ImageFile::from_path(&path)
                .await
                .with_context(|| format!("reading {:?}", path))?;

            let url = app.uploader().upload(image).await?;
            if json {
                print_json(&serde_json::json!({ "url": url }))?;
            } else {
                println!("{}", url);
            }
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_state_json<T: Serialize>(state: &Remote<Vec<T>>) -> anyhow::Result<()> {
    match state {
        Remote::Ready(items) => print_json(items),
        Remote::Failed { message } => print_json(&serde_json::json!({ "error": message })),
        Remote::Loading => Ok(()),
    }
}

fn exit_on_failure<T>(state: &Remote<T>) {
    if state.error().is_some() {
        std::process::exit(1);
    }
}
