//! Application
//!
//! Composition root: loads the project configuration once, builds the data
//! service client and hands out hooks and the uploader wired to them.

use crate::backend::{DataService, SupabaseClient};
use crate::cache::QueryCache;
use crate::config::Settings;
use crate::hooks::{NftReturns, TopDepositors};
use crate::project::{AppInfo, ConfigError, ConfigLoader, ProjectConfig, UiConfig};
use crate::upload::ImageUploader;
use reqwest::Client;
use std::sync::Arc;

/// Shared state of a running dashboard client
#[derive(Clone)]
pub struct App {
    settings: Arc<Settings>,
    http: Client,
    project: Arc<ProjectConfig>,
    cache: Arc<QueryCache>,
    backend: Arc<dyn DataService>,
}

impl App {
    /// Load the project configuration and connect to its data service
    pub async fn init(settings: Settings) -> Result<Self, ConfigError> {
        let http = Client::new();
        let loader = ConfigLoader::new(http.clone(), settings.config_source());
        let project = loader.init().await?;

        let mut supabase = SupabaseClient::new(http.clone(), &project.supabase);
        if let Some(token) = &settings.session.access_token {
            supabase = supabase.with_access_token(token.clone());
        }

        tracing::info!(
            project = %project.project.name,
            environment = %project.project.environment,
            data_service = %supabase.rest_url(),
            "Application initialized"
        );

        Ok(Self::with_backend(settings, http, project, Arc::new(supabase)))
    }

    /// Assemble from an already loaded configuration and any data service.
    ///
    /// `http` is shared by everything the app talks to directly, such as the
    /// image host.
    pub fn with_backend(
        settings: Settings,
        http: Client,
        project: Arc<ProjectConfig>,
        backend: Arc<dyn DataService>,
    ) -> Self {
        let cache = Arc::new(QueryCache::new(settings.cache.stale_time()));
        Self {
            settings: Arc::new(settings),
            http,
            project,
            cache,
            backend,
        }
    }

    pub fn project(&self) -> &ProjectConfig {
        &self.project
    }

    pub fn ui(&self) -> &UiConfig {
        &self.project.ui
    }

    pub fn app_info(&self) -> AppInfo {
        AppInfo::project(&self.project)
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    pub fn top_depositors(&self) -> TopDepositors {
        TopDepositors::new(self.cache.clone(), self.backend.clone())
    }

    /// NFT returns of `user_id`, or of the session user when `None`
    pub fn nft_returns(&self, user_id: Option<String>) -> NftReturns {
        let user_id = user_id.or_else(|| self.settings.session.user_id.clone());
        NftReturns::new(self.cache.clone(), self.backend.clone(), user_id)
    }

    pub fn uploader(&self) -> ImageUploader {
        ImageUploader::with_endpoint(
            self.http.clone(),
            self.backend.clone(),
            self.settings.upload.endpoint.clone(),
        )
    }
}
