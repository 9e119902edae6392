//! Project configuration document
//!
//! Shape of the static JSON file published next to the application.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The whole configuration document. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProjectConfig {
    pub project: ProjectInfo,
    pub supabase: SupabaseSettings,
    #[serde(default)]
    pub features: HashMap<String, bool>,
    pub ui: UiConfig,
}

/// Public identity of the deployment
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProjectInfo {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub logo: String,
    #[serde(default)]
    pub environment: String,
}

/// Where the data service lives and how to identify to it
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SupabaseSettings {
    pub url: String,
    pub publishable_key: String,
}

/// Presentation settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UiConfig {
    #[serde(default)]
    pub theme_color: String,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default = "default_currency")]
    pub default_currency: String,
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

fn default_currency() -> String {
    "USD".to_string()
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme_color: String::new(),
            currency_symbol: default_currency_symbol(),
            default_currency: default_currency(),
        }
    }
}

impl UiConfig {
    /// Monetary value with the configured symbol and two decimals
    pub fn format_amount(&self, value: f64) -> String {
        format!("{}{:.2}", self.currency_symbol, value)
    }
}

impl ProjectConfig {
    /// Parse a configuration document
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Feature flag lookup. Flags not listed are off.
    pub fn feature_enabled(&self, name: &str) -> bool {
        self.features.get(name).copied().unwrap_or(false)
    }
}

/// Simplified public-facing view of [`ProjectInfo`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppInfo {
    pub name: String,
    pub version: String,
    pub website: String,
    pub description: String,
    pub logo: String,
}

impl AppInfo {
    /// Project the info fields out of a loaded config, unchanged
    pub fn project(config: &ProjectConfig) -> Self {
        let project = &config.project;
        Self {
            name: project.name.clone(),
            version: project.version.clone(),
            website: project.website.clone(),
            description: project.description.clone(),
            logo: project.logo.clone(),
        }
    }
}

#[cfg(test)]
pub(crate) const SAMPLE_CONFIG: &str = r##"{
    "project": {
        "name": "Vaultline",
        "version": "2.4.1",
        "description": "Deposits and NFT investments",
        "website": "https://vaultline.example",
        "logo": "/logo.png",
        "environment": "production"
    },
    "supabase": {
        "url": "https://abc.supabase.co",
        "publishable_key": "sb_publishable_123"
    },
    "features": {
        "nft_investments": true,
        "referrals": false
    },
    "ui": {
        "theme_color": "#0f172a",
        "currency_symbol": "€",
        "default_currency": "EUR"
    }
}"##;
