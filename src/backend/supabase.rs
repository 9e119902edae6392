//! Supabase REST client
//!
//! Talks to the PostgREST surface of a Supabase project (`<url>/rest/v1`).

use super::error::{BackendError, BackendResult};
use super::models::{DepositUser, Transaction, TransactionKind};
use super::DataService;
use crate::project::SupabaseSettings;
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Table ranked by deposit totals
pub const USERS_TABLE: &str = "users";
/// Ledger table
pub const TRANSACTIONS_TABLE: &str = "transactions";
/// Single-row settings table
pub const SITE_SETTINGS_TABLE: &str = "site_settings";
/// Stored procedure paying out due NFT returns
pub const PROCESS_NFT_RETURNS_RPC: &str = "process_nft_returns";

/// Number of users in the deposit ranking
pub const TOP_DEPOSITORS_LIMIT: usize = 5;

/// Supabase data service client
pub struct SupabaseClient {
    client: Client,
    rest_url: String,
    publishable_key: String,
    access_token: Option<String>,
}

impl SupabaseClient {
    /// Create a client for the project described by `settings`
    pub fn new(client: Client, settings: &SupabaseSettings) -> Self {
        Self {
            client,
            rest_url: format!("{}/rest/v1", settings.url.trim_end_matches('/')),
            publishable_key: settings.publishable_key.clone(),
            access_token: None,
        }
    }

    /// Act as a signed-in user instead of the anonymous role
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn rest_url(&self) -> &str {
        &self.rest_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let bearer = self
            .access_token
            .as_deref()
            .unwrap_or(&self.publishable_key);

        self.client
            .request(method, format!("{}/{}", self.rest_url, path))
            .header("apikey", &self.publishable_key)
            .bearer_auth(bearer)
    }

    async fn send(&self, builder: RequestBuilder) -> BackendResult<reqwest::Response> {
        let response = builder.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let parsed = serde_json::from_str::<PostgrestError>(&body).ok();
        let (message, code) = match parsed {
            Some(err) => (err.message.filter(|m| !m.trim().is_empty()), err.code),
            None => (None, None),
        };

        tracing::warn!(
            status = status.as_u16(),
            code = ?code,
            message = ?message,
            "Data service request failed"
        );

        Err(BackendError::Api {
            status: status.as_u16(),
            message,
            code,
        })
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        params: &[(&str, String)],
    ) -> BackendResult<Vec<T>> {
        let response = self
            .send(self.request(Method::GET, table).query(params))
            .await?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl DataService for SupabaseClient {
    async fn query_top_depositors(&self) -> BackendResult<Vec<DepositUser>> {
        self.select(
            USERS_TABLE,
            &[
                ("select", "id,username,full_name,total_deposits".to_string()),
                ("order", "total_deposits.desc".to_string()),
                ("limit", TOP_DEPOSITORS_LIMIT.to_string()),
            ],
        )
        .await
    }

    async fn query_user_transactions(
        &self,
        user_id: &str,
        kind: TransactionKind,
    ) -> BackendResult<Vec<Transaction>> {
        self.select(
            TRANSACTIONS_TABLE,
            &[
                ("select", "*".to_string()),
                ("user_id", format!("eq.{}", user_id)),
                ("type", format!("eq.{}", kind)),
                ("order", "created_at.desc".to_string()),
            ],
        )
        .await
    }

    async fn invoke_process_nft_returns(&self) -> BackendResult<serde_json::Value> {
        let path = format!("rpc/{}", PROCESS_NFT_RETURNS_RPC);
        let response = self
            .send(
                self.request(Method::POST, &path)
                    .json(&serde_json::json!({})),
            )
            .await?;

        // void procedures answer with an empty body
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| BackendError::Decode(e.to_string()))
    }

    async fn get_upload_api_key(&self) -> BackendResult<Option<String>> {
        let rows: Vec<SiteSettingsRow> = self
            .select(
                SITE_SETTINGS_TABLE,
                &[
                    ("select", "imgbb_api_key".to_string()),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;

        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| BackendError::NotFound(format!("{} row", SITE_SETTINGS_TABLE)))?;

        Ok(row.imgbb_api_key)
    }
}

// ============================================
// Response DTOs
// ============================================

#[derive(Debug, Deserialize)]
struct PostgrestError {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SiteSettingsRow {
    #[serde(default)]
    imgbb_api_key: Option<String>,
}
