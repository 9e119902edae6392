//! Shared fixtures for integration tests: an in-memory data service and
//! in-process HTTP servers on ephemeral ports.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use depositboard::{
    BackendResult, DataService, DepositUser, ProjectConfig, Transaction, TransactionKind,
};
use serde_json::json;
use std::sync::Mutex;

/// Data service answering from canned results and recording every call
pub struct MockBackend {
    pub depositors: BackendResult<Vec<DepositUser>>,
    pub transactions: BackendResult<Vec<Transaction>>,
    pub process_result: BackendResult<serde_json::Value>,
    pub api_key: BackendResult<Option<String>>,
    pub calls: Mutex<Vec<String>>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self {
            depositors: Ok(Vec::new()),
            transactions: Ok(Vec::new()),
            process_result: Ok(json!({ "processed": 0 })),
            api_key: Ok(None),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl MockBackend {
    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    /// Every recorded call, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of recorded calls starting with `prefix`
    pub fn count(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }
}

#[async_trait]
impl DataService for MockBackend {
    async fn query_top_depositors(&self) -> BackendResult<Vec<DepositUser>> {
        self.record("top_depositors".to_string());
        self.depositors.clone()
    }

    async fn query_user_transactions(
        &self,
        user_id: &str,
        kind: TransactionKind,
    ) -> BackendResult<Vec<Transaction>> {
        self.record(format!("transactions:{}:{}", user_id, kind));
        self.transactions.clone()
    }

    async fn invoke_process_nft_returns(&self) -> BackendResult<serde_json::Value> {
        self.record("process_nft_returns".to_string());
        self.process_result.clone()
    }

    async fn get_upload_api_key(&self) -> BackendResult<Option<String>> {
        self.record("upload_api_key".to_string());
        self.api_key.clone()
    }
}

pub fn depositor(rank: usize, total: f64) -> DepositUser {
    DepositUser {
        id: format!("user-{}", rank),
        username: format!("investor{}", rank),
        full_name: None,
        total_deposits: total,
    }
}

pub fn nft_return(id: &str, user_id: &str, amount: f64, day: u32) -> Transaction {
    Transaction {
        id: id.to_string(),
        user_id: user_id.to_string(),
        kind: TransactionKind::NftReturn,
        amount,
        status: Some("completed".to_string()),
        description: None,
        created_at: Utc.with_ymd_and_hms(2024, 6, day, 12, 0, 0).unwrap(),
    }
}

/// Configuration document whose data service lives at `supabase_url`
pub fn config_json(supabase_url: &str) -> serde_json::Value {
    json!({
        "project": {
            "name": "Vaultline",
            "version": "2.4.1",
            "description": "Deposits and NFT investments",
            "website": "https://vaultline.example",
            "logo": "/logo.png",
            "environment": "staging"
        },
        "supabase": {
            "url": supabase_url,
            "publishable_key": "sb_publishable_test"
        },
        "features": { "nft_investments": true },
        "ui": {
            "theme_color": "#0f172a",
            "currency_symbol": "$",
            "default_currency": "USD"
        }
    })
}

pub fn project_config(supabase_url: &str) -> ProjectConfig {
    serde_json::from_value(config_json(supabase_url)).unwrap()
}

/// Serve `router` on an ephemeral local port and return its base URL
pub async fn spawn_server(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}
