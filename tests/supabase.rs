//! Supabase client against a fake PostgREST server.

mod common;

use axum::{
    extract::Query,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use common::{config_json, spawn_server};
use depositboard::project::SupabaseSettings;
use depositboard::{views, App, BackendError, DataService, Settings, SupabaseClient, TransactionKind};
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

type Seen = Arc<Mutex<Vec<(HashMap<String, String>, HeaderMap)>>>;

fn settings(url: &str) -> SupabaseSettings {
    SupabaseSettings {
        url: url.to_string(),
        publishable_key: "sb_publishable_test".to_string(),
    }
}

fn fake_postgrest(seen: Seen) -> Router {
    let users_seen = seen.clone();
    let tx_seen = seen;

    Router::new()
        .route(
            "/rest/v1/users",
            get(
                move |Query(params): Query<HashMap<String, String>>, headers: HeaderMap| {
                    let seen = users_seen.clone();
                    async move {
                        seen.lock().unwrap().push((params, headers));
                        Json(json!([
                            { "id": "a", "username": "alice", "full_name": "Alice A", "total_deposits": 900.5 },
                            { "id": "b", "username": "bob", "full_name": null, "total_deposits": 400 },
                            { "id": "c", "username": "carol", "total_deposits": 10 }
                        ]))
                    }
                },
            ),
        )
        .route(
            "/rest/v1/transactions",
            get(
                move |Query(params): Query<HashMap<String, String>>, headers: HeaderMap| {
                    let seen = tx_seen.clone();
                    async move {
                        seen.lock().unwrap().push((params, headers));
                        Json(json!([
                            {
                                "id": "t2", "user_id": "u1", "type": "nft_return", "amount": 5,
                                "status": "completed", "description": "June return",
                                "created_at": "2024-06-02T12:00:00Z"
                            },
                            {
                                "id": "t1", "user_id": "u1", "type": "nft_return", "amount": 4.5,
                                "created_at": "2024-06-01T12:00:00+00:00"
                            }
                        ]))
                    }
                },
            ),
        )
        .route(
            "/rest/v1/rpc/process_nft_returns",
            post(|| async { Json(json!({ "processed": 3 })) }),
        )
        .route(
            "/rest/v1/site_settings",
            get(|| async { Json(json!([{ "imgbb_api_key": "imgbb-key" }])) }),
        )
}

#[tokio::test]
async fn test_top_depositors_query() {
    let seen: Seen = Arc::default();
    let base = spawn_server(fake_postgrest(seen.clone())).await;
    let client = SupabaseClient::new(reqwest::Client::new(), &settings(&base));

    let users = client.query_top_depositors().await.unwrap();
    assert_eq!(users.len(), 3);
    assert_eq!(users[0].display_name(), "Alice A");
    assert_eq!(users[1].full_name, None);
    assert_eq!(users[1].total_deposits, 400.0);

    let seen = seen.lock().unwrap();
    let (params, headers) = &seen[0];
    assert_eq!(params["select"], "id,username,full_name,total_deposits");
    assert_eq!(params["order"], "total_deposits.desc");
    assert_eq!(params["limit"], "5");
    assert_eq!(headers["apikey"], "sb_publishable_test");
    assert_eq!(headers["authorization"], "Bearer sb_publishable_test");
}

#[tokio::test]
async fn test_user_transactions_query() {
    let seen: Seen = Arc::default();
    let base = spawn_server(fake_postgrest(seen.clone())).await;
    let client =
        SupabaseClient::new(reqwest::Client::new(), &settings(&base)).with_access_token("user-jwt");

    let txs = client
        .query_user_transactions("u1", TransactionKind::NftReturn)
        .await
        .unwrap();
    assert_eq!(txs.len(), 2);
    assert_eq!(txs[0].id, "t2");
    assert!(txs[0].created_at > txs[1].created_at);

    let seen = seen.lock().unwrap();
    let (params, headers) = &seen[0];
    assert_eq!(params["user_id"], "eq.u1");
    assert_eq!(params["type"], "eq.nft_return");
    assert_eq!(params["order"], "created_at.desc");
    assert_eq!(headers["authorization"], "Bearer user-jwt");
}

#[tokio::test]
async fn test_rpc_and_api_key() {
    let base = spawn_server(fake_postgrest(Arc::default())).await;
    let client = SupabaseClient::new(reqwest::Client::new(), &settings(&base));

    let result = client.invoke_process_nft_returns().await.unwrap();
    assert_eq!(result, json!({ "processed": 3 }));

    let key = client.get_upload_api_key().await.unwrap();
    assert_eq!(key.as_deref(), Some("imgbb-key"));
}

#[tokio::test]
async fn test_void_rpc_and_missing_settings_row() {
    let router = Router::new()
        .route(
            "/rest/v1/rpc/process_nft_returns",
            post(|| async { StatusCode::NO_CONTENT }),
        )
        .route("/rest/v1/site_settings", get(|| async { Json(json!([])) }));
    let base = spawn_server(router).await;
    let client = SupabaseClient::new(reqwest::Client::new(), &settings(&base));

    let result = client.invoke_process_nft_returns().await.unwrap();
    assert!(result.is_null());

    let err = client.get_upload_api_key().await.unwrap_err();
    assert!(matches!(err, BackendError::NotFound(_)));
}

#[tokio::test]
async fn test_service_error_message() {
    let router = Router::new()
        .route(
            "/rest/v1/users",
            get(|| async {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({ "code": "PGRST301", "message": "JWT expired", "details": null, "hint": null })),
                )
            }),
        )
        .route(
            "/rest/v1/rpc/process_nft_returns",
            post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );
    let base = spawn_server(router).await;
    let client = SupabaseClient::new(reqwest::Client::new(), &settings(&base));

    let err = client.query_top_depositors().await.unwrap_err();
    assert_eq!(
        err,
        BackendError::Api {
            status: 401,
            message: Some("JWT expired".to_string()),
            code: Some("PGRST301".to_string()),
        }
    );
    assert_eq!(err.to_string(), "JWT expired");

    let err = client.invoke_process_nft_returns().await.unwrap_err();
    assert_eq!(err.service_message(), None);
    assert_eq!(err.message_or("Failed to process"), "Failed to process");
}

#[tokio::test]
async fn test_app_end_to_end() {
    let base = spawn_server(fake_postgrest(Arc::default())).await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, config_json(&base).to_string()).unwrap();

    let mut settings = Settings::default();
    settings.app.config_file = Some(path);
    settings.session.user_id = Some("u1".to_string());

    let app = App::init(settings).await.unwrap();
    assert_eq!(app.app_info().name, "Vaultline");
    assert!(app.project().feature_enabled("nft_investments"));

    let ranking = app.top_depositors().load().await;
    let text = views::render_top_depositors(&ranking, app.ui());
    assert_eq!(
        text,
        "Top Depositors\n#1 Alice A $900.50\n#2 bob $400.00\n#3 carol $10.00"
    );

    let returns = app.nft_returns(None);
    assert_eq!(returns.user_id(), Some("u1"));
    let state = returns.load().await;
    assert_eq!(state.data().map(|t| t.len()), Some(2));
}
