//! Data hooks over an in-memory data service.

mod common;

use common::{depositor, nft_return, project_config, MockBackend};
use depositboard::hooks::{
    NFT_INVESTMENTS_KEY, NFT_RETURNS_FALLBACK_ERROR, NFT_RETURNS_KEY,
    TOP_DEPOSITORS_FALLBACK_ERROR, USER_BALANCE_KEY,
};
use depositboard::{views, App, BackendError, QueryKey, Remote, Settings};
use serde_json::json;
use std::sync::Arc;

fn app_with(backend: Arc<MockBackend>) -> App {
    App::with_backend(
        Settings::default(),
        reqwest::Client::new(),
        Arc::new(project_config("https://abc.supabase.co")),
        backend,
    )
}

#[tokio::test]
async fn test_top_depositors_first_five_ranked() {
    let users: Vec<_> = (1..=8)
        .map(|rank| depositor(rank, 10_000.0 / rank as f64))
        .collect();
    let backend = Arc::new(MockBackend {
        depositors: Ok(users.clone()),
        ..Default::default()
    });
    let app = app_with(backend.clone());
    let hook = app.top_depositors();

    assert!(hook.state().is_loading());

    let state = hook.load().await;
    let shown = state.data().unwrap();
    assert_eq!(shown.len(), 5);
    assert_eq!(shown.as_slice(), &users[..5]);

    let text = views::render_top_depositors(&state, app.ui());
    let lines: Vec<&str> = text.lines().skip(1).collect();
    assert_eq!(lines.len(), 5);
    for (i, line) in lines.iter().enumerate() {
        let expected = format!("#{} investor{} ", i + 1, i + 1);
        assert!(line.starts_with(&expected), "{}", line);
    }
}

#[tokio::test]
async fn test_top_depositors_reuses_cache() {
    let backend = Arc::new(MockBackend {
        depositors: Ok(vec![depositor(1, 50.0)]),
        ..Default::default()
    });
    let app = app_with(backend.clone());

    // two mounted panels share one request
    let first = app.top_depositors();
    let second = app.top_depositors();
    let (a, b) = tokio::join!(first.load(), second.load());
    assert_eq!(a, b);

    app.top_depositors().load().await;
    assert_eq!(backend.count("top_depositors"), 1);
}

#[tokio::test]
async fn test_top_depositors_errors() {
    let backend = Arc::new(MockBackend {
        depositors: Err(BackendError::Api {
            status: 403,
            message: Some("permission denied for table users".to_string()),
            code: Some("42501".to_string()),
        }),
        ..Default::default()
    });
    let state = app_with(backend).top_depositors().load().await;
    assert_eq!(state.error(), Some("permission denied for table users"));

    let backend = Arc::new(MockBackend {
        depositors: Err(BackendError::Transport("connection reset".to_string())),
        ..Default::default()
    });
    let hook = app_with(backend).top_depositors();
    let state = hook.load().await;
    assert_eq!(state.error(), Some(TOP_DEPOSITORS_FALLBACK_ERROR));
    assert_eq!(hook.state(), state);
}

#[tokio::test]
async fn test_nft_returns_disabled_without_user() {
    let backend = Arc::new(MockBackend::default());
    let app = app_with(backend.clone());
    let hook = app.nft_returns(None);

    assert!(!hook.is_enabled());
    assert_eq!(hook.state(), Remote::Ready(Vec::new()));

    let state = hook.load().await;
    assert_eq!(state, Remote::Ready(Vec::new()));
    assert!(state.error().is_none());
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn test_nft_returns_for_user() {
    let returns = vec![
        nft_return("t2", "u1", 5.0, 2),
        nft_return("t1", "u1", 4.5, 1),
    ];
    let backend = Arc::new(MockBackend {
        transactions: Ok(returns.clone()),
        ..Default::default()
    });
    let app = app_with(backend.clone());
    let hook = app.nft_returns(Some("u1".to_string()));
    let mut rx = hook.subscribe();

    let state = hook.load().await;
    assert_eq!(state, Remote::Ready(returns));
    assert_eq!(backend.calls(), vec!["transactions:u1:nft_return".to_string()]);

    rx.changed().await.unwrap();
    assert!(rx.borrow().is_ready());
}

#[tokio::test]
async fn test_nft_returns_error_fallback() {
    let backend = Arc::new(MockBackend {
        transactions: Err(BackendError::Decode("expected array".to_string())),
        ..Default::default()
    });
    let state = app_with(backend)
        .nft_returns(Some("u1".to_string()))
        .load()
        .await;
    assert_eq!(state.error(), Some(NFT_RETURNS_FALLBACK_ERROR));
}

#[tokio::test]
async fn test_process_returns_invalidates_related_keys() {
    let backend = Arc::new(MockBackend {
        transactions: Ok(vec![nft_return("t1", "u1", 4.5, 1)]),
        process_result: Ok(json!({ "processed": 2, "total_paid": 9.0 })),
        ..Default::default()
    });
    let app = app_with(backend.clone());
    let hook = app.nft_returns(Some("u1".to_string()));

    hook.load().await;
    hook.load().await;
    assert_eq!(backend.count("transactions"), 1);

    let result = hook.process_returns().await.unwrap();
    assert_eq!(result, json!({ "processed": 2, "total_paid": 9.0 }));

    let cache = app.cache();
    for name in [NFT_INVESTMENTS_KEY, NFT_RETURNS_KEY, USER_BALANCE_KEY] {
        assert_eq!(cache.invalidation_count(&QueryKey::resource(name)).await, 1);
    }
    assert!(
        cache
            .is_stale(&QueryKey::resource(NFT_RETURNS_KEY).with("u1"))
            .await
    );

    // next read refetches
    hook.load().await;
    assert_eq!(backend.count("transactions"), 2);
}

#[tokio::test]
async fn test_process_returns_failure_is_returned() {
    let backend = Arc::new(MockBackend {
        process_result: Err(BackendError::Api {
            status: 400,
            message: Some("no returns due".to_string()),
            code: None,
        }),
        ..Default::default()
    });
    let app = app_with(backend.clone());
    let hook = app.nft_returns(None);

    let err = hook.process_returns().await.unwrap_err();
    assert_eq!(err.to_string(), "no returns due");
    assert_eq!(backend.count("process_nft_returns"), 1);

    for name in [NFT_INVESTMENTS_KEY, NFT_RETURNS_KEY, USER_BALANCE_KEY] {
        assert_eq!(
            app.cache()
                .invalidation_count(&QueryKey::resource(name))
                .await,
            0
        );
    }
}
