//! End-to-end tests against a mock budgeting API over real HTTP.

use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{json, Value};

use budget_client::api::models::Credentials;
use budget_client::config::RetryConfig;
use budget_client::http::ReqwestTransport;
use budget_client::session::LoginRedirect;
use budget_client::{BudgetApi, ErrorKind, RequestClient, SessionController, TokenStore};

mod common;

#[derive(Default)]
struct CountingRedirect(AtomicUsize);

impl LoginRedirect for CountingRedirect {
    fn redirect_to_login(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

fn client(
    transport: ReqwestTransport,
    tokens: TokenStore,
    redirect: Arc<CountingRedirect>,
) -> RequestClient {
    let retry = RetryConfig {
        base_delay_ms: 10,
        ..RetryConfig::default()
    };
    RequestClient::new(transport, tokens, Arc::new(SessionController::new(redirect)))
        .with_retry_config(retry)
        .with_timeout(Duration::from_secs(5))
}

#[tokio::test]
async fn test_login_then_transparent_refresh() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = seen.clone();
    let addr = common::start_mock_api(move |req| {
        log.lock().unwrap().push(req.clone());
        match (req.method.as_str(), req.path.as_str()) {
            ("POST", "/api/auth/login") => (
                200,
                json!({"token": "expired", "refreshToken": "refresh-1"}).to_string(),
            ),
            ("POST", "/api/auth/refresh-token") => {
                assert_eq!(req.json()["refreshToken"], "refresh-1");
                (200, json!({"token": "fresh"}).to_string())
            }
            ("GET", "/api/budget") if req.bearer() == Some("fresh") => {
                (200, json!([{"id": 1, "name": "Home"}]).to_string())
            }
            ("GET", "/api/budget") => (401, json!({"message": "jwt expired"}).to_string()),
            _ => (404, String::new()),
        }
    })
    .await;

    let redirect = Arc::new(CountingRedirect::default());
    let tokens = TokenStore::in_memory();
    let api = BudgetApi::new(
        client(common::transport(addr), tokens.clone(), redirect.clone()),
        Default::default(),
    );

    api.auth()
        .login(&Credentials {
            email: "ana@example.com".into(),
            password: "secret".into(),
        })
        .await
        .unwrap();

    let budgets = api.budgets().list().await.unwrap();
    assert_eq!(budgets[0].name, "Home");
    assert_eq!(tokens.access_token().as_deref(), Some("fresh"));
    assert_eq!(tokens.refresh_token().as_deref(), Some("refresh-1"));
    assert_eq!(redirect.0.load(Ordering::SeqCst), 0);

    let seen = seen.lock().unwrap();
    let paths: Vec<&str> = seen.iter().map(|r| r.path.as_str()).collect();
    assert_eq!(
        paths,
        ["/api/auth/login", "/api/budget", "/api/auth/refresh-token", "/api/budget"]
    );
    for request in seen.iter() {
        assert_eq!(request.headers["content-type"], "application/json");
        assert!(request.headers.contains_key("x-request-id"));
    }
    assert!(seen[0].bearer().is_none());
}

#[tokio::test]
async fn test_unrecoverable_session_redirects_once() {
    let addr = common::start_mock_api(|req| match req.path.as_str() {
        "/api/auth/refresh-token" => (401, json!({"message": "refresh expired"}).to_string()),
        _ => (401, json!({"message": "jwt expired"}).to_string()),
    })
    .await;

    let redirect = Arc::new(CountingRedirect::default());
    let tokens = TokenStore::in_memory();
    tokens.store("expired", Some("expired-refresh"));
    let client = Arc::new(client(common::transport(addr), tokens.clone(), redirect.clone()));

    let tasks: Vec<_> = (0..4)
        .map(|i| {
            let client = client.clone();
            tokio::spawn(async move { client.get::<Value>(&format!("/entries/{}", i)).await })
        })
        .collect();

    for task in tasks {
        let err = task.await.unwrap().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authentication);
        assert_eq!(err.title(), "Authentication Required");
    }
    assert!(tokens.access_token().is_none());
    assert!(tokens.refresh_token().is_none());
    assert_eq!(redirect.0.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_service_unavailable_is_retried() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();
    let addr = common::start_mock_api(move |_| {
        if counter.fetch_add(1, Ordering::SeqCst) < 2 {
            (503, String::new())
        } else {
            (200, json!({"debtToIncome": 0.25, "score": 80}).to_string())
        }
    })
    .await;

    let api = BudgetApi::new(
        client(
            common::transport(addr),
            TokenStore::in_memory(),
            Arc::new(CountingRedirect::default()),
        ),
        Default::default(),
    );

    let indicators = api.indicators().fetch(3).await.unwrap();
    assert_eq!(indicators.score, 80.0);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_validation_errors_are_not_retried() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();
    let addr = common::start_mock_api(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        (
            400,
            json!({
                "message": "Validation failed",
                "errors": [
                    {"field": "name", "message": "Name is required"},
                    {"field": "currency", "message": "Unknown currency"}
                ]
            })
            .to_string(),
        )
    })
    .await;

    let api = BudgetApi::new(
        client(
            common::transport(addr),
            TokenStore::in_memory(),
            Arc::new(CountingRedirect::default()),
        ),
        Default::default(),
    );

    let input = budget_client::api::models::BudgetInput {
        name: String::new(),
        description: None,
        currency: Some("XXX".into()),
    };
    let err = api.budgets().create(&input).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.status_code(), Some(400));
    let fields = err.field_errors().unwrap();
    assert_eq!(fields["name"], "Name is required");
    assert_eq!(fields["currency"], "Unknown currency");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_unreachable_api_is_network_error() {
    let addr = common::closed_addr().await;
    let api = BudgetApi::new(
        client(
            common::transport(addr),
            TokenStore::in_memory(),
            Arc::new(CountingRedirect::default()),
        ),
        Default::default(),
    );

    let err = api.budgets().list().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
    assert_eq!(err.title(), "Connection Error");
    assert!(err.status_code().is_none());
}

#[tokio::test]
async fn test_tokens_persist_in_file_store() {
    let addr = common::start_mock_api(|req| match req.path.as_str() {
        "/api/auth/login" => (200, json!({"token": "a1", "refreshToken": "r1"}).to_string()),
        _ => (404, String::new()),
    })
    .await;

    let dir = std::env::temp_dir().join(format!("budget-client-test-{}", addr.port()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("store.json");
    let path_str = path.to_str().unwrap().to_string();

    {
        let store = budget_client::storage::open_store(Some(&path_str));
        let api = BudgetApi::new(
            client(
                common::transport(addr),
                TokenStore::new(store),
                Arc::new(CountingRedirect::default()),
            ),
            Default::default(),
        );
        api.auth()
            .login(&Credentials {
                email: "ana@example.com".into(),
                password: "secret".into(),
            })
            .await
            .unwrap();
    }

    let reopened = TokenStore::new(budget_client::storage::open_store(Some(&path_str)));
    assert_eq!(reopened.access_token().as_deref(), Some("a1"));
    assert_eq!(reopened.refresh_token().as_deref(), Some("r1"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_truncated_body_is_retried_as_network_failure() {
    let addr = common::start_truncating_api(2, r#"{"id": 4, "name": "Trip"}"#).await;
    let api = BudgetApi::new(
        client(
            common::transport(addr),
            TokenStore::in_memory(),
            Arc::new(CountingRedirect::default()),
        ),
        Default::default(),
    );

    let budget = api.budgets().get(4).await.unwrap();
    assert_eq!(budget.name, "Trip");
}

#[tokio::test]
async fn test_truncated_body_exhausts_as_network_error() {
    let addr = common::start_truncating_api(u32::MAX, r#"{"id": 4}"#).await;
    let api = BudgetApi::new(
        client(
            common::transport(addr),
            TokenStore::in_memory(),
            Arc::new(CountingRedirect::default()),
        ),
        Default::default(),
    );

    let err = api.budgets().get(4).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_refreshes_leave_store_readable() {
    let addr = common::start_mock_api(|req| match req.path.as_str() {
        "/api/auth/refresh-token" => (
            200,
            json!({"token": "fresh", "refreshToken": "refresh-2"}).to_string(),
        ),
        _ if req.bearer() == Some("fresh") => (200, json!({"ok": true}).to_string()),
        _ => (401, json!({"message": "jwt expired"}).to_string()),
    })
    .await;

    let path =
        std::env::temp_dir().join(format!("budget-client-{}.json", uuid::Uuid::new_v4()));
    let path_str = path.to_str().unwrap().to_string();
    let tokens = TokenStore::new(budget_client::storage::open_store(Some(&path_str)));
    tokens.store("expired", Some("refresh-1"));

    let redirect = Arc::new(CountingRedirect::default());
    let client = Arc::new(client(common::transport(addr), tokens, redirect.clone()));
    let tasks: Vec<_> = (0..16)
        .map(|i| {
            let client = client.clone();
            tokio::spawn(async move { client.get::<Value>(&format!("/entries/{}", i)).await })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }
    assert_eq!(redirect.0.load(Ordering::SeqCst), 0);

    let content = std::fs::read_to_string(&path).unwrap();
    let on_disk: std::collections::HashMap<String, String> =
        serde_json::from_str(&content).unwrap();
    assert_eq!(on_disk["token"], "fresh");
    assert_eq!(on_disk["refreshToken"], "refresh-2");

    let _ = std::fs::remove_file(&path);
}
