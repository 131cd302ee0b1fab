use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::core::redis::RedisHandle;
use crate::core::state::AppState;
use crate::core::config::Settings;
use crate::services::generation::{CompletionBackend, GenerationService};
use crate::services::storage::FileStore;
use crate::test_support;

struct CountingBackend {
    calls: AtomicUsize,
}

#[async_trait]
impl CompletionBackend for CountingBackend {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("generated: {}", prompt.lines().next().unwrap_or_default()))
    }
}

/// The generate endpoint never touches the database, so a lazy pool is
/// enough.
async fn build_app(backend: Arc<dyn CompletionBackend>) -> axum::Router {
    let settings = Settings::load().expect("settings");
    let db = sqlx::PgPool::connect_lazy(&settings.database().database_url()).expect("lazy pool");
    let redis = RedisHandle::new(settings.redis().redis_url());
    let files = FileStore::from_settings(&settings).await.expect("file store");
    let generation = GenerationService::new(backend, settings.ai().cache_max_entries as usize);
    crate::api::router::router(AppState::new(settings, db, redis, files, generation))
}

fn generate_body() -> serde_json::Value {
    json!({
        "studentClass": "Class 5",
        "subject": "Math",
        "topic": "Fractions",
        "difficulty": "Easy",
        "type": "MCQ",
        "count": 5
    })
}

#[tokio::test]
async fn generate_returns_success_and_result() {
    let _guard = test_support::env_lock().await;
    test_support::set_test_env();

    let app = build_app(Arc::new(test_support::EchoBackend)).await;

    let response = app
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/generate",
            None,
            Some(generate_body()),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = test_support::read_json(response).await;
    assert_eq!(json["success"], true);
    let result = json["result"].as_str().expect("result text");
    assert!(!result.is_empty());
}

#[tokio::test]
async fn generate_without_count_returns_400() {
    let _guard = test_support::env_lock().await;
    test_support::set_test_env();

    let app = build_app(Arc::new(test_support::EchoBackend)).await;

    let mut body = generate_body();
    body.as_object_mut().unwrap().remove("count");

    let response = app
        .oneshot(test_support::json_request(Method::POST, "/api/generate", None, Some(body)))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = test_support::read_json(response).await;
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn generate_with_blank_topic_returns_400() {
    let _guard = test_support::env_lock().await;
    test_support::set_test_env();

    let app = build_app(Arc::new(test_support::EchoBackend)).await;

    let mut body = generate_body();
    body["topic"] = json!("   ");

    let response = app
        .oneshot(test_support::json_request(Method::POST, "/api/generate", None, Some(body)))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = test_support::read_json(response).await;
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn generate_with_out_of_range_count_returns_400() {
    let _guard = test_support::env_lock().await;
    test_support::set_test_env();

    let app = build_app(Arc::new(test_support::EchoBackend)).await;

    let mut body = generate_body();
    body["count"] = json!(51);

    let response = app
        .oneshot(test_support::json_request(Method::POST, "/api/generate", None, Some(body)))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn repeated_generate_hits_the_cache() {
    let _guard = test_support::env_lock().await;
    test_support::set_test_env();

    let backend = Arc::new(CountingBackend { calls: AtomicUsize::new(0) });
    let app = build_app(backend.clone()).await;

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/generate",
                None,
                Some(generate_body()),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }

    assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn chat_message_bypasses_the_cache() {
    let _guard = test_support::env_lock().await;
    test_support::set_test_env();

    let backend = Arc::new(CountingBackend { calls: AtomicUsize::new(0) });
    let app = build_app(backend.clone()).await;

    let mut body = generate_body();
    body["message"] = json!("explain the first question");

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/generate",
                None,
                Some(body.clone()),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }

    assert_eq!(backend.calls.load(Ordering::SeqCst), 2);
}
