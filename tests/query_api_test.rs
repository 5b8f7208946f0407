//! Tests for the /query HTTP boundary

mod common;

use actix_web::{test, web, App};
use common::{catalog_store, engine, ScriptedCompletion, SHARPE_CATALOG};
use finperf_gateway::orchestrator::SessionStore;
use finperf_gateway::web::{catalog_reload_handler, health_check, query_handler, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn app_state(completion: Arc<ScriptedCompletion>, base_url: &str) -> web::Data<AppState> {
    let (catalog, file) = catalog_store(SHARPE_CATALOG);
    // Leak the tempfile handle so the catalogue file outlives the test app
    std::mem::forget(file);
    web::Data::new(AppState {
        engine: Arc::new(engine(Arc::clone(&catalog), completion, base_url)),
        sessions: SessionStore::new(),
        catalog,
    })
}

#[actix_rt::test]
async fn test_health_check() {
    let app = test::init_service(App::new().route("/health", web::get().to(health_check))).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "finperf-gateway");
}

#[actix_rt::test]
async fn test_query_clarification_keeps_session() {
    let state = app_state(ScriptedCompletion::empty(), "http://localhost:1");
    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .route("/query", web::post().to(query_handler)),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/query")
        .set_json(json!({"query": "tell me a joke"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert!(body["response"].as_str().unwrap().contains("rephrase"));
    assert_eq!(body["session_cleared"], json!(false));
    assert_eq!(body["current_endpoint"], Value::Null);
    assert_eq!(state.sessions.len(), 1);
}

#[actix_rt::test]
async fn test_query_slot_filling_across_turns_then_clears_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analytics/sharpe"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": 1.42})))
        .expect(1)
        .mount(&server)
        .await;

    let completion = ScriptedCompletion::new([
        // Turn 1: only the portfolio is mentioned
        r#"{"portfolio_name": "growth fund", "period": "null"}"#,
        "null",
        r#"{"exists": true, "matched": "Growth Fund", "closest": []}"#,
        // Turn 2: the period arrives
        r#"{"portfolio_name": "null", "period": "1Y"}"#,
        "null",
        r#"{"exists": true, "matched": "Growth Fund", "closest": []}"#,
    ]);
    let state = app_state(completion, &server.uri());
    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .route("/query", web::post().to(query_handler)),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/query")
        .set_json(json!({
            "query": "compute sharpe for growth fund",
            "session_id": "s1"
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["session_cleared"], json!(false));
    assert_eq!(body["current_endpoint"], json!("sharpe_ratio"));
    assert_eq!(body["params"]["portfolio_name"], json!("Growth Fund"));
    assert!(body["response"].as_str().unwrap().contains("period"));

    let req = test::TestRequest::post()
        .uri("/query")
        .set_json(json!({
            "query": "over one year please",
            "session_id": "s1"
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["session_cleared"], json!(true));
    assert!(body["response"].as_str().unwrap().contains("sharpe_ratio result"));
    // Session is gone; the next query starts a fresh cycle
    assert_eq!(state.sessions.len(), 0);

    // Transcript covers both turns
    let history = body["history"].as_array().unwrap();
    assert_eq!(history.len(), 4);
}

#[actix_rt::test]
async fn test_query_adopts_client_history() {
    let state = app_state(ScriptedCompletion::empty(), "http://localhost:1");
    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .route("/query", web::post().to(query_handler)),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/query")
        .set_json(json!({
            "query": "tell me a joke",
            "history": [
                {"role": "user", "content": "hello"},
                {"role": "assistant", "content": "hi"}
            ]
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let history = body["history"].as_array().unwrap();
    assert_eq!(history.len(), 4);
    assert_eq!(history[0]["content"], json!("hello"));
}

#[actix_rt::test]
async fn test_distinct_sessions_are_independent() {
    let completion = ScriptedCompletion::new([
        r#"{"portfolio_name": "Growth Fund", "period": "null"}"#,
        "null",
        r#"{"exists": true, "matched": "Growth Fund", "closest": []}"#,
    ]);
    let state = app_state(completion, "http://localhost:1");
    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .route("/query", web::post().to(query_handler)),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/query")
        .set_json(json!({"query": "compute sharpe for Growth Fund", "session_id": "a"}))
        .to_request();
    let _: Value = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/query")
        .set_json(json!({"query": "tell me a joke", "session_id": "b"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    // Session b never saw session a's endpoint
    assert_eq!(body["current_endpoint"], Value::Null);
    assert_eq!(state.sessions.len(), 2);
}

#[actix_rt::test]
async fn test_catalog_reload_endpoint() {
    let state = app_state(ScriptedCompletion::empty(), "http://localhost:1");
    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .route("/catalog/reload", web::post().to(catalog_reload_handler)),
    )
    .await;

    let req = test::TestRequest::post().uri("/catalog/reload").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], json!("reloaded"));
    assert_eq!(body["endpoints"], json!(2));
}
