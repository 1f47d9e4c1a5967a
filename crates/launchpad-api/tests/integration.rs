use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use launchpad_api::ApiServer;
use launchpad_config::{AppConfig, AppEnv};
use launchpad_test_support::mysql::start_mysql;
use serde_json::Value;
use sqlx::MySqlPool;
use sqlx::mysql::MySqlPoolOptions;
use tower::ServiceExt;

fn test_config(env: AppEnv, database_url: &str) -> AppConfig {
    AppConfig {
        port: 3001,
        env,
        database_url: database_url.to_string(),
    }
}

/// Pool pointing at a closed port; acquiring a connection fails quickly.
fn unreachable_pool() -> MySqlPool {
    MySqlPoolOptions::new()
        .acquire_timeout(Duration::from_secs(1))
        .connect_lazy("mysql://nobody@127.0.0.1:9/missing")
        .expect("lazy pool should parse the url")
}

fn offline_router(env: AppEnv) -> Router {
    let config = test_config(env, "mysql://nobody@127.0.0.1:9/missing");
    ApiServer::new(config, unreachable_pool()).into_router()
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should collect");
    serde_json::from_slice(&bytes).expect("body should be json")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request should build")
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request should build")
}

#[tokio::test]
async fn validation_failures_short_circuit_with_field_detail() {
    let router = offline_router(AppEnv::Test);

    let response = router
        .clone()
        .oneshot(post_json("/api/users", r#"{"name":"  ","email":"nope"}"#))
        .await
        .expect("router should respond");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["error"], "validation_failed");
    let details = body["details"].as_array().expect("details should be a list");
    assert_eq!(details.len(), 2);
    let fields: Vec<&str> = details
        .iter()
        .map(|entry| entry["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["name", "email"]);

    // Malformed JSON is rejected at the parse step with a body-level detail.
    let response = router
        .oneshot(post_json("/api/users", "{not json"))
        .await
        .expect("router should respond");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["details"][0]["field"], "body");
}

#[tokio::test]
async fn page_query_rules_reject_out_of_range_values() {
    let router = offline_router(AppEnv::Test);

    let response = router
        .oneshot(get("/api/users?page=0&per_page=500"))
        .await
        .expect("router should respond");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    let details = body["details"].as_array().expect("details should be a list");
    assert_eq!(details.len(), 2);
}

#[tokio::test]
async fn unknown_routes_return_the_error_envelope() {
    let router = offline_router(AppEnv::Test);

    let response = router
        .oneshot(get("/api/missing"))
        .await
        .expect("router should respond");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json(response).await;
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn database_failures_become_500_with_correlation_id_and_service_survives() {
    let router = offline_router(AppEnv::Production);

    let response = router
        .clone()
        .oneshot(get("/api/users/1"))
        .await
        .expect("router should respond");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json(response).await;
    assert_eq!(body["error"], "internal_server_error");
    let error_id = body["errorId"].as_str().expect("errorId should be present");
    assert!(!error_id.is_empty());
    // Production withholds the underlying message.
    assert!(body.get("message").is_none());

    // The process keeps serving after an internal error.
    let response = router
        .oneshot(get("/api/users/2"))
        .await
        .expect("router should respond");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json(response).await;
    assert!(body["errorId"].as_str().is_some_and(|id| !id.is_empty()));
}

#[tokio::test]
async fn health_reports_database_outage_as_503() {
    let router = offline_router(AppEnv::Production);

    let response = router
        .oneshot(get("/health"))
        .await
        .expect("router should respond");
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = read_json(response).await;
    assert_eq!(body["status"], "error");
    assert_eq!(body["checks"]["database"]["status"], "error");
    let message = body["checks"]["database"]["message"]
        .as_str()
        .expect("database failure should carry a message");
    assert!(!message.is_empty());
    // Debug metadata never leaks outside development mode.
    assert!(body.get("version").is_none());
    assert!(body.get("platform").is_none());
    assert!(body["uptime"].is_u64());
}

#[tokio::test]
async fn end_to_end_crud_and_health_against_a_real_database() -> anyhow::Result<()> {
    let database = match start_mysql() {
        Ok(db) => db,
        Err(err) => {
            eprintln!("skipping end_to_end_crud_and_health_against_a_real_database: {err}");
            return Ok(());
        }
    };

    // The health endpoint re-validates the live environment, so the test
    // process must carry a valid configuration. Rust 2024 makes env
    // mutation unsafe; this test is the only writer in the binary.
    unsafe {
        std::env::set_var("PORT", "3001");
        std::env::set_var("APP_ENV", "test");
        std::env::set_var("DATABASE_URL", database.connection_string());
    }

    let pool = launchpad_data::connect(database.connection_string()).await?;
    launchpad_data::run_migrations(&pool).await?;
    let config = test_config(AppEnv::Test, database.connection_string());
    let router = ApiServer::new(config, pool).into_router();

    // Create a user.
    let response = router
        .clone()
        .oneshot(post_json(
            "/api/users",
            r#"{"name":"Ada Lovelace","email":"ada@example.com"}"#,
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json(response).await;
    let user_id = body["data"]["id"].as_u64().expect("id should be numeric");
    assert_eq!(body["data"]["email"], "ada@example.com");

    // Duplicate email is a client error, not a fault.
    let response = router
        .clone()
        .oneshot(post_json(
            "/api/users",
            r#"{"name":"Imposter","email":"ada@example.com"}"#,
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["error"], "bad_request");

    // Fetch and list.
    let response = router
        .clone()
        .oneshot(get(&format!("/api/users/{user_id}")))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let response = router.clone().oneshot(get("/api/users")).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["pagination"]["total_pages"], 1);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));

    // Missing records map to 404.
    let response = router
        .clone()
        .oneshot(get("/api/users/999999"))
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Posts, including the author reference rule.
    let response = router
        .clone()
        .oneshot(post_json(
            "/api/posts",
            &format!(r#"{{"title":"Hello","content":"First post","author_id":{user_id},"published":true}}"#),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json(response).await;
    let post_id = body["data"]["id"].as_u64().expect("id should be numeric");
    assert_eq!(body["data"]["published"], true);

    let response = router
        .clone()
        .oneshot(post_json(
            "/api/posts",
            r#"{"title":"Orphan","content":"x","author_id":999999}"#,
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = router
        .clone()
        .oneshot(get(&format!("/api/posts/{post_id}")))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    // Health is green against the live database and valid environment.
    let response = router.clone().oneshot(get("/health")).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["checks"]["database"]["status"], "ok");
    assert_eq!(body["checks"]["configuration"]["status"], "ok");
    assert_eq!(body["environment"], "test");
    assert!(body.get("version").is_none());

    // Responses carry a request identifier for correlation.
    let response = router.oneshot(get("/health")).await?;
    assert!(response.headers().contains_key("x-request-id"));

    Ok(())
}
