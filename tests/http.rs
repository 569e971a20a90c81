use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use docstore::api::server::create_app;
use docstore::DocStore;
use serde_json::{json, Value};
use tower::ServiceExt;

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("docstore_http_{}.json", name))
}

fn app(path: &std::path::Path) -> Router {
    let _ = std::fs::remove_file(path);
    create_app(DocStore::open(path).unwrap())
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn create_user_returns_201_without_credential() {
    let path = temp_path("create_ok");
    let (status, body) = post_json(
        app(&path),
        "/api/users",
        json!({
            "name": "Test User",
            "email": "test.user@example.com",
            "password": "strongPassword123",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Test User");
    assert_eq!(body["email"], "test.user@example.com");
    assert!(body["id"].is_string());
    assert!(body.get("password").is_none());
    assert!(body.get("passwordHash").is_none());

    // the record landed in the backing file with a hashed credential
    let store = DocStore::open(&path).unwrap();
    let stored = store
        .get_by_id("users", body["id"].as_str().unwrap())
        .unwrap()
        .unwrap();
    let hash = stored["passwordHash"].as_str().unwrap();
    assert!(!hash.is_empty());
    assert_ne!(hash, "strongPassword123");
    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn missing_password_returns_400_with_errors() {
    let path = temp_path("missing_password");
    let (status, body) = post_json(
        app(&path),
        "/api/users",
        json!({ "name": "Test User", "email": "test.user@example.com" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors = body["errors"].as_array().unwrap();
    assert!(!errors.is_empty());
    assert_eq!(errors[0]["field"], "password");

    // validation failures never reach the store
    let store = DocStore::open(&path).unwrap();
    assert!(store.list_all("users").unwrap().is_empty());
    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn every_missing_field_is_reported() {
    let path = temp_path("all_missing");
    let (status, body) = post_json(app(&path), "/api/users", json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"].as_array().unwrap().len(), 3);
    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn invalid_email_returns_400() {
    let path = temp_path("bad_email");
    let (status, body) = post_json(
        app(&path),
        "/api/users",
        json!({
            "name": "Test User",
            "email": "not-an-email",
            "password": "strongPassword123",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "email");
    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn malformed_json_returns_400_with_errors_shape() {
    let path = temp_path("malformed");
    let request = Request::builder()
        .method("POST")
        .uri("/api/users")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(app(&path), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!body["errors"].as_array().unwrap().is_empty());
    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn created_users_accumulate() {
    let path = temp_path("accumulate");
    let app = app(&path);

    for i in 0..3 {
        let (status, _) = post_json(
            app.clone(),
            "/api/users",
            json!({
                "name": format!("User {i}"),
                "email": format!("user{i}@example.com"),
                "password": "strongPassword123",
            }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let store = DocStore::open(&path).unwrap();
    assert_eq!(store.list_all("users").unwrap().len(), 3);
    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn api_docs_describes_the_user_endpoint() {
    let path = temp_path("api_docs");
    let (status, body) = get(app(&path), "/api-docs").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["openapi"], "3.0.0");
    assert!(body["paths"]["/api/users"]["post"].is_object());
    assert!(body["components"]["schemas"]["CreateUserInput"].is_object());
    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let path = temp_path("health");
    let (status, body) = get(app(&path), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    let _ = std::fs::remove_file(&path);
}
