//! HTTP surface tests
//!
//! Drive the assembled router with in-memory storage via `oneshot`.

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use webapi_server::app_state::AppState;
use webapi_server::auth::BcryptHasher;
use webapi_server::config::AuthConfig;
use webapi_server::db::StoreError;
use webapi_server::models::{NewUser, User};
use webapi_server::routes::api_router;
use webapi_server::users::{InMemoryUserRepository, MemoryUnitOfWork, UserRepository};

fn auth_config() -> AuthConfig {
    AuthConfig {
        audience: "webapi".to_string(),
        token_kind: "Bearer".to_string(),
        jwt_secret: "api-test-secret".to_string(),
    }
}

fn app(repo: InMemoryUserRepository) -> Router {
    app_with_timeout(repo, Duration::from_secs(10))
}

fn app_with_timeout<R>(repo: R, auth_timeout: Duration) -> Router
where
    R: UserRepository + Clone + 'static,
{
    let state = AppState::new(repo, BcryptHasher::new(4), &auth_config(), auth_timeout);
    api_router(state)
}

/// Store whose email lookup never completes
#[derive(Clone, Default)]
struct StalledRepository {
    inner: InMemoryUserRepository,
    lookups_started: Arc<AtomicUsize>,
}

#[async_trait]
impl UserRepository for StalledRepository {
    type Unit = MemoryUnitOfWork;

    async fn begin(&self) -> Result<MemoryUnitOfWork, StoreError> {
        self.inner.begin().await
    }

    async fn find_by_id(
        &self,
        unit: &mut MemoryUnitOfWork,
        id: i64,
    ) -> Result<Option<User>, StoreError> {
        self.inner.find_by_id(unit, id).await
    }

    async fn find_by_email(
        &self,
        _unit: &mut MemoryUnitOfWork,
        _email: &str,
    ) -> Result<Option<User>, StoreError> {
        self.lookups_started.fetch_add(1, Ordering::SeqCst);
        std::future::pending().await
    }

    async fn create(
        &self,
        unit: &mut MemoryUnitOfWork,
        new_user: NewUser,
    ) -> Result<User, StoreError> {
        self.inner.create(unit, new_user).await
    }
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_with_token(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

async fn register(app: &Router, email: &str, password: &str) -> Value {
    let (status, body) = send(
        app,
        post_json(
            "/users",
            json!({ "name": "Alice", "email": email, "password": password }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

async fn login(app: &Router, email: &str, password: &str) -> (StatusCode, Value) {
    send(
        app,
        post_json("/auth/login", json!({ "email": email, "password": password })),
    )
    .await
}

#[tokio::test]
async fn test_register_then_login() {
    let app = app(InMemoryUserRepository::new());
    let user = register(&app, "a@x.com", "secret").await;
    assert_eq!(user["email"], "a@x.com");
    assert!(user.get("password_hash").is_none());

    let (status, session) = login(&app, "a@x.com", "secret").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["kind"], "Bearer");
    assert!(!session["access_token"].as_str().unwrap().is_empty());
    assert!(session["expires_at"].is_string());
}

#[tokio::test]
async fn test_unknown_email_and_wrong_password_look_identical() {
    let app = app(InMemoryUserRepository::new());
    register(&app, "a@x.com", "secret").await;

    let (wrong_status, wrong_body) = login(&app, "a@x.com", "wrong").await;
    let (unknown_status, unknown_body) = login(&app, "nobody@x.com", "x").await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);
}

#[tokio::test]
async fn test_soft_deleted_user_login_looks_like_unknown_email() {
    let repo = InMemoryUserRepository::new();
    let app = app(repo.clone());
    let user = register(&app, "a@x.com", "secret").await;
    let (_, unknown_body) = login(&app, "nobody@x.com", "x").await;

    repo.soft_delete(user["id"].as_i64().unwrap()).unwrap();

    let (status, body) = login(&app, "a@x.com", "secret").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, unknown_body);
}

#[tokio::test]
async fn test_empty_credentials_are_rejected_at_the_boundary() {
    let app = app(InMemoryUserRepository::new());

    let (status, body) = login(&app, "", "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_storage_outage_is_server_error() {
    let repo = InMemoryUserRepository::new();
    let app = app(repo.clone());
    register(&app, "a@x.com", "secret").await;

    repo.set_unavailable(true);
    let (status, body) = login(&app, "a@x.com", "secret").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "DATABASE_ERROR");
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() {
    let app = app(InMemoryUserRepository::new());
    register(&app, "a@x.com", "secret").await;

    let (status, body) = send(
        &app,
        post_json(
            "/users",
            json!({ "name": "Bob", "email": "a@x.com", "password": "other" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_current_user_with_issued_token() {
    let app = app(InMemoryUserRepository::new());
    let user = register(&app, "a@x.com", "secret").await;
    let (_, session) = login(&app, "a@x.com", "secret").await;
    let token = session["access_token"].as_str().unwrap();

    let (status, me) = send(&app, get_with_token("/users/me", token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["id"], user["id"]);
    assert_eq!(me["email"], "a@x.com");
}

#[tokio::test]
async fn test_current_user_requires_valid_token() {
    let app = app(InMemoryUserRepository::new());

    let missing = Request::builder()
        .uri("/users/me")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, missing).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "MISSING_TOKEN");

    let (status, body) = send(&app, get_with_token("/users/me", "not.a.token")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_TOKEN");
}

#[tokio::test]
async fn test_token_for_deleted_user_finds_no_profile() {
    let repo = InMemoryUserRepository::new();
    let app = app(repo.clone());
    let user = register(&app, "a@x.com", "secret").await;
    let (_, session) = login(&app, "a@x.com", "secret").await;
    let token = session["access_token"].as_str().unwrap().to_string();

    repo.soft_delete(user["id"].as_i64().unwrap()).unwrap();

    let (status, _) = send(&app, get_with_token("/users/me", &token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_security_headers_are_set() {
    let app = app(InMemoryUserRepository::new());
    let response = app
        .oneshot(post_json(
            "/auth/login",
            json!({ "email": "nobody@x.com", "password": "x" }),
        ))
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    assert_eq!(headers[header::CACHE_CONTROL], "no-store");
}

#[tokio::test]
async fn test_stalled_login_times_out_and_releases_its_unit() {
    let repo = StalledRepository::default();
    let app = app_with_timeout(repo.clone(), Duration::from_millis(50));

    let (status, body) = login(&app, "a@x.com", "secret").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], "SERVICE_UNAVAILABLE");
    assert_eq!(repo.lookups_started.load(Ordering::SeqCst), 1);
    assert_eq!(repo.inner.open_units(), 0);
}
