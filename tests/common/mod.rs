#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use chrono::Utc;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

use jobtrack::auth::TokenGenerator;
use jobtrack::server::{AppState, create_router};
use jobtrack::store::{SqliteStore, Store};
use jobtrack::types::User;

/// An in-process server backed by a throwaway database.
pub struct TestApp {
    pub temp_dir: TempDir,
    pub store: Arc<dyn Store>,
    pub router: Router,
    pub admin_token: String,
}

pub struct TestUser {
    pub user: User,
    pub token: String,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Value,
}

impl TestApp {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        let store = SqliteStore::new(temp_dir.path().join("jobtrack.db")).expect("open store");
        store.initialize().expect("initialize schema");
        let store: Arc<dyn Store> = Arc::new(store);

        let (token, admin_token) = TokenGenerator::new()
            .issue(None, None)
            .expect("issue admin token");
        store.create_token(&token).expect("store admin token");

        let router = create_router(Arc::new(AppState::new(Arc::clone(&store))));

        Self {
            temp_dir,
            store,
            router,
            admin_token,
        }
    }

    /// Creates a user directly in the store and hands back a bearer token.
    pub fn create_user(&self, name: &str) -> TestUser {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.store.create_user(&user).expect("create user");

        let (token, raw) = TokenGenerator::new()
            .issue(Some(user.id.clone()), None)
            .expect("issue user token");
        self.store.create_token(&token).expect("store user token");

        TestUser { user, token: raw }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).expect("build request"))
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.request(Method::PATCH, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.request(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::DELETE, uri, Some(token), None).await
    }

    /// Creates a company for `user` and returns its id.
    pub async fn create_company(&self, user: &TestUser, name: &str, location: &str) -> String {
        let resp = self
            .post(
                "/api/v1/companies",
                &user.token,
                serde_json::json!({ "name": name, "location": location }),
            )
            .await;
        assert_eq!(resp.status, StatusCode::CREATED, "{:?}", resp.body);
        resp.body["data"]["id"]
            .as_str()
            .expect("company id")
            .to_string()
    }
}
