//! Shared harness for the HTTP contract tests.
//!
//! Every `TestApp` owns a freshly migrated and seeded store, so each test
//! starts from the same 20-user snapshot.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use sea_orm_migration::MigratorTrait;
use serde_json::Value;
use tower::ServiceExt;

use users_api::domain::UserRepositoryInterface;
use users_api::infrastructure::database::migrator::Migrator;
use users_api::shared::Locale;
use users_api::{
    create_api_router, init_database, DatabaseConfig, InMemoryUserRepository, RouterOptions,
    UserRepository, UserService, UserServiceConfig,
};

pub struct TestApp {
    pub router: Router,
    pub service: Arc<UserService>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestApp {
    /// Router over SQLite in memory, migrated and seeded.
    pub async fn sqlite() -> Self {
        let db = init_database(&DatabaseConfig::in_memory())
            .await
            .expect("in-memory sqlite");
        Migrator::up(&db, None).await.expect("migrations");
        Self::with_repo(Arc::new(UserRepository::new(db)), Locale::Ru)
    }

    /// Router over the seeded in-memory repository.
    pub fn memory() -> Self {
        Self::with_repo(Arc::new(InMemoryUserRepository::new()), Locale::Ru)
    }

    pub fn with_repo(repo: Arc<dyn UserRepositoryInterface>, default_locale: Locale) -> Self {
        let service = Arc::new(UserService::new(repo, UserServiceConfig::default()));
        let router = create_api_router(
            service.clone(),
            RouterOptions {
                default_locale,
                ..RouterOptions::default()
            },
        );
        Self { router, service }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("response body");
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

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.send(Request::delete(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn json(&self, method: Method, uri: &str, body: &Value) -> TestResponse {
        self.json_with_locale(method, uri, body, None).await
    }

    pub async fn json_with_locale(
        &self,
        method: Method,
        uri: &str,
        body: &Value,
        accept_language: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(lang) = accept_language {
            builder = builder.header(header::ACCEPT_LANGUAGE, lang);
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    pub async fn post(&self, body: &Value) -> TestResponse {
        self.json(Method::POST, "/api/users", body).await
    }

    pub async fn total_elements(&self) -> u64 {
        let response = self.get("/api/users").await;
        assert_eq!(response.status, StatusCode::OK);
        response.body["page"]["totalElements"]
            .as_u64()
            .expect("page.totalElements")
    }
}

/// Sub-error field names of a 400 validation body, in response order.
pub fn sub_error_fields(body: &Value) -> Vec<String> {
    body["subErrors"]
        .as_array()
        .map(|errors| {
            errors
                .iter()
                .filter_map(|e| e["field"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
