#![allow(dead_code)]

use std::sync::Arc;

use auth_service::{
    app::build_app,
    config::{AppConfig, JwtConfig},
    state::AppState,
    store::MemoryCredentialStore,
};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

pub fn config() -> AppConfig {
    AppConfig {
        database_url: None,
        jwt: JwtConfig {
            secret: "integration-secret".into(),
            issuer: "order-mgmt".into(),
            audience: "order-mgmt-users".into(),
            ttl_minutes: 5,
        },
        store_timeout_ms: 5_000,
        password_min_len: 1,
        base_path: "/auth".into(),
        host: "127.0.0.1".into(),
        port: 0,
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: Arc<MemoryCredentialStore>,
}

pub fn spawn() -> TestApp {
    let store = Arc::new(MemoryCredentialStore::new());
    let state = AppState::with_store(config(), store.clone());
    TestApp {
        router: build_app(state.clone()),
        state,
        store,
    }
}

impl TestApp {
    pub async fn post_json(&self, path: &str, body: Value) -> (StatusCode, Value) {
        self.send(
            Request::post(path)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn post_raw(&self, path: &str, body: &'static str) -> (StatusCode, Value) {
        self.send(
            Request::post(path)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
    }

    pub async fn get(&self, path: &str, bearer: Option<&str>) -> (StatusCode, Value) {
        let mut req = Request::get(path);
        if let Some(token) = bearer {
            req = req.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        self.send(req.body(Body::empty()).unwrap()).await
    }

    async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let res = self.router.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }
}
