#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};

use series_api::auth::CredentialValidator;
use series_api::config::AppConfig;
use series_api::database::{MemoryStore, Series};
use series_api::{app, AppState};

pub const SECRET: &str = "integration-test-secret";

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub store: MemoryStore,
}

/// Serve the full router over a fresh in-memory store on a free port
pub async fn spawn_server() -> Result<TestServer> {
    spawn_server_with(MemoryStore::new()).await
}

pub async fn spawn_server_with(store: MemoryStore) -> Result<TestServer> {
    // Pick an unused port for isolation
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let base_url = format!("http://127.0.0.1:{}", port);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .with_context(|| format!("failed to bind {}", base_url))?;

    let state = AppState::new(
        CredentialValidator::new(SECRET.as_bytes()),
        Arc::new(store.clone()),
        Duration::from_secs(2),
    );
    let router = app(state, &AppConfig::development());

    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    Ok(TestServer { port, base_url, store })
}

pub fn sign(claims: &Value, secret: &str) -> String {
    encode(&Header::new(Algorithm::HS256), claims, &EncodingKey::from_secret(secret.as_bytes()))
        .expect("failed to sign test token")
}

/// Bearer header value for a user id signed with the server secret
pub fn bearer_for(owner: &str) -> String {
    format!("Bearer {}", sign(&json!({ "id": owner }), SECRET))
}

pub async fn seed(store: &MemoryStore, owner: &str, name: &str, genre: &str, rate: f64) -> Series {
    let series = Series::new(owner, name, "watching", genre, rate);
    store.insert(&series).await;
    series
}
