use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use leadrelay::config::{Config, MailRelayConfig};
use leadrelay::relay::HttpMailRelay;

pub const RELAY_KEY: &str = "test-relay-key";
pub const RELAY_TO: &str = "leads@example.com";

/// A stand-in mail relay that records every request and answers with a fixed reply.
#[derive(Clone)]
pub struct FakeRelay {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<Value>>>,
}

#[derive(Clone)]
struct RelayState {
    requests: Arc<Mutex<Vec<Value>>>,
    status: StatusCode,
    body: Value,
}

impl FakeRelay {
    pub fn url(&self) -> String {
        format!("http://{}/send", self.addr)
    }

    pub fn requests(&self) -> Vec<Value> {
        self.requests.lock().unwrap().clone()
    }
}

async fn relay_handler(
    State(state): State<RelayState>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.requests.lock().unwrap().push(body);
    (state.status, Json(state.body.clone()))
}

/// Spawn a fake relay replying with `status` and `body`.
pub async fn spawn_relay(status: StatusCode, body: Value) -> FakeRelay {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = RelayState {
        requests: requests.clone(),
        status,
        body,
    };

    let app = Router::new()
        .route("/send", post(relay_handler))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fake relay");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Fake relay failed");
    });

    FakeRelay { addr, requests }
}

pub fn relay_config(url: String) -> MailRelayConfig {
    MailRelayConfig {
        api_url: url,
        key: RELAY_KEY.to_string(),
        to: RELAY_TO.to_string(),
        brand: "Creatives Marketing".to_string(),
        timeout: Some(Duration::from_secs(5)),
    }
}

#[allow(dead_code)]
pub fn test_config(relay: &FakeRelay) -> Config {
    Config {
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        max_body_size: 65_536,
        trusted_proxies: vec![],
        cors_origins: vec![],
        rate_limit: 100,
        rate_limit_window_secs: 60,
        honeypot_field: Some("website".to_string()),
        log_level: "warn".to_string(),
        mail: relay_config(relay.url()),
    }
}

/// A running intake server wired to a fake relay.
#[allow(dead_code)]
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub relay: FakeRelay,
}

#[allow(dead_code)]
impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Submit JSON to a form, return (body, status).
    pub async fn submit_json(&self, form: &str, data: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url(&format!("/api/v1/forms/{form}")))
            .json(data)
            .send()
            .await
            .expect("submit json failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Submit form-urlencoded data to a form, return (body, status).
    pub async fn submit_form(&self, form: &str, data: &[(&str, &str)]) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url(&format!("/api/v1/forms/{form}")))
            .form(data)
            .send()
            .await
            .expect("submit form failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }
}

/// Spawn the app against a relay that accepts everything.
#[allow(dead_code)]
pub async fn spawn_app() -> TestApp {
    let relay = spawn_relay(StatusCode::OK, json!({ "success": true, "id": "msg_1" })).await;
    let config = test_config(&relay);
    spawn_app_with(config, relay).await
}

#[allow(dead_code)]
pub async fn spawn_app_with(config: Config, relay: FakeRelay) -> TestApp {
    let mail_relay = HttpMailRelay::new(config.mail.clone()).expect("Failed to build relay client");
    let (app, _state) = leadrelay::build_app(config, Arc::new(mail_relay));

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    // Spawn server in background
    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .expect("Server failed");
    });

    TestApp {
        addr,
        client: Client::new(),
        relay,
    }
}
