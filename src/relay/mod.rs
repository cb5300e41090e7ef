pub mod html;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::MailRelayConfig;

/// Insertion-ordered field map handed to the relay.
pub type Payload = Map<String, Value>;

const FALLBACK_ERROR: &str = "Failed to send email";

#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionError {
    pub message: String,
}

impl std::fmt::Display for SubmissionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SubmissionError {}

impl From<String> for SubmissionError {
    fn from(s: String) -> Self {
        SubmissionError { message: s }
    }
}

impl From<&str> for SubmissionError {
    fn from(s: &str) -> Self {
        SubmissionError {
            message: s.to_string(),
        }
    }
}

#[async_trait]
pub trait MailRelay: Send + Sync {
    /// Deliver one payload as an email. Resolves with the relay's JSON reply.
    async fn send(&self, payload: &Payload, subject: &str) -> Result<Value, SubmissionError>;
}

#[derive(Serialize)]
struct RelayRequest<'a> {
    to: &'a str,
    subject: &'a str,
    html: &'a str,
    key: &'a str,
}

/// Posts `{to, subject, html, key}` to an HTTP mail relay.
pub struct HttpMailRelay {
    client: reqwest::Client,
    config: MailRelayConfig,
}

impl HttpMailRelay {
    pub fn new(config: MailRelayConfig) -> Result<Self, SubmissionError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {e}"))?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl MailRelay for HttpMailRelay {
    async fn send(&self, payload: &Payload, subject: &str) -> Result<Value, SubmissionError> {
        let html = html::render(payload, &self.config.brand)?;

        let body = RelayRequest {
            to: &self.config.to,
            subject,
            html: &html,
            key: &self.config.key,
        };

        let resp = self
            .client
            .post(&self.config.api_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("Mail relay request failed: {e}"))?;

        let status = resp.status().as_u16();
        let text = resp
            .text()
            .await
            .map_err(|e| format!("Failed to read mail relay response: {e}"))?;

        interpret_response(status, &text)
    }
}

/// Map a relay reply to the caller's result. Any non-2xx status or an `error`
/// field in the body is a failure.
fn interpret_response(status: u16, body: &str) -> Result<Value, SubmissionError> {
    let parsed: Option<Value> = serde_json::from_str(body).ok();

    let server_error = parsed
        .as_ref()
        .and_then(|v| v.get("error"))
        .and_then(|e| match e {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        });

    if !(200..300).contains(&status) {
        return Err(SubmissionError::from(
            server_error.unwrap_or_else(|| FALLBACK_ERROR.to_string()),
        ));
    }

    if let Some(message) = server_error {
        return Err(SubmissionError::from(message));
    }

    parsed.ok_or_else(|| SubmissionError::from("Mail relay returned a non-JSON response"))
}
