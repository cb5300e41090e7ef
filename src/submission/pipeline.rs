use std::net::IpAddr;

use serde_json::Value;
use uuid::Uuid;

use crate::error::AppError;
use crate::forms::{Lead, LeadForm};
use crate::state::SharedState;

use super::honeypot;

pub enum Outcome {
    Sent { submission_id: Uuid, relay: Value },
    /// Honeypot tripped; nothing was sent.
    Spam,
}

/// Rate limit, spam check, validate, shape and forward one submission.
pub async fn run<F: LeadForm>(
    state: &SharedState,
    client_ip: IpAddr,
    raw_data: Value,
) -> Result<Outcome, AppError> {
    let form = F::KIND.as_str();

    if let Err(retry_after) = state.submission_limiter.check(
        F::KIND,
        client_ip,
        state.config.rate_limit,
        state.config.rate_limit_window_secs,
    ) {
        tracing::warn!(form, %client_ip, retry_after, "Submission rate limited");
        return Err(AppError::RateLimited(retry_after));
    }

    if honeypot::is_spam(&raw_data, state.config.honeypot_field.as_deref()) {
        tracing::info!(form, %client_ip, "Honeypot triggered, dropping submission");
        return Ok(Outcome::Spam);
    }

    let parsed: F = serde_json::from_value(raw_data)
        .map_err(|e| AppError::BadRequest(format!("Invalid form data: {e}")))?;

    let (payload, subject) = match parsed.validated() {
        Ok(lead) => (lead.payload(), lead.subject()),
        Err(errors) => {
            let fields: Vec<String> = errors
                .field_errors()
                .keys()
                .map(|k| k.to_string())
                .collect();
            tracing::debug!(form, ?fields, "Submission failed validation");
            return Err(AppError::Validation(errors));
        }
    };

    let submission_id = Uuid::now_v7();

    match state.relay.send(&payload, &subject).await {
        Ok(relay) => {
            tracing::info!(form, %submission_id, "Submission forwarded to mail relay");
            Ok(Outcome::Sent {
                submission_id,
                relay,
            })
        }
        Err(e) => {
            tracing::error!(form, %submission_id, "Mail relay failed: {e}");
            Err(AppError::Relay(e))
        }
    }
}
