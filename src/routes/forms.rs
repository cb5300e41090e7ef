use std::net::SocketAddr;

use axum::body::Bytes;
use axum::extract::{ConnectInfo, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::AppError;
use crate::forms::budget::BudgetForm;
use crate::forms::contact::ContactForm;
use crate::forms::LeadForm;
use crate::state::SharedState;
use crate::submission::pipeline::{self, Outcome};
use crate::submission::{client_ip, parser};

pub async fn contato(
    State(state): State<SharedState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    submit::<ContactForm>(&state, addr, &headers, body).await
}

pub async fn orcamento(
    State(state): State<SharedState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    submit::<BudgetForm>(&state, addr, &headers, body).await
}

async fn submit<F: LeadForm>(
    state: &SharedState,
    addr: SocketAddr,
    headers: &HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());

    let raw_data = if content_type.is_some_and(|ct| ct.contains("multipart/form-data")) {
        parser::parse_multipart(headers, body).await
    } else {
        parser::parse_body(content_type, &body)
    }
    .map_err(AppError::BadRequest)?;

    let ip = client_ip::resolve(headers, Some(addr.ip()), &state.config.trusted_proxies);

    let response = match pipeline::run::<F>(state, ip, raw_data).await? {
        // Bots get the same 200 as everyone else
        Outcome::Spam => (StatusCode::OK, Json(json!({ "status": "ok" }))).into_response(),
        Outcome::Sent {
            submission_id,
            relay,
        } => (
            StatusCode::OK,
            Json(json!({
                "status": "sent",
                "submission_id": submission_id,
                "relay": relay,
            })),
        )
            .into_response(),
    };

    Ok(response)
}
