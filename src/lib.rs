pub mod config;
pub mod error;
pub mod forms;
pub mod rate_limit;
pub mod relay;
pub mod routes;
pub mod state;
pub mod submission;

use std::sync::Arc;

use axum::http::{header, HeaderName, HeaderValue, Method};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::map_response_body::MapResponseBodyLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::rate_limit::SubmissionRateLimiter;
use crate::relay::MailRelay;
use crate::state::{AppState, SharedState};

pub fn build_app(config: Config, relay: Arc<dyn MailRelay>) -> (Router, SharedState) {
    let cors = cors_layer(&config.cors_origins);
    let max_body_size = config.max_body_size;

    let state: SharedState = Arc::new(AppState {
        config,
        relay,
        submission_limiter: SubmissionRateLimiter::new(),
    });

    let app = Router::new()
        .merge(routes::form_routes())
        .route("/health", axum::routing::get(health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(MapResponseBodyLayer::new(axum::body::Body::new))
                .layer(RequestBodyLimitLayer::new(max_body_size)),
        )
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-frame-options"),
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .with_state(state.clone());

    (app, state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() || origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins.iter().filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {o}");
                None
            }
        }))
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

async fn health() -> &'static str {
    "ok"
}
