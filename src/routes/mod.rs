pub mod forms;

use axum::routing::post;
use axum::Router;

use crate::state::SharedState;

pub fn form_routes() -> Router<SharedState> {
    Router::new()
        .route("/api/v1/forms/contato", post(forms::contato))
        .route("/api/v1/forms/orcamento", post(forms::orcamento))
}
