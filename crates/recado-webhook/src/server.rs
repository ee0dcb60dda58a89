use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::State,
    http::{Method, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use recado_core::interpreter::Interpreter;

use crate::{batch, payload::WebhookPayload};

#[derive(Clone)]
pub struct AppState {
    pub interpreter: Arc<Interpreter>,
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/whatsapp-webhook", post(whatsapp_webhook))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "webhook server listening");
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// The webhook endpoint.
///
/// The body is parsed by hand so a structurally malformed payload maps to
/// the transport-level 500 the upstream expects, not to axum's extractor
/// 400. Once the payload parses, the response is a fixed acknowledgment no
/// matter how the individual commands fared.
async fn whatsapp_webhook(
    State(state): State<AppState>,
    body: String,
) -> (StatusCode, Json<serde_json::Value>) {
    let payload: WebhookPayload = match serde_json::from_str(&body) {
        Ok(p) => p,
        Err(e) => {
            tracing::error!(error = %e, "malformed webhook payload");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": format!("malformed payload: {e}") })),
            );
        }
    };

    let messages = payload.messages();
    batch::process_messages(&state.interpreter, &messages).await;

    (StatusCode::OK, Json(json!({ "status": "ok" })))
}
