// HTTP surface: the single chat relay endpoint.
//
// POST /api/chat accepts `{messages, currentUserId, targetUserId}` and
// returns `{message, success}` on success, `{error}` with 400 for a
// disallowed target, or `{error}` with 500 when the upstream call fails.
// No other route exists.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{
    extract::State,
    http::{header::CONTENT_TYPE, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::chat::persona::ChatTurn;
use crate::chat::{ChatRelay, RelayError};
use crate::config::ServerConfig;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub messages: Vec<ChatTurn>,
    pub current_user_id: String,
    pub target_user_id: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub message: String,
    pub success: bool,
}

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum AppError {
    #[error("chat with this user is not available")]
    DisallowedTarget,

    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::DisallowedTarget => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // The body stays generic; the chain is logged server-side only.
        if let AppError::Internal(ref source) = self {
            error!("chat relay failed: {source:#}");
        }

        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<RelayError> for AppError {
    fn from(err: RelayError) -> Self {
        match err {
            RelayError::DisallowedTarget => AppError::DisallowedTarget,
            RelayError::Upstream(source) => AppError::Internal(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Router and server
// ---------------------------------------------------------------------------

/// Build the application router around a relay.
pub fn router(relay: Arc<ChatRelay>, allowed_origin: &str) -> anyhow::Result<Router> {
    let origin = allowed_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("invalid allowed_origin: {allowed_origin}"))?;

    let cors = CorsLayer::new()
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .allow_origin(origin)
        .max_age(Duration::from_secs(60 * 60));

    Ok(Router::new()
        .route("/api/chat", post(chat_handler))
        .layer(cors)
        .with_state(relay))
}

async fn chat_handler(
    State(relay): State<Arc<ChatRelay>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let message = relay
        .relay(
            &request.messages,
            &request.current_user_id,
            &request.target_user_id,
        )
        .await?;

    Ok(Json(ChatResponse {
        message,
        success: true,
    }))
}

/// Bind the listener and serve until a shutdown signal arrives.
pub async fn serve(relay: Arc<ChatRelay>, server: &ServerConfig) -> anyhow::Result<()> {
    let app = router(relay, &server.allowed_origin)?;

    let address = format!("0.0.0.0:{}", server.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    info!("chat relay listening on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("failed to install Ctrl+C handler: {e}");
            return;
        }
        info!("received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("received terminate signal, shutting down");
            }
            Err(e) => error!("failed to install signal handler: {e}"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
