use std::convert::Infallible;
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio_stream::{Stream, StreamExt, wrappers::ReceiverStream};
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::rpc::{self, RpcRequest, TOOL_NAME};
use crate::state::AppState;

// Mirrors the reference server's manual `:` heartbeat cadence.
const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(10);

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(status))
        .route("/sse", get(establish_session))
        .route("/sse/", get(establish_session))
        .route("/message", post(post_message))
        .with_state(state)
}

async fn status() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "tools": [TOOL_NAME],
        "transport": "sse"
    }))
}

/// Open an SSE session. The first event tells the client where to POST its
/// JSON-RPC messages; every dispatched response then arrives as a `message`
/// event on this stream.
async fn establish_session(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (session_id, receiver) = state.open_session();
    info!(%session_id, "sse session established");

    let endpoint = Event::default()
        .event("endpoint")
        .data(format!("/message?session_id={session_id}"));

    let messages =
        ReceiverStream::new(receiver).map(|payload| Event::default().event("message").data(payload));
    let stream = tokio_stream::once(endpoint).chain(messages).map(Ok);

    Sse::new(stream).keep_alive(KeepAlive::new().interval(KEEP_ALIVE_INTERVAL))
}

#[derive(Debug, Deserialize)]
struct MessageParams {
    session_id: Uuid,
}

async fn post_message(
    State(state): State<AppState>,
    Query(params): Query<MessageParams>,
    Json(request): Json<RpcRequest>,
) -> Result<StatusCode, AppError> {
    if !state.session_exists(&params.session_id) {
        return Err(AppError::unknown_session());
    }

    if let Some(response) = rpc::dispatch(&state.research(), request).await {
        let payload = serde_json::to_string(&response).map_err(|err| {
            AppError::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        })?;
        if !state.deliver(&params.session_id, payload).await {
            return Err(AppError::unknown_session());
        }
    }

    Ok(StatusCode::ACCEPTED)
}
