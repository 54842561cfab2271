//! Voice command endpoints
//!
//! The client does speech recognition and sends the transcript; the reply
//! carries the sentence to speak and whether a yes/no answer is expected.

use std::sync::Arc;

use axum::{
    Json, Router, middleware,
    extract::State,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use super::{ApiError, ApiState, auth::require_api_key};
use crate::command::reply::HELP_SPEECH;
use crate::session::Reply;

#[derive(Debug, Deserialize)]
pub struct CommandRequest {
    pub transcript: String,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmRequest {
    /// `true` runs the pending action, `false` discards it
    pub confirm: bool,
}

#[derive(Debug, Serialize)]
pub struct SpeechResponse {
    pub speech: Option<String>,
}

/// Interpret and execute one transcript
async fn command(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<CommandRequest>,
) -> Result<Json<Reply>, ApiError> {
    tracing::debug!(transcript = %request.transcript, "voice command received");
    let reply = state.session.handle(&request.transcript).await?;
    Ok(Json(reply))
}

/// Answer the pending confirmation question
async fn confirm(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<ConfirmRequest>,
) -> Result<Json<SpeechResponse>, ApiError> {
    if !request.confirm {
        if !state.session.cancel().await {
            return Err(ApiError::NotFound(
                "no action awaiting confirmation".to_string(),
            ));
        }
        return Ok(Json(SpeechResponse { speech: None }));
    }

    let reply = state.session.confirm().await?;
    Ok(Json(SpeechResponse {
        speech: reply.speech,
    }))
}

async fn help() -> Json<SpeechResponse> {
    Json(SpeechResponse {
        speech: Some(HELP_SPEECH.to_string()),
    })
}

/// Build voice router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/command", post(command))
        .route("/confirm", post(confirm))
        .route("/help", get(help))
        .layer(middleware::from_fn_with_state(state.clone(), require_api_key))
        .with_state(state)
}
