//! Cloud speech synthesis endpoint

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    middleware,
    response::{IntoResponse, Response},
    routing::post,
};
use serde::Deserialize;

use super::{ApiError, ApiState, auth::require_api_key};

#[derive(Debug, Deserialize)]
pub struct SpeakRequest {
    pub text: String,
}

/// Synthesize text to MP3
///
/// 503 tells the client to fall back to on-device speech.
async fn speak(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<SpeakRequest>,
) -> Result<Response, ApiError> {
    if request.text.trim().is_empty() {
        return Err(ApiError::BadRequest("empty text".to_string()));
    }

    let tts = state
        .tts
        .as_ref()
        .ok_or(ApiError::NotConfigured("TTS not configured (no OpenAI API key)"))?;

    let audio = tts.synthesize(&request.text).await?;

    Ok((StatusCode::OK, [(header::CONTENT_TYPE, "audio/mpeg")], audio).into_response())
}

/// Build speak router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/", post(speak))
        .layer(middleware::from_fn_with_state(state.clone(), require_api_key))
        .with_state(state)
}
