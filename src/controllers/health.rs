use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::infrastructure::repositories::SpeechRepository;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Ready only when the speech provider has credentials. Lessons and the
/// mistake notebook still work without them, but nothing can be synthesized.
pub async fn health_ready(
    State(speech_repo): State<Arc<dyn SpeechRepository>>,
) -> impl IntoResponse {
    if speech_repo.is_configured() {
        (
            StatusCode::OK,
            Json(json!({
                "status": "ready",
                "provider": speech_repo.provider(),
                "speech": "configured"
            })),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "not_ready",
                "provider": speech_repo.provider(),
                "speech": "missing_api_key"
            })),
        )
    }
}
