use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::audio::{
        AudioService, AudioServiceApi, CacheStats, PlaybackSnapshot, PrefetchJobStatus,
        PrefetchPriority,
    },
    error::{AppError, AppResult},
};

/// Longest text accepted for a single clip
pub const MAX_TEXT_CHARS: usize = 1_000;

/// Most texts accepted in one prefetch request
pub const MAX_PREFETCH_TEXTS: usize = 200;

/// Request for POST /api/audio/resolve and POST /api/audio/play
#[derive(Debug, Serialize, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

/// Request for POST /api/audio/prefetch
#[derive(Debug, Serialize, Deserialize)]
pub struct PrefetchRequest {
    pub texts: Vec<String>,
    #[serde(default)]
    pub priority: PrefetchPriority,
}

#[derive(Debug, Serialize)]
pub struct PlaybackResponse {
    pub playback: Option<PlaybackSnapshot>,
}

pub struct AudioController {
    audio_service: Arc<AudioService>,
}

impl AudioController {
    pub fn new(audio_service: Arc<AudioService>) -> Self {
        Self { audio_service }
    }

    /// POST /api/audio/resolve - Raw PCM for a text, synthesized on a miss
    pub async fn resolve(
        State(controller): State<Arc<AudioController>>,
        Json(request): Json<TextRequest>,
    ) -> AppResult<(StatusCode, HeaderMap, Body)> {
        validate_text(&request.text)?;

        let clip = controller.audio_service.resolve(&request.text).await?;

        let content_type = format!(
            "audio/L16;rate={};channels={}",
            clip.sample_rate(),
            clip.channels()
        );

        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_str(&content_type)
                .map_err(|e| AppError::Internal(format!("Invalid content type: {}", e)))?,
        );
        headers.insert(
            "x-duration-ms",
            HeaderValue::from(clip.duration().as_millis() as u64),
        );

        Ok((StatusCode::OK, headers, Body::from(clip.to_pcm16le())))
    }

    /// POST /api/audio/prefetch - Queue background synthesis
    pub async fn prefetch(
        State(controller): State<Arc<AudioController>>,
        Json(request): Json<PrefetchRequest>,
    ) -> AppResult<(StatusCode, Json<PrefetchJobStatus>)> {
        if request.texts.is_empty() {
            return Err(AppError::BadRequest("Texts cannot be empty".to_string()));
        }

        if request.texts.len() > MAX_PREFETCH_TEXTS {
            return Err(AppError::PayloadTooLarge(format!(
                "At most {} texts per prefetch request",
                MAX_PREFETCH_TEXTS
            )));
        }

        if let Some(text) = request
            .texts
            .iter()
            .find(|text| text.chars().count() > MAX_TEXT_CHARS)
        {
            return Err(AppError::PayloadTooLarge(format!(
                "Text must be {} characters or less (got {})",
                MAX_TEXT_CHARS,
                text.chars().count()
            )));
        }

        let handle = controller
            .audio_service
            .schedule(&request.texts, request.priority);

        let status = controller
            .audio_service
            .job_status(handle.id())
            .ok_or_else(|| AppError::Internal("Prefetch job vanished".to_string()))?;

        Ok((StatusCode::ACCEPTED, Json(status)))
    }

    /// GET /api/audio/prefetch/{jobId} - Job progress
    pub async fn job_status(
        State(controller): State<Arc<AudioController>>,
        Path(job_id): Path<Uuid>,
    ) -> AppResult<Json<PrefetchJobStatus>> {
        controller
            .audio_service
            .job_status(job_id)
            .map(Json)
            .ok_or_else(|| AppError::NotFound(format!("Prefetch job {}", job_id)))
    }

    /// DELETE /api/audio/prefetch/{jobId} - Cancel a job; finished jobs are a no-op
    pub async fn cancel_job(
        State(controller): State<Arc<AudioController>>,
        Path(job_id): Path<Uuid>,
    ) -> AppResult<StatusCode> {
        if controller.audio_service.cancel_job(job_id)
            || controller.audio_service.job_status(job_id).is_some()
        {
            Ok(StatusCode::NO_CONTENT)
        } else {
            Err(AppError::NotFound(format!("Prefetch job {}", job_id)))
        }
    }

    /// POST /api/audio/play - Start playback, superseding the current one
    pub async fn play(
        State(controller): State<Arc<AudioController>>,
        Json(request): Json<TextRequest>,
    ) -> AppResult<(StatusCode, Json<PlaybackSnapshot>)> {
        validate_text(&request.text)?;

        let session = controller.audio_service.play(&request.text)?;
        Ok((StatusCode::ACCEPTED, Json(session.snapshot())))
    }

    /// GET /api/audio/playback - Latest playback state
    pub async fn current_playback(
        State(controller): State<Arc<AudioController>>,
    ) -> Json<PlaybackResponse> {
        Json(PlaybackResponse {
            playback: controller.audio_service.current_playback(),
        })
    }

    /// GET /api/audio/stats - Cache occupancy
    pub async fn stats(State(controller): State<Arc<AudioController>>) -> Json<CacheStats> {
        Json(controller.audio_service.stats())
    }

    /// DELETE /api/audio/cache - Drop ready and failed entries
    pub async fn clear_cache(State(controller): State<Arc<AudioController>>) -> StatusCode {
        controller.audio_service.clear();
        StatusCode::NO_CONTENT
    }
}

fn validate_text(text: &str) -> AppResult<()> {
    if text.trim().is_empty() {
        return Err(AppError::BadRequest("Text cannot be empty".to_string()));
    }

    let char_count = text.chars().count();
    if char_count > MAX_TEXT_CHARS {
        return Err(AppError::PayloadTooLarge(format!(
            "Text must be {} characters or less (got {})",
            MAX_TEXT_CHARS, char_count
        )));
    }

    Ok(())
}
