use crate::error::AppError;
use crate::infrastructure::repositories::SpeechError;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AudioError {
    #[error("speech service unavailable: {0}")]
    Network(String),
    #[error("speech service rate limited: {message}")]
    RateLimited {
        message: String,
        retry_after: Option<Duration>,
    },
    #[error("synthesis rejected: {0}")]
    SynthesisRejected(String),
    #[error("playback failed: {0}")]
    Playback(String),
}

impl AudioError {
    /// Stable machine-readable name, used in API payloads
    pub fn kind(&self) -> &'static str {
        match self {
            AudioError::Network(_) => "network_error",
            AudioError::RateLimited { .. } => "rate_limited",
            AudioError::SynthesisRejected(_) => "synthesis_rejected",
            AudioError::Playback(_) => "playback_failed",
        }
    }

    /// Permanent failures are never retried automatically
    pub fn is_permanent(&self) -> bool {
        matches!(self, AudioError::SynthesisRejected(_))
    }
}

impl From<SpeechError> for AudioError {
    fn from(err: SpeechError) -> Self {
        match err {
            SpeechError::Transient(msg) => AudioError::Network(msg),
            SpeechError::RateLimited {
                message,
                retry_after,
            } => AudioError::RateLimited {
                message,
                retry_after,
            },
            SpeechError::Rejected(msg) => AudioError::SynthesisRejected(msg),
        }
    }
}

impl From<AudioError> for AppError {
    fn from(err: AudioError) -> Self {
        match err {
            AudioError::Network(msg) => AppError::ExternalService(msg),
            AudioError::RateLimited { message, .. } => AppError::RateLimitExceeded(message),
            AudioError::SynthesisRejected(msg) => AppError::Unprocessable(msg),
            AudioError::Playback(msg) => AppError::Internal(msg),
        }
    }
}
