use async_trait::async_trait;
use std::time::Duration;

/// Failure reported by a speech provider, classified so the audio cache can
/// pick the right backoff policy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpeechError {
    /// Network failure, timeout or 5xx. Worth retrying later.
    #[error("transient provider failure: {0}")]
    Transient(String),
    /// The provider asked us to slow down.
    #[error("provider rate limit: {message}")]
    RateLimited {
        message: String,
        retry_after: Option<Duration>,
    },
    /// The provider declined the input (bad text, blocked content, bad credentials).
    #[error("provider rejected request: {0}")]
    Rejected(String),
}

/// Repository for the remote speech/explanation service.
/// Abstracts the underlying provider (Gemini, OpenAI, ...)
///
/// Implementations make exactly one attempt per call. Caching, retry and
/// backoff live in the audio cache.
#[async_trait]
pub trait SpeechRepository: Send + Sync {
    /// Synthesize text to speech
    ///
    /// Returns raw PCM audio: signed 16-bit little-endian, 24 kHz, mono.
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SpeechError>;

    /// Ask the text model for a short learner-oriented explanation of `text`
    async fn explain(&self, text: &str) -> Result<String, SpeechError>;

    /// Provider name for logs and health output
    fn provider(&self) -> &'static str;

    /// Whether credentials are present
    fn is_configured(&self) -> bool;
}
