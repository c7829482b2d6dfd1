use super::clip::AudioClip;
use super::error::AudioError;
use super::key::CacheKey;
use async_trait::async_trait;
use std::sync::Arc;

/// Output device for decoded audio.
///
/// `play` completes when the clip has finished playing. Dropping the future
/// must stop output.
#[async_trait]
pub trait AudioSink: Send + Sync {
    async fn play(&self, key: &CacheKey, clip: Arc<AudioClip>) -> Result<(), AudioError>;
}

/// Server-side stand-in for a speaker: holds the session open for the clip's
/// duration. The front-end fetches the bytes and does the actual output.
#[derive(Debug, Default)]
pub struct PacedSink;

impl PacedSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AudioSink for PacedSink {
    async fn play(&self, key: &CacheKey, clip: Arc<AudioClip>) -> Result<(), AudioError> {
        if clip.samples().is_empty() {
            return Err(AudioError::Playback(format!("Nothing to play for '{}'", key)));
        }

        tracing::debug!(
            key = %key,
            duration_ms = clip.duration().as_millis() as u64,
            sample_rate = clip.sample_rate(),
            "Playing clip"
        );

        tokio::time::sleep(clip.duration()).await;
        Ok(())
    }
}
