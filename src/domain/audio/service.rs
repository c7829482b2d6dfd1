use super::budget::DispatchBudget;
use super::cache::{AudioCache, CachePolicy, CacheStats};
use super::clip::AudioClip;
use super::error::AudioError;
use super::key::CacheKey;
use super::playback::{PlaybackController, PlaybackSession, PlaybackSnapshot};
use super::prefetch::{PrefetchCoordinator, PrefetchHandle, PrefetchJobStatus, PrefetchPriority};
use super::sink::AudioSink;
use crate::infrastructure::repositories::SpeechRepository;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Knobs for the cache and the prefetch budget
#[derive(Debug, Clone)]
pub struct AudioSettings {
    pub prefetch_concurrency: usize,
    pub cache_max_bytes: usize,
    pub synthesis_timeout: Duration,
    pub network_backoff: Duration,
    pub rate_limit_backoff: Duration,
}

impl Default for AudioSettings {
    fn default() -> Self {
        let policy = CachePolicy::default();
        Self {
            prefetch_concurrency: 2,
            cache_max_bytes: policy.max_bytes,
            synthesis_timeout: policy.synthesis_timeout,
            network_backoff: policy.network_backoff,
            rate_limit_backoff: policy.rate_limit_backoff,
        }
    }
}

impl AudioSettings {
    fn cache_policy(&self) -> CachePolicy {
        CachePolicy {
            max_bytes: self.cache_max_bytes,
            synthesis_timeout: self.synthesis_timeout,
            network_backoff: self.network_backoff,
            rate_limit_backoff: self.rate_limit_backoff,
            ..CachePolicy::default()
        }
    }
}

#[async_trait]
pub trait AudioServiceApi: Send + Sync {
    /// Foreground lookup; never waits behind prefetch
    async fn resolve(&self, text: &str) -> Result<Arc<AudioClip>, AudioError>;

    /// Queue background warm-up. Blank texts are dropped.
    fn schedule(&self, texts: &[String], priority: PrefetchPriority) -> PrefetchHandle;

    fn cancel(&self, handle: &PrefetchHandle);

    /// Returns false when the job is unknown or already retired
    fn cancel_job(&self, job_id: Uuid) -> bool;

    fn job_status(&self, job_id: Uuid) -> Option<PrefetchJobStatus>;

    fn play(&self, text: &str) -> Result<PlaybackSession, AudioError>;

    fn current_playback(&self) -> Option<PlaybackSnapshot>;

    fn stats(&self) -> CacheStats;

    fn clear(&self);
}

pub struct AudioService {
    cache: Arc<AudioCache>,
    budget: Arc<DispatchBudget>,
    prefetch: PrefetchCoordinator,
    playback: PlaybackController,
}

impl AudioService {
    /// Must be called inside a tokio runtime; starts the prefetch dispatcher
    pub fn new(
        speech_repo: Arc<dyn SpeechRepository>,
        sink: Arc<dyn AudioSink>,
        settings: AudioSettings,
    ) -> Self {
        let cache = Arc::new(AudioCache::new(speech_repo, settings.cache_policy()));
        let budget = DispatchBudget::new(settings.prefetch_concurrency);
        let prefetch = PrefetchCoordinator::new(cache.clone(), budget.clone());
        let playback = PlaybackController::new(cache.clone(), budget.clone(), sink);

        tracing::info!(
            prefetch_concurrency = budget.capacity(),
            cache_max_bytes = settings.cache_max_bytes,
            synthesis_timeout_secs = settings.synthesis_timeout.as_secs(),
            "Audio service ready"
        );

        Self {
            cache,
            budget,
            prefetch,
            playback,
        }
    }
}

#[async_trait]
impl AudioServiceApi for AudioService {
    async fn resolve(&self, text: &str) -> Result<Arc<AudioClip>, AudioError> {
        let key = CacheKey::new(text)?;
        let _permit = self.budget.acquire_foreground();
        self.cache.resolve(&key).await
    }

    fn schedule(&self, texts: &[String], priority: PrefetchPriority) -> PrefetchHandle {
        let keys: Vec<CacheKey> = texts
            .iter()
            .filter_map(|text| match CacheKey::new(text) {
                Ok(key) => Some(key),
                Err(_) => {
                    tracing::warn!("Skipping blank text in prefetch request");
                    None
                }
            })
            .collect();

        self.prefetch.schedule(keys, priority)
    }

    fn cancel(&self, handle: &PrefetchHandle) {
        self.prefetch.cancel(handle);
    }

    fn cancel_job(&self, job_id: Uuid) -> bool {
        self.prefetch.cancel_job(job_id)
    }

    fn job_status(&self, job_id: Uuid) -> Option<PrefetchJobStatus> {
        self.prefetch.job_status(job_id)
    }

    fn play(&self, text: &str) -> Result<PlaybackSession, AudioError> {
        let key = CacheKey::new(text)?;
        Ok(self.playback.play(key))
    }

    fn current_playback(&self) -> Option<PlaybackSnapshot> {
        self.playback.current()
    }

    fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    fn clear(&self) {
        self.cache.clear();
    }
}
