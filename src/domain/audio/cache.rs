use super::clip::{AudioClip, PCM_CHANNELS, PCM_SAMPLE_RATE};
use super::error::AudioError;
use super::key::CacheKey;
use crate::infrastructure::repositories::SpeechRepository;
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

type Resolution = Result<Arc<AudioClip>, AudioError>;
type SharedResolution = Shared<BoxFuture<'static, Resolution>>;

/// Tunables for the audio cache
#[derive(Debug, Clone)]
pub struct CachePolicy {
    /// Upper bound on decoded bytes held by ready entries
    pub max_bytes: usize,
    /// Bound on a single provider call
    pub synthesis_timeout: Duration,
    /// Backoff after a network failure or timeout
    pub network_backoff: Duration,
    /// Minimum backoff after the provider rate limited us
    pub rate_limit_backoff: Duration,
    /// Upper bound on remembered failures; the oldest go first
    pub max_failed_entries: usize,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            max_bytes: 50 * 1024 * 1024,
            synthesis_timeout: Duration::from_secs(20),
            network_backoff: Duration::from_secs(30),
            rate_limit_backoff: Duration::from_secs(120),
            max_failed_entries: 1_000,
        }
    }
}

impl CachePolicy {
    /// `None` means the failure is permanent
    fn backoff_for(&self, error: &AudioError) -> Option<Duration> {
        if error.is_permanent() {
            return None;
        }

        let backoff = match error {
            AudioError::RateLimited {
                retry_after: Some(hint),
                ..
            } => (*hint).max(self.rate_limit_backoff),
            AudioError::RateLimited { .. } => self.rate_limit_backoff,
            AudioError::Playback(_) => Duration::ZERO,
            _ => self.network_backoff,
        };
        Some(backoff)
    }
}

enum CacheEntry {
    Pending {
        resolution: SharedResolution,
        started_at: Instant,
    },
    Ready {
        clip: Arc<AudioClip>,
        last_access: Instant,
        size_bytes: usize,
    },
    Failed {
        error: AudioError,
        retry_at: Option<Instant>,
        failed_at: Instant,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    Pending,
    Ready,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub ready: usize,
    pub pending: usize,
    pub failed: usize,
    pub ready_bytes: usize,
    pub max_bytes: usize,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<CacheKey, CacheEntry>,
    ready_bytes: usize,
}

impl CacheState {
    /// Drop least-recently-used ready entries until the budget holds.
    /// `keep` (the entry just inserted) is never a victim.
    fn evict_over_budget(&mut self, max_bytes: usize, keep: &CacheKey) {
        while self.ready_bytes > max_bytes {
            let victim = self
                .entries
                .iter()
                .filter_map(|(key, entry)| match entry {
                    CacheEntry::Ready { last_access, .. } if key != keep => {
                        Some((key, *last_access))
                    }
                    _ => None,
                })
                .min_by_key(|(_, last_access)| *last_access)
                .map(|(key, _)| key.clone());

            let Some(victim) = victim else {
                break;
            };

            if let Some(CacheEntry::Ready { size_bytes, .. }) = self.entries.remove(&victim) {
                self.ready_bytes -= size_bytes;
                tracing::debug!(
                    key = %victim,
                    freed_bytes = size_bytes,
                    ready_bytes = self.ready_bytes,
                    "Evicted least recently used audio"
                );
            }
        }
    }

    /// Forget failures whose backoff has run out, then drop the oldest
    /// remaining ones above `max_failed`. `keep` is never a victim.
    fn prune_failures(&mut self, now: Instant, max_failed: usize, keep: &CacheKey) {
        let before = self.entries.len();
        self.entries.retain(|key, entry| match entry {
            CacheEntry::Failed {
                retry_at: Some(retry_at),
                ..
            } => key == keep || *retry_at > now,
            _ => true,
        });

        let mut failed: Vec<(CacheKey, Instant)> = self
            .entries
            .iter()
            .filter_map(|(key, entry)| match entry {
                CacheEntry::Failed { failed_at, .. } if key != keep => {
                    Some((key.clone(), *failed_at))
                }
                _ => None,
            })
            .collect();

        // `keep` counts towards the limit too
        let excess = (failed.len() + 1).saturating_sub(max_failed.max(1));
        if excess > 0 {
            failed.sort_by_key(|(_, failed_at)| *failed_at);
            for (key, _) in failed.into_iter().take(excess) {
                self.entries.remove(&key);
            }
        }

        let removed = before - self.entries.len();
        if removed > 0 {
            tracing::debug!(removed, "Pruned remembered synthesis failures");
        }
    }
}

enum Lookup {
    Hit(Arc<AudioClip>),
    CachedFailure(AudioError),
    Wait(SharedResolution),
}

/// Keyed store of synthesized audio.
///
/// Owns every entry exclusively. At most one provider call per key is in
/// flight; every concurrent caller for that key awaits the same result.
pub struct AudioCache {
    state: Arc<Mutex<CacheState>>,
    speech_repo: Arc<dyn SpeechRepository>,
    policy: CachePolicy,
}

impl AudioCache {
    pub fn new(speech_repo: Arc<dyn SpeechRepository>, policy: CachePolicy) -> Self {
        Self {
            state: Arc::new(Mutex::new(CacheState::default())),
            speech_repo,
            policy,
        }
    }

    /// Get the audio for `key`, synthesizing it at most once.
    ///
    /// Must be called from within a tokio runtime: a miss spawns the provider
    /// call as its own task so it settles the entry even if every caller
    /// goes away.
    pub async fn resolve(&self, key: &CacheKey) -> Result<Arc<AudioClip>, AudioError> {
        match self.lookup_or_start(key) {
            Lookup::Hit(clip) => Ok(clip),
            Lookup::CachedFailure(error) => Err(error),
            Lookup::Wait(resolution) => resolution.await,
        }
    }

    /// Current state of `key` without touching it
    pub fn status(&self, key: &CacheKey) -> Option<EntryStatus> {
        self.state.lock().entries.get(key).map(|entry| match entry {
            CacheEntry::Pending { .. } => EntryStatus::Pending,
            CacheEntry::Ready { .. } => EntryStatus::Ready,
            CacheEntry::Failed { .. } => EntryStatus::Failed,
        })
    }

    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        let mut stats = CacheStats {
            ready: 0,
            pending: 0,
            failed: 0,
            ready_bytes: state.ready_bytes,
            max_bytes: self.policy.max_bytes,
        };

        for entry in state.entries.values() {
            match entry {
                CacheEntry::Pending { .. } => stats.pending += 1,
                CacheEntry::Ready { .. } => stats.ready += 1,
                CacheEntry::Failed { .. } => stats.failed += 1,
            }
        }

        stats
    }

    /// Drop ready and failed entries. In-flight syntheses are kept and will
    /// still settle.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        let before = state.entries.len();
        state
            .entries
            .retain(|_, entry| matches!(entry, CacheEntry::Pending { .. }));
        state.ready_bytes = 0;

        tracing::info!(
            removed = before - state.entries.len(),
            kept_pending = state.entries.len(),
            "Audio cache cleared"
        );
    }

    /// Inspect and, on a miss, register the pending entry under one lock so
    /// no other caller can slip in between.
    fn lookup_or_start(&self, key: &CacheKey) -> Lookup {
        let now = Instant::now();
        let mut state = self.state.lock();

        match state.entries.get_mut(key) {
            Some(CacheEntry::Ready {
                clip, last_access, ..
            }) => {
                *last_access = now;
                tracing::debug!(key = %key, "Audio cache hit");
                return Lookup::Hit(clip.clone());
            }
            Some(CacheEntry::Pending {
                resolution,
                started_at,
            }) => {
                tracing::debug!(
                    key = %key,
                    in_flight_ms = now.duration_since(*started_at).as_millis() as u64,
                    "Joining in-flight synthesis"
                );
                return Lookup::Wait(resolution.clone());
            }
            Some(CacheEntry::Failed {
                error, retry_at, ..
            }) => {
                let backing_off = match retry_at {
                    Some(retry_at) => now < *retry_at,
                    None => true,
                };
                if backing_off {
                    tracing::debug!(
                        key = %key,
                        error = %error,
                        "Returning cached synthesis failure"
                    );
                    return Lookup::CachedFailure(error.clone());
                }
                tracing::info!(key = %key, "Backoff elapsed, retrying synthesis");
            }
            None => {}
        }

        let resolution = self.spawn_synthesis(key.clone());
        state.entries.insert(
            key.clone(),
            CacheEntry::Pending {
                resolution: resolution.clone(),
                started_at: now,
            },
        );

        Lookup::Wait(resolution)
    }

    fn spawn_synthesis(&self, key: CacheKey) -> SharedResolution {
        let state = self.state.clone();
        let speech_repo = self.speech_repo.clone();
        let policy = self.policy.clone();

        tracing::info!(
            key = %key,
            provider = speech_repo.provider(),
            "Audio cache miss, synthesizing"
        );

        let task = tokio::spawn(async move {
            let start_time = Instant::now();

            let call = tokio::time::timeout(
                policy.synthesis_timeout,
                AssertUnwindSafe(speech_repo.synthesize(key.as_str())).catch_unwind(),
            );

            // A panicking provider still settles the entry so the key can be retried
            let outcome = match call.await {
                Ok(Ok(Ok(bytes))) => {
                    AudioClip::from_pcm16le(&bytes, PCM_SAMPLE_RATE, PCM_CHANNELS).map(Arc::new)
                }
                Ok(Ok(Err(e))) => Err(AudioError::from(e)),
                Ok(Err(_)) => Err(AudioError::Network(
                    "Speech provider panicked during synthesis".to_string(),
                )),
                Err(_) => Err(AudioError::Network(format!(
                    "Synthesis timed out after {}s",
                    policy.synthesis_timeout.as_secs()
                ))),
            };

            settle(&state, &policy, &key, &outcome, start_time.elapsed());
            outcome
        });

        async move {
            task.await.unwrap_or_else(|e| {
                Err(AudioError::Network(format!("Synthesis task failed: {}", e)))
            })
        }
        .boxed()
        .shared()
    }
}

fn settle(
    state: &Mutex<CacheState>,
    policy: &CachePolicy,
    key: &CacheKey,
    outcome: &Resolution,
    elapsed: Duration,
) {
    let mut state = state.lock();

    if !matches!(state.entries.get(key), Some(CacheEntry::Pending { .. })) {
        tracing::warn!(key = %key, "Settling synthesis for an entry that is no longer pending");
        return;
    }

    let now = Instant::now();
    match outcome {
        Ok(clip) => {
            let size_bytes = clip.size_bytes();
            state.entries.insert(
                key.clone(),
                CacheEntry::Ready {
                    clip: clip.clone(),
                    last_access: now,
                    size_bytes,
                },
            );
            state.ready_bytes += size_bytes;
            state.evict_over_budget(policy.max_bytes, key);

            tracing::info!(
                key = %key,
                audio_size_bytes = size_bytes,
                duration_ms = clip.duration().as_millis() as u64,
                latency_ms = elapsed.as_millis() as u64,
                ready_bytes = state.ready_bytes,
                "Audio cached"
            );
        }
        Err(error) => {
            let backoff = policy.backoff_for(error);
            state.entries.insert(
                key.clone(),
                CacheEntry::Failed {
                    error: error.clone(),
                    retry_at: backoff.map(|backoff| now + backoff),
                    failed_at: now,
                },
            );
            state.prune_failures(now, policy.max_failed_entries, key);

            tracing::warn!(
                key = %key,
                error = %error,
                kind = error.kind(),
                backoff_secs = backoff.map(|b| b.as_secs()),
                latency_ms = elapsed.as_millis() as u64,
                "Synthesis failed"
            );
        }
    }
}
