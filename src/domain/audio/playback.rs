use super::budget::DispatchBudget;
use super::cache::AudioCache;
use super::error::AudioError;
use super::key::CacheKey;
use super::sink::AudioSink;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackPhase {
    Idle,
    Resolving,
    Playing,
    Errored,
    Settled,
    /// A newer request took over before this one finished
    Superseded,
}

impl PlaybackPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, PlaybackPhase::Settled | PlaybackPhase::Superseded)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackSnapshot {
    pub sequence: u64,
    pub key: CacheKey,
    pub phase: PlaybackPhase,
    pub error: Option<PlaybackErrorView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackErrorView {
    pub kind: &'static str,
    pub message: String,
}

impl From<&AudioError> for PlaybackErrorView {
    fn from(err: &AudioError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Caller's view of one `play` request
#[derive(Debug)]
pub struct PlaybackSession {
    sequence: u64,
    state: watch::Receiver<PlaybackSnapshot>,
}

impl PlaybackSession {
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.state.borrow().clone()
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.state.borrow().phase
    }

    /// Wait for the session to settle or be superseded
    pub async fn finished(&mut self) -> PlaybackSnapshot {
        let finished = self
            .state
            .wait_for(|snapshot| snapshot.phase.is_terminal())
            .await
            .map(|snapshot| snapshot.clone());

        match finished {
            Ok(snapshot) => snapshot,
            // The controller is gone; report whatever was last published
            Err(_) => self.state.borrow().clone(),
        }
    }
}

struct ActiveSession {
    sequence: u64,
    cancel: CancellationToken,
    state: watch::Sender<PlaybackSnapshot>,
}

#[derive(Default)]
struct Slot {
    next_sequence: u64,
    active: Option<ActiveSession>,
}

struct ControllerShared {
    slot: Mutex<Slot>,
    current: watch::Sender<Option<PlaybackSnapshot>>,
}

impl ControllerShared {
    /// Apply a transition only if `sequence` is still the live request.
    /// Returns false for a stale session.
    fn publish(
        &self,
        sequence: u64,
        key: &CacheKey,
        phase: PlaybackPhase,
        error: Option<&AudioError>,
    ) -> bool {
        let mut slot = self.slot.lock();
        let Some(active) = slot.active.as_ref().filter(|a| a.sequence == sequence) else {
            tracing::debug!(sequence, key = %key, phase = ?phase, "Dropping stale playback update");
            return false;
        };

        let snapshot = PlaybackSnapshot {
            sequence,
            key: key.clone(),
            phase,
            error: error.map(PlaybackErrorView::from),
        };
        active.state.send_replace(snapshot.clone());
        // A failed session stays visible as Errored until the next play
        if !(phase == PlaybackPhase::Settled && error.is_some()) {
            self.current.send_replace(Some(snapshot));
        }

        if phase.is_terminal() {
            slot.active = None;
        }
        true
    }
}

/// Single-slot "play this now" surface.
///
/// Every `play` gets a fresh, strictly increasing sequence number and
/// supersedes whatever was live. Only the live sequence may publish state or
/// produce sound.
pub struct PlaybackController {
    cache: Arc<AudioCache>,
    budget: Arc<DispatchBudget>,
    sink: Arc<dyn AudioSink>,
    shared: Arc<ControllerShared>,
}

impl PlaybackController {
    pub fn new(cache: Arc<AudioCache>, budget: Arc<DispatchBudget>, sink: Arc<dyn AudioSink>) -> Self {
        let (current, _) = watch::channel(None);
        Self {
            cache,
            budget,
            sink,
            shared: Arc::new(ControllerShared {
                slot: Mutex::new(Slot::default()),
                current,
            }),
        }
    }

    pub fn play(&self, key: CacheKey) -> PlaybackSession {
        let cancel = CancellationToken::new();

        let (sequence, state_rx) = {
            let mut slot = self.shared.slot.lock();
            slot.next_sequence += 1;
            let sequence = slot.next_sequence;

            let initial = PlaybackSnapshot {
                sequence,
                key: key.clone(),
                phase: PlaybackPhase::Idle,
                error: None,
            };
            let (state_tx, state_rx) = watch::channel(initial.clone());

            if let Some(previous) = slot.active.replace(ActiveSession {
                sequence,
                cancel: cancel.clone(),
                state: state_tx,
            }) {
                previous.cancel.cancel();
                previous.state.send_modify(|snapshot| {
                    snapshot.phase = PlaybackPhase::Superseded;
                });
                tracing::debug!(
                    superseded = previous.sequence,
                    sequence,
                    "Playback superseded"
                );
            }

            self.shared.current.send_replace(Some(initial));
            (sequence, state_rx)
        };

        tracing::info!(sequence, key = %key, "Playback requested");

        tokio::spawn(run_session(
            self.shared.clone(),
            self.cache.clone(),
            self.budget.clone(),
            self.sink.clone(),
            sequence,
            key.clone(),
            cancel,
        ));

        PlaybackSession {
            sequence,
            state: state_rx,
        }
    }

    /// Last state published by the live (or most recent) request
    pub fn current(&self) -> Option<PlaybackSnapshot> {
        self.shared.current.borrow().clone()
    }
}

async fn run_session(
    shared: Arc<ControllerShared>,
    cache: Arc<AudioCache>,
    budget: Arc<DispatchBudget>,
    sink: Arc<dyn AudioSink>,
    sequence: u64,
    key: CacheKey,
    cancel: CancellationToken,
) {
    if !shared.publish(sequence, &key, PlaybackPhase::Resolving, None) {
        return;
    }

    let permit = budget.acquire_foreground();
    let resolved = tokio::select! {
        _ = cancel.cancelled() => {
            // The synthesis keeps running in the cache; hold the slot until it lands
            let (cache, key) = (cache.clone(), key.clone());
            tokio::spawn(async move {
                let _permit = permit;
                let _ = cache.resolve(&key).await;
            });
            return;
        }
        resolved = cache.resolve(&key) => resolved,
    };
    drop(permit);

    let clip = match resolved {
        Ok(clip) => clip,
        Err(e) => {
            tracing::warn!(sequence, key = %key, error = %e, "Playback could not resolve audio");
            if shared.publish(sequence, &key, PlaybackPhase::Errored, Some(&e)) {
                shared.publish(sequence, &key, PlaybackPhase::Settled, Some(&e));
            }
            return;
        }
    };

    if !shared.publish(sequence, &key, PlaybackPhase::Playing, None) {
        return;
    }

    let played = tokio::select! {
        _ = cancel.cancelled() => {
            tracing::debug!(sequence, key = %key, "Playback stopped");
            return;
        }
        played = sink.play(&key, clip) => played,
    };

    match played {
        Ok(()) => {
            tracing::debug!(sequence, key = %key, "Playback finished");
            shared.publish(sequence, &key, PlaybackPhase::Settled, None);
        }
        Err(e) => {
            tracing::warn!(sequence, key = %key, error = %e, "Audio output failed");
            if shared.publish(sequence, &key, PlaybackPhase::Errored, Some(&e)) {
                shared.publish(sequence, &key, PlaybackPhase::Settled, Some(&e));
            }
        }
    }
}
