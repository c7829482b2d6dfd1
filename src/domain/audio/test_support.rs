//! Scripted speech provider and recording sink shared by the audio unit tests.

use super::clip::AudioClip;
use super::error::AudioError;
use super::key::CacheKey;
use super::sink::AudioSink;
use crate::infrastructure::repositories::{SpeechError, SpeechRepository};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

pub const CLIP_BYTES: [u8; 4] = [1, 0, 2, 0];

#[derive(Default)]
pub struct FakeSpeechRepository {
    calls: Mutex<Vec<String>>,
    explain_calls: Mutex<Vec<String>>,
    scripted: Mutex<HashMap<String, VecDeque<Result<Vec<u8>, SpeechError>>>>,
    gates: Mutex<HashMap<String, Arc<Semaphore>>>,
    released: Mutex<HashSet<String>>,
    hold_all: Mutex<bool>,
    delay: Mutex<Option<Duration>>,
    panics: Mutex<HashSet<String>>,
}

impl FakeSpeechRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a one-shot response for `text`; later calls fall back to a clip
    pub fn script(&self, text: &str, response: Result<Vec<u8>, SpeechError>) {
        self.scripted
            .lock()
            .entry(text.to_string())
            .or_default()
            .push_back(response);
    }

    /// Hold every synthesis open until `release` is called for its text
    pub fn hold_all(&self) {
        *self.hold_all.lock() = true;
    }

    pub fn hold(&self, text: &str) {
        self.gate(text);
    }

    pub fn release(&self, text: &str) {
        self.released.lock().insert(text.to_string());
        self.gate(text).add_permits(1);
    }

    /// Make the next synthesis of `text` panic inside the provider
    pub fn panic_once(&self, text: &str) {
        self.panics.lock().insert(text.to_string());
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = Some(delay);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn explain_count(&self) -> usize {
        self.explain_calls.lock().len()
    }

    pub async fn wait_for_calls(&self, expected: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while self.call_count() < expected {
                tokio::time::sleep(Duration::from_millis(2)).await;
            }
        })
        .await
        .unwrap_or_else(|_| {
            panic!(
                "expected {} synthesis calls, saw {:?}",
                expected,
                self.calls()
            )
        });
    }

    fn gate(&self, text: &str) -> Arc<Semaphore> {
        self.gates
            .lock()
            .entry(text.to_string())
            .or_insert_with(|| Arc::new(Semaphore::new(0)))
            .clone()
    }

    fn is_held(&self, text: &str) -> bool {
        if self.released.lock().contains(text) {
            return false;
        }
        *self.hold_all.lock() || self.gates.lock().contains_key(text)
    }
}

#[async_trait]
impl SpeechRepository for FakeSpeechRepository {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SpeechError> {
        self.calls.lock().push(text.to_string());

        if self.is_held(text) {
            let gate = self.gate(text);
            // The permit goes straight back so every waiter on this text passes
            let _ = gate.acquire().await;
        }

        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.panics.lock().remove(text) {
            panic!("provider bug while synthesizing {}", text);
        }

        let scripted = self
            .scripted
            .lock()
            .get_mut(text)
            .and_then(|queue| queue.pop_front());

        scripted.unwrap_or_else(|| Ok(CLIP_BYTES.to_vec()))
    }

    async fn explain(&self, text: &str) -> Result<String, SpeechError> {
        self.explain_calls.lock().push(text.to_string());

        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        Ok(format!("{} is a common word.", text))
    }

    fn provider(&self) -> &'static str {
        "fake"
    }

    fn is_configured(&self) -> bool {
        true
    }
}

/// Sink that records what it played. Playback of a held key blocks until released.
#[derive(Default)]
pub struct RecordingSink {
    played: Mutex<Vec<String>>,
    gates: Mutex<HashMap<String, Arc<Semaphore>>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn hold(&self, text: &str) {
        self.gates
            .lock()
            .insert(text.to_string(), Arc::new(Semaphore::new(0)));
    }

    pub fn release(&self, text: &str) {
        if let Some(gate) = self.gates.lock().get(text) {
            gate.add_permits(1);
        }
    }

    pub fn played(&self) -> Vec<String> {
        self.played.lock().clone()
    }
}

#[async_trait]
impl AudioSink for RecordingSink {
    async fn play(&self, key: &CacheKey, _clip: Arc<AudioClip>) -> Result<(), AudioError> {
        self.played.lock().push(key.to_string());
        let gate = self.gates.lock().get(key.as_str()).cloned();
        if let Some(gate) = gate {
            let _ = gate.acquire().await;
        }
        Ok(())
    }
}

pub fn key(text: &str) -> CacheKey {
    CacheKey::new(text).unwrap()
}

pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}
