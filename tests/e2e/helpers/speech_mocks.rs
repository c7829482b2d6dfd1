use async_trait::async_trait;
use panda_tutor::infrastructure::repositories::{SpeechError, SpeechRepository};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

/// 100 ms of silence at 24 kHz mono s16le
pub const CLIP_SAMPLES: usize = 2_400;

/// Scripted speech provider standing in for Gemini/OpenAI in e2e tests.
/// Unscripted texts synthesize a short silent clip.
pub struct MockSpeechRepository {
    configured: bool,
    calls: Mutex<Vec<String>>,
    explain_calls: Mutex<Vec<String>>,
    scripted: Mutex<HashMap<String, VecDeque<SpeechError>>>,
}

#[allow(dead_code)]
impl MockSpeechRepository {
    pub fn new() -> Arc<Self> {
        Self::with_configured(true)
    }

    /// Provider with no API key, as at first launch
    pub fn unconfigured() -> Arc<Self> {
        Self::with_configured(false)
    }

    fn with_configured(configured: bool) -> Arc<Self> {
        Arc::new(Self {
            configured,
            calls: Mutex::new(Vec::new()),
            explain_calls: Mutex::new(Vec::new()),
            scripted: Mutex::new(HashMap::new()),
        })
    }

    /// Fail the next synthesis of `text` with `error`
    pub fn fail_next(&self, text: &str, error: SpeechError) {
        self.scripted
            .lock()
            .entry(text.to_string())
            .or_default()
            .push_back(error);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn calls_for(&self, text: &str) -> usize {
        self.calls.lock().iter().filter(|call| *call == text).count()
    }

    pub fn explain_count(&self) -> usize {
        self.explain_calls.lock().len()
    }

    /// Poll until at least `expected` synthesis calls were made
    pub async fn wait_for_calls(&self, expected: usize) {
        let waited = tokio::time::timeout(Duration::from_secs(5), async {
            while self.calls.lock().len() < expected {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await;

        assert!(
            waited.is_ok(),
            "Expected {} synthesis calls, saw {:?}",
            expected,
            self.calls()
        );
    }
}

#[async_trait]
impl SpeechRepository for MockSpeechRepository {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SpeechError> {
        self.calls.lock().push(text.to_string());

        if !self.configured {
            return Err(SpeechError::Rejected("API key is not configured".to_string()));
        }

        let scripted = self
            .scripted
            .lock()
            .get_mut(text)
            .and_then(VecDeque::pop_front);
        if let Some(error) = scripted {
            return Err(error);
        }

        // Give the foreground path a chance to race background work
        tokio::time::sleep(Duration::from_millis(5)).await;
        Ok(vec![0u8; CLIP_SAMPLES * 2])
    }

    async fn explain(&self, text: &str) -> Result<String, SpeechError> {
        self.explain_calls.lock().push(text.to_string());

        if !self.configured {
            return Err(SpeechError::Rejected("API key is not configured".to_string()));
        }

        Ok(format!("{} is a useful everyday word.", text))
    }

    fn provider(&self) -> &'static str {
        "mock"
    }

    fn is_configured(&self) -> bool {
        self.configured
    }
}
