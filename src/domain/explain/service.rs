use super::error::ExplainServiceError;
use super::Explanation;
use crate::infrastructure::repositories::SpeechRepository;
use async_trait::async_trait;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

/// Longest phrase we send for explanation
const MAX_EXPLAIN_CHARS: usize = 200;

pub struct ExplainService {
    speech_repo: Arc<dyn SpeechRepository>,
    cache: Option<Cache<String, String>>,
    timeout: Duration,
}

impl ExplainService {
    pub fn new(
        speech_repo: Arc<dyn SpeechRepository>,
        cache_enabled: bool,
        timeout: Duration,
    ) -> Self {
        let cache = if cache_enabled {
            Some(
                Cache::builder()
                    .max_capacity(500)
                    .time_to_idle(Duration::from_secs(30 * 60)) // refreshes on access
                    .build(),
            )
        } else {
            None
        };

        Self {
            speech_repo,
            cache,
            timeout,
        }
    }
}

#[async_trait]
pub trait ExplainServiceApi: Send + Sync {
    /// Short learner-facing note on a word or phrase: usage, tone, and a
    /// memory aid. Results are cached per phrase when caching is enabled.
    async fn explain(&self, text: &str) -> Result<Explanation, ExplainServiceError>;
}

#[async_trait]
impl ExplainServiceApi for ExplainService {
    async fn explain(&self, text: &str) -> Result<Explanation, ExplainServiceError> {
        let phrase = text.trim();

        if phrase.is_empty() {
            return Err(ExplainServiceError::Invalid(
                "Text cannot be empty".to_string(),
            ));
        }

        if phrase.chars().count() > MAX_EXPLAIN_CHARS {
            return Err(ExplainServiceError::Invalid(format!(
                "Text exceeds {} characters",
                MAX_EXPLAIN_CHARS
            )));
        }

        if let Some(cache) = &self.cache {
            if let Some(explanation) = cache.get(phrase).await {
                tracing::info!(phrase = %phrase, "Explanation cache hit");
                return Ok(Explanation {
                    text: phrase.to_string(),
                    explanation,
                    cached: true,
                });
            }
        }

        let start_time = std::time::Instant::now();
        let explanation = tokio::time::timeout(self.timeout, self.speech_repo.explain(phrase))
            .await
            .map_err(|_| {
                ExplainServiceError::Dependency(format!(
                    "Explanation timed out after {}s",
                    self.timeout.as_secs()
                ))
            })??;

        tracing::info!(
            phrase = %phrase,
            provider = self.speech_repo.provider(),
            latency_ms = start_time.elapsed().as_millis() as u64,
            explanation_length = explanation.len(),
            "Explanation generated"
        );

        if let Some(cache) = &self.cache {
            cache.insert(phrase.to_string(), explanation.clone()).await;
        }

        Ok(Explanation {
            text: phrase.to_string(),
            explanation,
            cached: false,
        })
    }
}
