use super::error::AudioError;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static WHITESPACE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Normalized utterance text. Two requests for the same text always resolve
/// to the same cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    /// Trim and collapse whitespace runs (including the ideographic space)
    /// to a single ASCII space. Empty input is rejected up front so it never
    /// reaches the provider.
    pub fn new(text: &str) -> Result<Self, AudioError> {
        let normalized = WHITESPACE_PATTERN.replace_all(text.trim(), " ");

        if normalized.is_empty() {
            return Err(AudioError::SynthesisRejected(
                "Text cannot be empty".to_string(),
            ));
        }

        Ok(Self(normalized.into_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
