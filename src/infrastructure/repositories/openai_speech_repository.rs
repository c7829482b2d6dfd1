use super::gemini_speech_repository::explain_prompt;
use super::speech_repository::{SpeechError, SpeechRepository};
use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
        CreateSpeechRequest, SpeechModel, SpeechResponseFormat, Voice,
    },
    Client,
};
use async_trait::async_trait;
use backoff::ExponentialBackoffBuilder;
use regex::Regex;
use std::sync::{Arc, LazyLock};
use std::time::Duration;

/// OpenAI has a limit of 4096 characters per request
const MAX_BATCH_SIZE: usize = 4096;

static SENTENCE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+\s+|[。！？]+").expect("valid regex"));

/// Client with async-openai's built-in 429 retry turned off. Rate limits
/// must reach the audio cache so it can apply its own backoff.
pub fn client_without_retry(api_key: &str) -> Client<OpenAIConfig> {
    let no_retry = ExponentialBackoffBuilder::new()
        .with_max_elapsed_time(Some(Duration::ZERO))
        .build();

    Client::with_config(OpenAIConfig::new().with_api_key(api_key)).with_backoff(no_retry)
}

/// OpenAI implementation of the speech repository
pub struct OpenAiSpeechRepository {
    client: Arc<Client<OpenAIConfig>>,
    configured: bool,
    tts_model: String,
    voice: String,
    chat_model: String,
}

impl OpenAiSpeechRepository {
    pub fn new(
        client: Arc<Client<OpenAIConfig>>,
        configured: bool,
        tts_model: String,
        voice: String,
        chat_model: String,
    ) -> Self {
        Self {
            client,
            configured,
            tts_model,
            voice,
            chat_model,
        }
    }

    /// Call OpenAI TTS API to synthesize a single text batch
    async fn call_openai(&self, text: &str) -> Result<Vec<u8>, SpeechError> {
        tracing::debug!(
            model = %self.tts_model,
            voice = %self.voice,
            text_length = text.len(),
            "Calling OpenAI TTS API"
        );

        let request = CreateSpeechRequest {
            model: parse_model(&self.tts_model),
            input: text.to_string(),
            voice: parse_voice(&self.voice),
            response_format: Some(SpeechResponseFormat::Pcm), // 24 kHz s16le mono
            speed: None,
        };

        let response = self.client.audio().speech(request).await.map_err(|e| {
            tracing::error!(
                error = %e,
                model = %self.tts_model,
                voice = %self.voice,
                text_length = text.len(),
                "OpenAI TTS API call failed"
            );
            classify_error(e)
        })?;

        Ok(response.bytes.to_vec())
    }
}

#[async_trait]
impl SpeechRepository for OpenAiSpeechRepository {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SpeechError> {
        if !self.configured {
            return Err(SpeechError::Rejected(
                "OpenAI API key is not configured".to_string(),
            ));
        }

        let start_time = std::time::Instant::now();
        let batches = split_into_batches(text);

        // Raw PCM concatenates cleanly, unlike framed formats
        let mut merged_audio = Vec::new();
        for (index, batch) in batches.iter().enumerate() {
            let audio = self.call_openai(batch).await?;
            tracing::debug!(
                batch_index = index,
                batch_audio_size = audio.len(),
                "Batch synthesized"
            );
            merged_audio.extend(audio);
        }

        tracing::info!(
            provider = "openai",
            model = %self.tts_model,
            voice = %self.voice,
            latency_ms = start_time.elapsed().as_millis() as u64,
            characters_count = text.chars().count(),
            batch_count = batches.len(),
            audio_size_bytes = merged_audio.len(),
            "TTS synthesis completed"
        );

        Ok(merged_audio)
    }

    async fn explain(&self, text: &str) -> Result<String, SpeechError> {
        if !self.configured {
            return Err(SpeechError::Rejected(
                "OpenAI API key is not configured".to_string(),
            ));
        }

        let message = ChatCompletionRequestUserMessageArgs::default()
            .content(explain_prompt(text))
            .build()
            .map_err(classify_error)?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(self.chat_model.as_str())
            .messages(vec![message.into()])
            .build()
            .map_err(classify_error)?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(classify_error)?;

        response
            .choices
            .into_iter()
            .find_map(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| SpeechError::Rejected("OpenAI returned no explanation".to_string()))
    }

    fn provider(&self) -> &'static str {
        "openai"
    }

    fn is_configured(&self) -> bool {
        self.configured
    }
}

fn parse_model(model: &str) -> SpeechModel {
    match model {
        "tts-1" => SpeechModel::Tts1,
        "tts-1-hd" => SpeechModel::Tts1Hd,
        other => SpeechModel::Other(other.to_string()),
    }
}

fn parse_voice(voice: &str) -> Voice {
    match voice.to_lowercase().as_str() {
        "alloy" => Voice::Alloy,
        "echo" => Voice::Echo,
        "fable" => Voice::Fable,
        "onyx" => Voice::Onyx,
        "nova" => Voice::Nova,
        "shimmer" => Voice::Shimmer,
        _ => Voice::Nova, // Default fallback
    }
}

fn classify_error(err: OpenAIError) -> SpeechError {
    match err {
        OpenAIError::ApiError(api_error) => {
            let kind = api_error.r#type.clone().unwrap_or_default();
            let message = format!("OpenAI error: {}", api_error.message);

            match kind.as_str() {
                "rate_limit_exceeded" | "insufficient_quota" | "requests" | "tokens" => {
                    SpeechError::RateLimited {
                        message,
                        retry_after: None,
                    }
                }
                "invalid_request_error" | "authentication_error" | "permission_error" => {
                    SpeechError::Rejected(message)
                }
                _ => SpeechError::Transient(message),
            }
        }
        OpenAIError::InvalidArgument(msg) => SpeechError::Rejected(msg),
        other => SpeechError::Transient(format!("OpenAI request failed: {}", other)),
    }
}

/// Split text into batches that respect sentence boundaries.
/// Each batch is at most MAX_BATCH_SIZE bytes.
fn split_into_batches(text: &str) -> Vec<String> {
    if text.len() <= MAX_BATCH_SIZE {
        return vec![text.to_string()];
    }

    let mut batches = Vec::new();
    let mut current_batch = String::new();
    let mut last_end = 0;

    for mat in SENTENCE_PATTERN.find_iter(text) {
        let sentence = &text[last_end..mat.end()];

        if !current_batch.is_empty() && current_batch.len() + sentence.len() > MAX_BATCH_SIZE {
            batches.push(current_batch.trim().to_string());
            current_batch = String::new();
        }

        current_batch.push_str(sentence);
        last_end = mat.end();
    }

    // Handle remaining text after last sentence boundary
    if last_end < text.len() {
        let remaining = &text[last_end..];

        if !current_batch.is_empty() && current_batch.len() + remaining.len() > MAX_BATCH_SIZE {
            batches.push(current_batch.trim().to_string());
            current_batch = String::new();
        }

        // No boundary to split on: fall back to fixed-size chunks
        if remaining.len() > MAX_BATCH_SIZE {
            let mut chunk = String::new();
            for c in remaining.chars() {
                if chunk.len() + c.len_utf8() > MAX_BATCH_SIZE {
                    batches.push(std::mem::take(&mut chunk));
                }
                chunk.push(c);
            }
            if !chunk.is_empty() {
                batches.push(chunk);
            }
        } else {
            current_batch.push_str(remaining);
        }
    }

    if !current_batch.is_empty() {
        batches.push(current_batch.trim().to_string());
    }

    batches
}
