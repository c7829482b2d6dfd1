use super::speech_repository::{SpeechError, SpeechRepository};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use regex::Regex;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use std::time::Duration;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini reports quota resets as `"retryDelay": "37s"` inside the error body
static RETRY_DELAY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""retryDelay"\s*:\s*"(\d+)(?:\.\d+)?s""#).expect("valid regex")
});

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    #[serde(default)]
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<&'static str>,
    speech_config: SpeechConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SpeechConfig {
    voice_config: VoiceConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceConfig {
    prebuilt_voice_config: PrebuiltVoiceConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PrebuiltVoiceConfig {
    voice_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

/// Gemini implementation of the speech repository, over the
/// `generateContent` REST endpoint
pub struct GeminiSpeechRepository {
    http_client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    tts_model: String,
    text_model: String,
    voice: String,
}

impl GeminiSpeechRepository {
    pub fn new(
        api_key: Option<String>,
        base_url: String,
        tts_model: String,
        text_model: String,
        voice: String,
    ) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            base_url: base_url.trim_end_matches('/').to_string(),
            tts_model,
            text_model,
            voice,
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }

    async fn generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, SpeechError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            SpeechError::Rejected("Gemini API key is not configured".to_string())
        })?;

        let response = self
            .http_client
            .post(self.endpoint(model))
            .header(API_KEY_HEADER, api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, model = %model, "Gemini request failed");
                SpeechError::Transient(format!("Gemini request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let headers = response.headers().clone();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            tracing::warn!(
                status = status.as_u16(),
                model = %model,
                body_preview = %body.chars().take(300).collect::<String>(),
                "Gemini returned an error status"
            );
            return Err(classify_status(status, &headers, &body));
        }

        response.json::<GenerateContentResponse>().await.map_err(|e| {
            SpeechError::Transient(format!("Malformed Gemini response: {}", e))
        })
    }
}

#[async_trait]
impl SpeechRepository for GeminiSpeechRepository {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SpeechError> {
        let start_time = std::time::Instant::now();

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(text.to_string()),
                    inline_data: None,
                }],
            }],
            generation_config: Some(GenerationConfig {
                response_modalities: vec!["AUDIO"],
                speech_config: SpeechConfig {
                    voice_config: VoiceConfig {
                        prebuilt_voice_config: PrebuiltVoiceConfig {
                            voice_name: self.voice.clone(),
                        },
                    },
                },
            }),
        };

        let response = self.generate(&self.tts_model, &request).await?;
        let audio = extract_audio(response)?;

        tracing::info!(
            provider = "gemini",
            model = %self.tts_model,
            voice = %self.voice,
            latency_ms = start_time.elapsed().as_millis() as u64,
            characters_count = text.chars().count(),
            audio_size_bytes = audio.len(),
            "TTS synthesis completed"
        );

        Ok(audio)
    }

    async fn explain(&self, text: &str) -> Result<String, SpeechError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(explain_prompt(text)),
                    inline_data: None,
                }],
            }],
            generation_config: None,
        };

        let response = self.generate(&self.text_model, &request).await?;
        extract_text(response)
    }

    fn provider(&self) -> &'static str {
        "gemini"
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

pub(crate) fn explain_prompt(text: &str) -> String {
    format!(
        "Explain the Chinese word or phrase \"{}\" to a beginner learner. \
         Keep it under 50 words, mention when it is used, and add one memory tip.",
        text
    )
}

fn classify_status(status: StatusCode, headers: &HeaderMap, body: &str) -> SpeechError {
    let message = format!("Gemini returned {}", status);

    match status {
        StatusCode::TOO_MANY_REQUESTS => SpeechError::RateLimited {
            message,
            retry_after: retry_after_header(headers).or_else(|| retry_delay_in_body(body)),
        },
        StatusCode::REQUEST_TIMEOUT => SpeechError::Transient(message),
        s if s.is_client_error() => SpeechError::Rejected(format!("{}: {}", message, body.trim())),
        _ => SpeechError::Transient(message),
    }
}

fn retry_after_header(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

fn retry_delay_in_body(body: &str) -> Option<Duration> {
    RETRY_DELAY_PATTERN
        .captures(body)?
        .get(1)?
        .as_str()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

fn blocked_reason(response: &GenerateContentResponse) -> Option<String> {
    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|feedback| feedback.block_reason.clone())
    {
        return Some(reason);
    }

    response
        .candidates
        .iter()
        .filter_map(|candidate| candidate.finish_reason.as_deref())
        .find(|reason| matches!(*reason, "SAFETY" | "PROHIBITED_CONTENT" | "BLOCKLIST"))
        .map(str::to_string)
}

fn extract_audio(response: GenerateContentResponse) -> Result<Vec<u8>, SpeechError> {
    if let Some(reason) = blocked_reason(&response) {
        return Err(SpeechError::Rejected(format!("Request blocked: {}", reason)));
    }

    let data = response
        .candidates
        .into_iter()
        .filter_map(|candidate| candidate.content)
        .flat_map(|content| content.parts)
        .find_map(|part| part.inline_data)
        .map(|inline| {
            tracing::debug!(mime_type = %inline.mime_type, "Gemini audio part received");
            inline.data
        })
        .ok_or_else(|| SpeechError::Rejected("Gemini returned no audio".to_string()))?;

    let audio = BASE64
        .decode(data.as_bytes())
        .map_err(|e| SpeechError::Transient(format!("Undecodable audio payload: {}", e)))?;

    if audio.is_empty() {
        return Err(SpeechError::Rejected("Gemini returned empty audio".to_string()));
    }

    Ok(audio)
}

fn extract_text(response: GenerateContentResponse) -> Result<String, SpeechError> {
    if let Some(reason) = blocked_reason(&response) {
        return Err(SpeechError::Rejected(format!("Request blocked: {}", reason)));
    }

    let text: String = response
        .candidates
        .into_iter()
        .filter_map(|candidate| candidate.content)
        .flat_map(|content| content.parts)
        .filter_map(|part| part.text)
        .collect();

    let text = text.trim();
    if text.is_empty() {
        return Err(SpeechError::Rejected(
            "Gemini returned no explanation".to_string(),
        ));
    }

    Ok(text.to_string())
}
