use crate::domain::audio::AudioSettings;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    // Speech provider
    pub speech_provider: SpeechProvider,
    pub gemini_api_key: Option<String>,
    pub gemini_base_url: String,
    pub gemini_tts_model: String,
    pub gemini_text_model: String,
    pub gemini_voice: String,
    pub openai_api_key: Option<String>,
    pub openai_tts_model: String,
    pub openai_voice: String,
    pub openai_chat_model: String,
    // Audio cache and prefetch
    pub synthesis_timeout_secs: u64,
    pub network_backoff_secs: u64,
    pub rate_limit_backoff_secs: u64,
    pub audio_cache_max_bytes: usize,
    pub prefetch_concurrency: usize,
    pub lesson_prefetch_limit: usize,
    // Explanations and mistakes
    pub explanation_cache_enabled: bool,
    pub mistakes_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum SpeechProvider {
    Gemini,
    OpenAi,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let config = Config {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_or("PORT", 8787)?,
            environment: env::var("ENVIRONMENT")
                .map(|s| match s.to_lowercase().as_str() {
                    "production" => Environment::Production,
                    _ => Environment::Development,
                })
                .unwrap_or(Environment::Development),
            log_format: env::var("LOG_FORMAT")
                .map(|s| match s.to_lowercase().as_str() {
                    "json" => LogFormat::Json,
                    _ => LogFormat::Pretty,
                })
                .unwrap_or(LogFormat::Pretty),
            speech_provider: match env::var("SPEECH_PROVIDER") {
                Ok(s) => match s.to_lowercase().as_str() {
                    "gemini" => SpeechProvider::Gemini,
                    "openai" => SpeechProvider::OpenAi,
                    other => return Err(format!("Unknown SPEECH_PROVIDER '{}'", other).into()),
                },
                Err(_) => SpeechProvider::Gemini,
            },
            // The web client read API_KEY, keep it as a fallback
            gemini_api_key: non_empty("GEMINI_API_KEY").or_else(|| non_empty("API_KEY")),
            gemini_base_url: env::var("GEMINI_BASE_URL").unwrap_or_else(|_| {
                "https://generativelanguage.googleapis.com/v1beta".to_string()
            }),
            gemini_tts_model: env::var("GEMINI_TTS_MODEL")
                .unwrap_or_else(|_| "gemini-2.5-flash-preview-tts".to_string()),
            gemini_text_model: env::var("GEMINI_TEXT_MODEL")
                .unwrap_or_else(|_| "gemini-2.5-flash".to_string()),
            gemini_voice: env::var("GEMINI_VOICE").unwrap_or_else(|_| "Kore".to_string()),
            openai_api_key: non_empty("OPENAI_API_KEY"),
            openai_tts_model: env::var("OPENAI_TTS_MODEL").unwrap_or_else(|_| "tts-1".to_string()),
            openai_voice: env::var("OPENAI_VOICE").unwrap_or_else(|_| "nova".to_string()),
            openai_chat_model: env::var("OPENAI_CHAT_MODEL")
                .unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            synthesis_timeout_secs: parse_or("SYNTHESIS_TIMEOUT_SECS", 20)?,
            network_backoff_secs: parse_or("NETWORK_BACKOFF_SECS", 30)?,
            rate_limit_backoff_secs: parse_or("RATE_LIMIT_BACKOFF_SECS", 120)?,
            audio_cache_max_bytes: parse_or("AUDIO_CACHE_MAX_BYTES", 50 * 1024 * 1024)?,
            prefetch_concurrency: parse_or("PREFETCH_CONCURRENCY", 2)?,
            lesson_prefetch_limit: parse_or("LESSON_PREFETCH_LIMIT", 5)?,
            explanation_cache_enabled: env::var("EXPLANATION_CACHE_ENABLED")
                .map(|s| s.to_lowercase() != "false")
                .unwrap_or(true),
            mistakes_path: env::var("MISTAKES_PATH")
                .unwrap_or_else(|_| "data/panda_mistakes.json".to_string())
                .into(),
        };

        if config.prefetch_concurrency == 0 {
            return Err("PREFETCH_CONCURRENCY must be at least 1".into());
        }

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    pub fn audio_settings(&self) -> AudioSettings {
        AudioSettings {
            prefetch_concurrency: self.prefetch_concurrency,
            cache_max_bytes: self.audio_cache_max_bytes,
            synthesis_timeout: Duration::from_secs(self.synthesis_timeout_secs),
            network_backoff: Duration::from_secs(self.network_backoff_secs),
            rate_limit_backoff: Duration::from_secs(self.rate_limit_backoff_secs),
        }
    }
}

fn non_empty(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_or<T>(name: &str, default: T) -> Result<T, Box<dyn std::error::Error>>
where
    T: FromStr,
    T::Err: std::error::Error + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| format!("Invalid {}: {}", name, e).into()),
        Err(_) => Ok(default),
    }
}
