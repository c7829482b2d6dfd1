use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use panda_tutor::controllers::{
    audio::AudioController, explain::ExplainController, lesson::LessonController,
    quiz::QuizController,
};
use panda_tutor::domain::audio::{AudioService, PacedSink};
use panda_tutor::domain::explain::ExplainService;
use panda_tutor::domain::lesson::LessonService;
use panda_tutor::domain::quiz::QuizService;
use panda_tutor::infrastructure::config::{Config, LogFormat, SpeechProvider};
use panda_tutor::infrastructure::http::{build_router, start_http_server, AppControllers};
use panda_tutor::infrastructure::repositories::{
    client_without_retry, GeminiSpeechRepository, HardcodedLessonRepository,
    JsonFileMistakeRepository, OpenAiSpeechRepository, SpeechRepository,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting Panda Tutor on {}:{}",
        config.host,
        config.port
    );

    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Instantiate the speech provider
    tracing::info!(provider = ?config.speech_provider, "Instantiating speech provider...");
    let speech_repo = create_speech_repository(&config);

    if !speech_repo.is_configured() {
        tracing::warn!(
            provider = speech_repo.provider(),
            "Missing API key. Lessons will load but audio and explanations will fail until one is set"
        );
    }

    // 2. Instantiate repositories
    tracing::info!("Instantiating repositories...");
    let lesson_repo = Arc::new(HardcodedLessonRepository::new());
    let mistake_repo = Arc::new(JsonFileMistakeRepository::new(config.mistakes_path.clone()));
    tracing::info!(path = %mistake_repo.path().display(), "Mistake notebook location");

    // 3. Instantiate services (inject repositories and clients)
    tracing::info!("Instantiating services...");
    let audio_service = Arc::new(AudioService::new(
        speech_repo.clone(),
        Arc::new(PacedSink::new()),
        config.audio_settings(),
    ));
    let lesson_service = Arc::new(LessonService::new(
        lesson_repo.clone(),
        audio_service.clone(),
        config.lesson_prefetch_limit,
    ));
    let quiz_service = Arc::new(QuizService::new(lesson_repo, mistake_repo));
    let explain_service = Arc::new(ExplainService::new(
        speech_repo.clone(),
        config.explanation_cache_enabled,
        Duration::from_secs(config.synthesis_timeout_secs),
    ));

    // 4. Instantiate controllers (inject services)
    tracing::info!("Instantiating controllers...");
    let controllers = AppControllers {
        speech_repo,
        lesson_controller: Arc::new(LessonController::new(lesson_service)),
        quiz_controller: Arc::new(QuizController::new(quiz_service)),
        audio_controller: Arc::new(AudioController::new(audio_service)),
        explain_controller: Arc::new(ExplainController::new(explain_service)),
    };

    // Start HTTP server with all routes
    start_http_server(config, build_router(controllers)).await?;

    Ok(())
}

fn create_speech_repository(config: &Config) -> Arc<dyn SpeechRepository> {
    match config.speech_provider {
        SpeechProvider::Gemini => Arc::new(GeminiSpeechRepository::new(
            config.gemini_api_key.clone(),
            config.gemini_base_url.clone(),
            config.gemini_tts_model.clone(),
            config.gemini_text_model.clone(),
            config.gemini_voice.clone(),
        )),
        SpeechProvider::OpenAi => {
            let api_key = config.openai_api_key.clone().unwrap_or_default();
            Arc::new(OpenAiSpeechRepository::new(
                Arc::new(client_without_retry(&api_key)),
                !api_key.is_empty(),
                config.openai_tts_model.clone(),
                config.openai_voice.clone(),
                config.openai_chat_model.clone(),
            ))
        }
    }
}

fn init_logging(config: &Config) {
    let default_filter = if config.is_development() {
        "panda_tutor=debug,tower_http=debug"
    } else {
        "panda_tutor=info,tower_http=info"
    };

    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| default_filter.into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| default_filter.into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
