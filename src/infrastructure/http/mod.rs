pub mod request_id;

use axum::{
    extract::Request,
    middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::controllers::{
    audio::AudioController, explain::ExplainController, health, lesson::LessonController,
    quiz::QuizController,
};
use crate::infrastructure::config::Config;
use crate::infrastructure::repositories::SpeechRepository;

pub use request_id::{request_id_middleware, RequestId, X_REQUEST_ID};

/// Controllers the router dispatches to
pub struct AppControllers {
    pub speech_repo: Arc<dyn SpeechRepository>,
    pub lesson_controller: Arc<LessonController>,
    pub quiz_controller: Arc<QuizController>,
    pub audio_controller: Arc<AudioController>,
    pub explain_controller: Arc<ExplainController>,
}

/// Build the application router with every route and layer attached
pub fn build_router(controllers: AppControllers) -> Router {
    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(controllers.speech_repo);

    let lesson_routes = Router::new()
        .route("/api/lessons", get(LessonController::list_lessons))
        .route("/api/lessons/:lessonId", get(LessonController::get_lesson))
        .route("/api/lessons/:lessonId/open", post(LessonController::open_lesson))
        .route("/api/lessons/:lessonId/close", post(LessonController::close_lesson))
        .with_state(controllers.lesson_controller);

    let quiz_routes = Router::new()
        .route("/api/lessons/:lessonId/answers", post(QuizController::answer))
        .route(
            "/api/mistakes",
            get(QuizController::list_mistakes).delete(QuizController::clear_mistakes),
        )
        .with_state(controllers.quiz_controller);

    let audio_routes = Router::new()
        .route("/api/audio/resolve", post(AudioController::resolve))
        .route("/api/audio/prefetch", post(AudioController::prefetch))
        .route(
            "/api/audio/prefetch/:jobId",
            get(AudioController::job_status).delete(AudioController::cancel_job),
        )
        .route("/api/audio/play", post(AudioController::play))
        .route("/api/audio/playback", get(AudioController::current_playback))
        .route("/api/audio/stats", get(AudioController::stats))
        .route("/api/audio/cache", delete(AudioController::clear_cache))
        .with_state(controllers.audio_controller);

    let explain_routes = Router::new()
        .route("/api/explain", post(ExplainController::explain))
        .with_state(controllers.explain_controller);

    Router::new()
        .merge(health_routes)
        .merge(lesson_routes)
        .merge(quiz_routes)
        .merge(audio_routes)
        .merge(explain_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            let request_id = request
                .extensions()
                .get::<RequestId>()
                .map(|id| id.0.as_str())
                .unwrap_or("-");
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id,
            )
        }))
        // Outermost, so the trace span can see the ID
        .layer(middleware::from_fn(request_id_middleware))
}

/// Start the HTTP server and serve until Ctrl-C
pub async fn start_http_server(
    config: Arc<Config>,
    app: Router,
) -> Result<(), Box<dyn std::error::Error>> {
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
