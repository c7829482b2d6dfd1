use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::{
    domain::quiz::{AnswerOutcome, AnswerRequest, Mistake, QuizService, QuizServiceApi},
    error::AppResult,
};

pub struct QuizController {
    quiz_service: Arc<QuizService>,
}

impl QuizController {
    pub fn new(quiz_service: Arc<QuizService>) -> Self {
        Self { quiz_service }
    }

    /// POST /api/lessons/{lessonId}/answers - Grade a quiz answer
    pub async fn answer(
        State(controller): State<Arc<QuizController>>,
        Path(lesson_id): Path<String>,
        Json(request): Json<AnswerRequest>,
    ) -> AppResult<Json<AnswerOutcome>> {
        let outcome = controller.quiz_service.answer(&lesson_id, request).await?;
        Ok(Json(outcome))
    }

    /// GET /api/mistakes - Mistake notebook, newest first
    pub async fn list_mistakes(
        State(controller): State<Arc<QuizController>>,
    ) -> AppResult<Json<Vec<Mistake>>> {
        let mistakes = controller.quiz_service.list_mistakes().await?;
        Ok(Json(mistakes))
    }

    /// DELETE /api/mistakes - Clear the notebook
    pub async fn clear_mistakes(
        State(controller): State<Arc<QuizController>>,
    ) -> AppResult<StatusCode> {
        controller.quiz_service.clear_mistakes().await?;
        Ok(StatusCode::NO_CONTENT)
    }
}
