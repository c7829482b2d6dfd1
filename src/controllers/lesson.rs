use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    domain::lesson::{Lesson, LessonActivation, LessonService, LevelGroup},
    error::AppResult,
};

/// Query for GET /api/lessons
#[derive(Debug, Deserialize)]
pub struct ListLessonsQuery {
    pub level: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseLessonResponse {
    pub lesson_id: String,
    /// False when the lesson was not the active one
    pub closed: bool,
}

pub struct LessonController {
    lesson_service: Arc<LessonService>,
}

impl LessonController {
    pub fn new(lesson_service: Arc<LessonService>) -> Self {
        Self { lesson_service }
    }

    /// GET /api/lessons?level= - Lesson summaries grouped by level
    pub async fn list_lessons(
        State(controller): State<Arc<LessonController>>,
        Query(query): Query<ListLessonsQuery>,
    ) -> AppResult<Json<Vec<LevelGroup>>> {
        let groups = controller.lesson_service.list(query.level.as_deref())?;
        Ok(Json(groups))
    }

    /// GET /api/lessons/{lessonId} - Full lesson content
    pub async fn get_lesson(
        State(controller): State<Arc<LessonController>>,
        Path(lesson_id): Path<String>,
    ) -> AppResult<Json<Lesson>> {
        let lesson = controller.lesson_service.get(&lesson_id)?;
        Ok(Json(lesson))
    }

    /// POST /api/lessons/{lessonId}/open - Activate a lesson and warm its audio
    pub async fn open_lesson(
        State(controller): State<Arc<LessonController>>,
        Path(lesson_id): Path<String>,
    ) -> AppResult<Json<LessonActivation>> {
        let activation = controller.lesson_service.open(&lesson_id)?;
        Ok(Json(activation))
    }

    /// POST /api/lessons/{lessonId}/close - Dismiss a lesson
    pub async fn close_lesson(
        State(controller): State<Arc<LessonController>>,
        Path(lesson_id): Path<String>,
    ) -> AppResult<Json<CloseLessonResponse>> {
        let closed = controller.lesson_service.close(&lesson_id)?;
        Ok(Json(CloseLessonResponse { lesson_id, closed }))
    }
}
