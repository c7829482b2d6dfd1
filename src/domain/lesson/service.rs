use super::error::LessonServiceError;
use super::{Lesson, LessonRepository, Level, LevelGroup, LEVELS};
use crate::domain::audio::{AudioServiceApi, PrefetchHandle, PrefetchPriority};
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonActivation {
    pub lesson_id: String,
    /// `None` when the lesson has nothing to warm
    pub prefetch_job_id: Option<Uuid>,
    pub prefetch_count: usize,
    /// Lesson whose prefetch was cancelled by this activation
    pub superseded_lesson_id: Option<String>,
}

struct ActiveLesson {
    lesson_id: String,
    prefetch: Option<PrefetchHandle>,
}

pub struct LessonService {
    repository: Arc<dyn LessonRepository>,
    audio_service: Arc<dyn AudioServiceApi>,
    prefetch_limit: usize,
    active: Mutex<Option<ActiveLesson>>,
}

impl LessonService {
    pub fn new(
        repository: Arc<dyn LessonRepository>,
        audio_service: Arc<dyn AudioServiceApi>,
        prefetch_limit: usize,
    ) -> Self {
        Self {
            repository,
            audio_service,
            prefetch_limit,
            active: Mutex::new(None),
        }
    }

    /// Lesson summaries grouped by level in catalog order.
    /// Levels with no lessons are left out.
    pub fn list(&self, level: Option<&str>) -> Result<Vec<LevelGroup>, LessonServiceError> {
        let filter = level.map(str::parse::<Level>).transpose()?;
        let lessons = self.repository.get_all_lessons();

        let groups = LEVELS
            .iter()
            .filter(|level| filter.map_or(true, |wanted| wanted == **level))
            .map(|level| LevelGroup {
                level: *level,
                lessons: lessons
                    .iter()
                    .filter(|lesson| lesson.level == *level)
                    .map(Lesson::summary)
                    .collect(),
            })
            .filter(|group| !group.lessons.is_empty())
            .collect();

        Ok(groups)
    }

    pub fn get(&self, lesson_id: &str) -> Result<Lesson, LessonServiceError> {
        self.repository
            .find_by_id(lesson_id)
            .ok_or_else(|| LessonServiceError::NotFound(lesson_id.to_string()))
    }

    /// Make `lesson_id` the active lesson and warm its audio. Any previously
    /// active lesson's prefetch is cancelled first.
    pub fn open(&self, lesson_id: &str) -> Result<LessonActivation, LessonServiceError> {
        let lesson = self.get(lesson_id)?;

        if lesson.is_locked {
            return Err(LessonServiceError::Locked(format!(
                "'{}' requires an upgrade",
                lesson.title
            )));
        }

        let texts = lesson.content.prefetch_texts(self.prefetch_limit);
        let mut active = self.active.lock();

        let superseded_lesson_id = active.take().map(|previous| {
            if let Some(handle) = &previous.prefetch {
                self.audio_service.cancel(handle);
            }
            previous.lesson_id
        });

        let prefetch = if texts.is_empty() {
            None
        } else {
            Some(
                self.audio_service
                    .schedule(&texts, PrefetchPriority::Normal),
            )
        };

        tracing::info!(
            lesson_id = %lesson.id,
            content_type = ?lesson.content.content_type(),
            prefetch_count = texts.len(),
            superseded = ?superseded_lesson_id,
            "Lesson opened"
        );

        let activation = LessonActivation {
            lesson_id: lesson.id.clone(),
            prefetch_job_id: prefetch.as_ref().map(PrefetchHandle::id),
            prefetch_count: texts.len(),
            superseded_lesson_id,
        };

        *active = Some(ActiveLesson {
            lesson_id: lesson.id,
            prefetch,
        });

        Ok(activation)
    }

    /// Dismiss the lesson and stop warming it. Returns false when it was not
    /// the active lesson.
    pub fn close(&self, lesson_id: &str) -> Result<bool, LessonServiceError> {
        self.get(lesson_id)?;

        let mut active = self.active.lock();
        match active.as_ref() {
            Some(current) if current.lesson_id == lesson_id => {
                if let Some(handle) = &current.prefetch {
                    self.audio_service.cancel(handle);
                }
                *active = None;
                tracing::info!(lesson_id = %lesson_id, "Lesson closed");
                Ok(true)
            }
            _ => {
                tracing::debug!(lesson_id = %lesson_id, "Close requested for inactive lesson");
                Ok(false)
            }
        }
    }

    pub fn active_lesson_id(&self) -> Option<String> {
        self.active
            .lock()
            .as_ref()
            .map(|active| active.lesson_id.clone())
    }
}
