use super::error::QuizServiceError;
use super::{AnswerOutcome, AnswerRequest, Mistake, MistakeRepository};
use crate::domain::lesson::{LessonContent, LessonRepository};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

pub struct QuizService {
    lesson_repo: Arc<dyn LessonRepository>,
    mistake_repo: Arc<dyn MistakeRepository>,
}

impl QuizService {
    pub fn new(
        lesson_repo: Arc<dyn LessonRepository>,
        mistake_repo: Arc<dyn MistakeRepository>,
    ) -> Self {
        Self {
            lesson_repo,
            mistake_repo,
        }
    }
}

#[async_trait]
pub trait QuizServiceApi: Send + Sync {
    /// Grade one answer. A wrong answer is recorded in the mistake notebook.
    async fn answer(
        &self,
        lesson_id: &str,
        request: AnswerRequest,
    ) -> Result<AnswerOutcome, QuizServiceError>;

    async fn list_mistakes(&self) -> Result<Vec<Mistake>, QuizServiceError>;

    async fn clear_mistakes(&self) -> Result<(), QuizServiceError>;
}

#[async_trait]
impl QuizServiceApi for QuizService {
    async fn answer(
        &self,
        lesson_id: &str,
        request: AnswerRequest,
    ) -> Result<AnswerOutcome, QuizServiceError> {
        let lesson = self
            .lesson_repo
            .find_by_id(lesson_id)
            .ok_or_else(|| QuizServiceError::NotFound(format!("Lesson {}", lesson_id)))?;

        let LessonContent::QuizQuestionSet(questions) = lesson.content else {
            return Err(QuizServiceError::Invalid(format!(
                "Lesson {} is not a quiz",
                lesson_id
            )));
        };

        let question = questions
            .into_iter()
            .find(|q| q.id == request.question_id)
            .ok_or_else(|| {
                QuizServiceError::NotFound(format!("Question {}", request.question_id))
            })?;

        let selected = question
            .options
            .get(request.selected_option)
            .cloned()
            .ok_or_else(|| {
                QuizServiceError::Invalid(format!(
                    "Option {} is out of range (question has {})",
                    request.selected_option,
                    question.options.len()
                ))
            })?;

        let correct_answer = question
            .options
            .get(question.correct_answer)
            .cloned()
            .unwrap_or_default();
        let correct = request.selected_option == question.correct_answer;

        let mistake = if correct {
            None
        } else {
            let mistake = Mistake {
                id: Uuid::new_v4(),
                question: question.question.clone(),
                user_answer: selected,
                correct_answer: correct_answer.clone(),
                explanation: question.explanation.clone(),
                timestamp: chrono::Utc::now().timestamp_millis(),
            };
            self.mistake_repo.prepend(mistake.clone()).await?;
            Some(mistake)
        };

        tracing::info!(
            lesson_id = %lesson_id,
            question_id = %question.id,
            correct,
            "Quiz answer graded"
        );

        Ok(AnswerOutcome {
            question_id: question.id,
            correct,
            correct_option: question.correct_answer,
            correct_answer,
            explanation: question.explanation,
            mistake,
        })
    }

    async fn list_mistakes(&self) -> Result<Vec<Mistake>, QuizServiceError> {
        Ok(self.mistake_repo.list().await?)
    }

    async fn clear_mistakes(&self) -> Result<(), QuizServiceError> {
        self.mistake_repo.clear().await?;
        tracing::info!("Mistake notebook cleared");
        Ok(())
    }
}
