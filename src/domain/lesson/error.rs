use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum LessonServiceError {
    #[error("lesson not found: {0}")]
    NotFound(String),
    #[error("lesson locked: {0}")]
    Locked(String),
    #[error("invalid input: {0}")]
    Invalid(String),
}

impl From<LessonServiceError> for AppError {
    fn from(err: LessonServiceError) -> Self {
        match err {
            LessonServiceError::NotFound(msg) => AppError::NotFound(msg),
            LessonServiceError::Locked(msg) => AppError::PaymentRequired(msg),
            LessonServiceError::Invalid(msg) => AppError::BadRequest(msg),
        }
    }
}
