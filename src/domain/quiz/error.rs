use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum QuizServiceError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<QuizServiceError> for AppError {
    fn from(err: QuizServiceError) -> Self {
        match err {
            QuizServiceError::NotFound(msg) => AppError::NotFound(msg),
            QuizServiceError::Invalid(msg) => AppError::BadRequest(msg),
            QuizServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
