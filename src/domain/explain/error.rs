use crate::error::AppError;
use crate::infrastructure::repositories::SpeechError;

#[derive(Debug, thiserror::Error)]
pub enum ExplainServiceError {
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("rejected by provider: {0}")]
    Rejected(String),
    #[error("rate limited: {0}")]
    RateLimited(String),
    #[error("dependency error: {0}")]
    Dependency(String),
}

impl From<SpeechError> for ExplainServiceError {
    fn from(err: SpeechError) -> Self {
        match err {
            SpeechError::Transient(msg) => ExplainServiceError::Dependency(msg),
            SpeechError::RateLimited { message, .. } => ExplainServiceError::RateLimited(message),
            SpeechError::Rejected(msg) => ExplainServiceError::Rejected(msg),
        }
    }
}

impl From<ExplainServiceError> for AppError {
    fn from(err: ExplainServiceError) -> Self {
        match err {
            ExplainServiceError::Invalid(msg) => AppError::BadRequest(msg),
            ExplainServiceError::Rejected(msg) => AppError::Unprocessable(msg),
            ExplainServiceError::RateLimited(msg) => AppError::RateLimitExceeded(msg),
            ExplainServiceError::Dependency(msg) => AppError::ExternalService(msg),
        }
    }
}
