pub mod error;
pub mod service;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use error::QuizServiceError;
pub use service::{QuizService, QuizServiceApi};

/// A wrong quiz answer kept for later review
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Mistake {
    pub id: Uuid,
    pub question: String,
    pub user_answer: String,
    pub correct_answer: String,
    pub explanation: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

/// Request for POST /api/lessons/:lessonId/answers
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRequest {
    pub question_id: String,
    pub selected_option: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOutcome {
    pub question_id: String,
    pub correct: bool,
    pub correct_option: usize,
    pub correct_answer: String,
    pub explanation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mistake: Option<Mistake>,
}

/// Storage for the mistake notebook, newest first
#[async_trait]
pub trait MistakeRepository: Send + Sync {
    async fn list(&self) -> anyhow::Result<Vec<Mistake>>;
    async fn prepend(&self, mistake: Mistake) -> anyhow::Result<()>;
    async fn clear(&self) -> anyhow::Result<()>;
}
