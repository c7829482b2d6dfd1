pub mod error;
pub mod service;

use serde::{Deserialize, Serialize};

pub use error::ExplainServiceError;
pub use service::{ExplainService, ExplainServiceApi};

/// Request for POST /api/explain
#[derive(Debug, Serialize, Deserialize)]
pub struct ExplainRequest {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Explanation {
    pub text: String,
    pub explanation: String,
    pub cached: bool,
}
