use axum::{extract::State, Json};
use std::sync::Arc;

use crate::{
    domain::explain::{ExplainRequest, ExplainService, ExplainServiceApi, Explanation},
    error::AppResult,
};

pub struct ExplainController {
    explain_service: Arc<ExplainService>,
}

impl ExplainController {
    pub fn new(explain_service: Arc<ExplainService>) -> Self {
        Self { explain_service }
    }

    /// POST /api/explain - Short explanation of a word or phrase
    pub async fn explain(
        State(controller): State<Arc<ExplainController>>,
        Json(request): Json<ExplainRequest>,
    ) -> AppResult<Json<Explanation>> {
        let explanation = controller.explain_service.explain(&request.text).await?;
        Ok(Json(explanation))
    }
}
