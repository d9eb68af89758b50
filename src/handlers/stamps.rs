use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use super::AppJson;
use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::pipeline::{self, StampOutcome, StampSettings, StampStatus, StampTarget};

#[derive(Debug, Default, Deserialize)]
pub struct GenerateStampsBody {
    #[serde(default)]
    pub locations: Option<Vec<StampTarget>>,
}

#[derive(Debug, Serialize)]
pub struct GenerateStampsResponse {
    pub success: bool,
    pub results: Vec<StampOutcome>,
}

pub async fn generate_stamps(
    State(state): State<AppState>,
    AppJson(body): AppJson<GenerateStampsBody>,
) -> AppResult<Json<GenerateStampsResponse>> {
    let targets = body.locations.unwrap_or_default();
    if targets.is_empty() {
        return Err(AppError::Validation("Missing required fields".into()));
    }

    let settings = StampSettings {
        prompt_model: state.config.prompt_model.clone(),
        image_model: state.config.image_model.clone(),
        image_quality: state.config.image_quality.clone(),
        max_tokens: state.config.llm_max_tokens,
    };

    let results =
        pipeline::generate_stamps(&state.llm_client, &state.assets, &settings, &targets).await;
    let success = results.iter().all(|r| r.status == StampStatus::Generated);

    Ok(Json(GenerateStampsResponse { success, results }))
}
