use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};

use super::AppJson;
use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::pipeline::{self, BootstrapRequest};

#[derive(Debug, Default, Deserialize)]
pub struct BootstrapBody {
    #[serde(default)]
    pub locations: Option<Vec<String>>,
    #[serde(default)]
    pub state: Option<String>,
}

impl BootstrapBody {
    fn validate(self) -> AppResult<BootstrapRequest> {
        let locations: Vec<String> = self
            .locations
            .unwrap_or_default()
            .into_iter()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect();
        let state = self.state.unwrap_or_default().trim().to_string();

        if locations.is_empty() || state.is_empty() {
            return Err(AppError::Validation("Missing required fields".into()));
        }

        Ok(BootstrapRequest { locations, state })
    }
}

pub async fn bootstrap_locations(
    State(state): State<AppState>,
    AppJson(body): AppJson<BootstrapBody>,
) -> AppResult<Json<Value>> {
    let request = body.validate()?;

    let sql = pipeline::bootstrap_locations(
        &state.llm_client,
        &state.config.sql_model,
        state.config.llm_max_tokens,
        &request,
    )
    .await?;

    Ok(Json(json!({
        "success": true,
        "sql": sql,
    })))
}
