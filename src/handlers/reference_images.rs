use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use super::AppJson;
use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::pipeline;

#[derive(Debug, Default, Deserialize)]
pub struct FetchReferenceImagesBody {
    #[serde(default)]
    pub locations: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct FetchReferenceImagesResponse {
    pub success: bool,
    pub locations: Vec<String>,
    pub files: Vec<String>,
}

pub async fn fetch_reference_images(
    State(state): State<AppState>,
    AppJson(body): AppJson<FetchReferenceImagesBody>,
) -> AppResult<Json<FetchReferenceImagesResponse>> {
    let locations: Vec<String> = body
        .locations
        .unwrap_or_default()
        .into_iter()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect();
    if locations.is_empty() {
        return Err(AppError::Validation("Missing required fields".into()));
    }

    let files = pipeline::fetch_reference_images(
        state.photos.as_ref(),
        &state.assets,
        state.config.reference_image_limit,
        &locations,
    )
    .await?;

    Ok(Json(FetchReferenceImagesResponse {
        success: true,
        locations,
        files,
    }))
}
