use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use super::locations::parse_location_id;
use crate::AppState;
use crate::graphql::locations;
use crate::telemetry::metrics::LOCATIONS_UPDATED;
use crate::views;

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub refresh: bool,
}

pub async fn location_list_page(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Response {
    if params.refresh {
        state.graphql.reset_cache().await;
    }

    match locations::active_locations(&state.graphql).await {
        Ok(list) => Html(views::location_list(&state.config, &list)).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "Failed to load active locations");
            (StatusCode::BAD_GATEWAY, Html(views::error_page(&err.to_string()))).into_response()
        }
    }
}

pub async fn location_detail_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let Ok(id) = parse_location_id(&id) else {
        return (StatusCode::NOT_FOUND, Html(views::not_found_page("Location"))).into_response();
    };

    match locations::location_by_id(&state.graphql, id).await {
        Ok(Some(location)) => Html(views::location_detail(&state.config, &location)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, Html(views::not_found_page("Location"))).into_response(),
        Err(err) => {
            tracing::error!(error = %err, location.id = %id, "Failed to load location");
            (StatusCode::BAD_GATEWAY, Html(views::error_page(&err.to_string()))).into_response()
        }
    }
}

/// Deactivates then returns to the list, which is fetched again.
pub async fn deactivate_location_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let Ok(id) = parse_location_id(&id) else {
        return (StatusCode::NOT_FOUND, Html(views::not_found_page("Location"))).into_response();
    };

    match locations::set_inactive(&state.graphql, id).await {
        Ok(result) => {
            if !result.returning.is_empty() {
                LOCATIONS_UPDATED.add(1, &[opentelemetry::KeyValue::new("kind", "deactivate")]);
            }
            tracing::info!(location.id = %id, affected = result.affected_rows, "Location set to inactive");
            Redirect::to("/admin/locations").into_response()
        }
        Err(err) => {
            tracing::error!(error = %err, location.id = %id, "Failed to deactivate location");
            (StatusCode::BAD_GATEWAY, Html(views::error_page(&err.to_string()))).into_response()
        }
    }
}
