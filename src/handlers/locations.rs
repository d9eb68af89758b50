use axum::{
    Json,
    extract::{Path, State},
};
use opentelemetry::KeyValue;
use serde::Deserialize;
use uuid::Uuid;

use super::AppJson;
use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::graphql::locations;
use crate::models::{Location, LocationMutationResult};
use crate::telemetry::metrics::LOCATIONS_UPDATED;

#[derive(Debug, Deserialize)]
pub struct GeofenceBody {
    pub radius: i32,
}

#[derive(Debug, Deserialize)]
pub struct CoordinatesBody {
    pub latitude: f64,
    pub longitude: f64,
}

pub(crate) fn parse_location_id(raw: &str) -> AppResult<Uuid> {
    raw.parse()
        .map_err(|_| AppError::NotFound(format!("Location {raw}")))
}

fn graphql_error(err: anyhow::Error) -> AppError {
    AppError::Graphql(err.to_string())
}

fn ensure_updated(id: Uuid, result: LocationMutationResult, kind: &'static str) -> AppResult<LocationMutationResult> {
    if result.returning.is_empty() {
        return Err(AppError::NotFound(format!("Location {id}")));
    }
    LOCATIONS_UPDATED.add(1, &[KeyValue::new("kind", kind)]);
    tracing::info!(location.id = %id, kind, "Location updated");
    Ok(result)
}

pub async fn list_active_locations(State(state): State<AppState>) -> AppResult<Json<Vec<Location>>> {
    let locations = locations::active_locations(&state.graphql)
        .await
        .map_err(graphql_error)?;

    Ok(Json(locations))
}

pub async fn deactivate_location(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<LocationMutationResult>> {
    let id = parse_location_id(&id)?;
    let result = locations::set_inactive(&state.graphql, id)
        .await
        .map_err(graphql_error)?;

    Ok(Json(ensure_updated(id, result, "deactivate")?))
}

pub async fn set_geofence_radius(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(body): AppJson<GeofenceBody>,
) -> AppResult<Json<LocationMutationResult>> {
    let id = parse_location_id(&id)?;
    if !(1..=10_000).contains(&body.radius) {
        return Err(AppError::Validation(
            "radius must be between 1 and 10000 meters".into(),
        ));
    }

    let result = locations::set_geofence_radius(&state.graphql, id, body.radius)
        .await
        .map_err(graphql_error)?;

    Ok(Json(ensure_updated(id, result, "geofence_radius")?))
}

pub async fn set_coordinates(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(body): AppJson<CoordinatesBody>,
) -> AppResult<Json<LocationMutationResult>> {
    let id = parse_location_id(&id)?;
    if !(-90.0..=90.0).contains(&body.latitude) || !(-180.0..=180.0).contains(&body.longitude) {
        return Err(AppError::Validation(
            "latitude must be within [-90, 90] and longitude within [-180, 180]".into(),
        ));
    }

    let result = locations::set_coordinates(&state.graphql, id, body.latitude, body.longitude)
        .await
        .map_err(graphql_error)?;

    Ok(Json(ensure_updated(id, result, "coordinates")?))
}
