use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use uuid::Uuid;

use super::GraphqlClient;
use super::documents::{
    ACTIVE_LOCATIONS, LOCATION_BY_ID, SET_COORDINATES, SET_GEOFENCE_RADIUS, SET_LOCATION_INACTIVE,
};
use crate::models::{Location, LocationMutationResult};

fn field<T: DeserializeOwned>(mut data: Value, name: &str) -> anyhow::Result<T> {
    let value = data
        .get_mut(name)
        .map(Value::take)
        .ok_or_else(|| anyhow::anyhow!("GraphQL response is missing `{name}`"))?;
    Ok(serde_json::from_value(value)?)
}

/// Active locations ordered by name.
pub async fn active_locations(client: &GraphqlClient) -> anyhow::Result<Vec<Location>> {
    let data = client.query(ACTIVE_LOCATIONS, json!({})).await?;
    field(data, "locations")
}

pub async fn location_by_id(client: &GraphqlClient, id: Uuid) -> anyhow::Result<Option<Location>> {
    let data = client
        .query(LOCATION_BY_ID, json!({ "location": id }))
        .await?;
    field(data, "locations_by_pk")
}

pub async fn set_inactive(client: &GraphqlClient, id: Uuid) -> anyhow::Result<LocationMutationResult> {
    let data = client
        .mutate(SET_LOCATION_INACTIVE, json!({ "location": id }))
        .await?;
    field(data, "update_locations")
}

pub async fn set_geofence_radius(
    client: &GraphqlClient,
    id: Uuid,
    radius: i32,
) -> anyhow::Result<LocationMutationResult> {
    let data = client
        .mutate(SET_GEOFENCE_RADIUS, json!({ "location": id, "radius": radius }))
        .await?;
    field(data, "update_locations")
}

pub async fn set_coordinates(
    client: &GraphqlClient,
    id: Uuid,
    latitude: f64,
    longitude: f64,
) -> anyhow::Result<LocationMutationResult> {
    let data = client
        .mutate(
            SET_COORDINATES,
            json!({ "location": id, "latitude": latitude, "longitude": longitude }),
        )
        .await?;
    field(data, "update_locations")
}
