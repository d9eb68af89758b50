pub const ACTIVE_LOCATIONS: &str = r#"
query GetAllActiveLocations {
  locations(where: {is_active: {_eq: true}}, order_by: {name: asc}) {
    id
    name
    hero_image
    city
    state
    stamp {
      stamp_image
    }
  }
}
"#;

pub const LOCATION_BY_ID: &str = r#"
query GetLocationById($location: uuid!) {
  locations_by_pk(id: $location) {
    id
    name
    description
    hero_image
    latitude
    longitude
    address
    city
    state
    zipcode
    geofence_radius
    difficulty_level
    estimated_time
    is_active
    is_featured
    is_trending
    created_at
    last_updated_at
    stamp {
      stamp_image
    }
  }
}
"#;

pub const SET_LOCATION_INACTIVE: &str = r#"
mutation SetLocationToInactive($location: uuid!) {
  update_locations(where: {id: {_eq: $location}}, _set: {is_active: false}) {
    affected_rows
    returning {
      id
      name
      is_active
    }
  }
}
"#;

pub const SET_GEOFENCE_RADIUS: &str = r#"
mutation SetLocationGeofenceRadius($location: uuid!, $radius: Int!) {
  update_locations(where: {id: {_eq: $location}}, _set: {geofence_radius: $radius}) {
    affected_rows
    returning {
      id
      name
      geofence_radius
    }
  }
}
"#;

pub const SET_COORDINATES: &str = r#"
mutation SetLocationCoordinates($location: uuid!, $latitude: float8!, $longitude: float8!) {
  update_locations(
    where: {id: {_eq: $location}}
    _set: {latitude: $latitude, longitude: $longitude}
  ) {
    affected_rows
    returning {
      id
      name
      latitude
      longitude
    }
  }
}
"#;
