use axum::{
    Router,
    routing::{get, post},
};

use crate::{AppState, handlers};

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/health",
            get(handlers::health_check).fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/bootstrap-locations",
            post(handlers::bootstrap_locations).fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/generate-stamps",
            post(handlers::generate_stamps).fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/fetch-reference-images",
            post(handlers::fetch_reference_images).fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/locations",
            get(handlers::list_active_locations).fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/locations/{id}/deactivate",
            post(handlers::deactivate_location).fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/locations/{id}/geofence",
            post(handlers::set_geofence_radius).fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/locations/{id}/coordinates",
            post(handlers::set_coordinates).fallback(handlers::method_not_allowed),
        )
        .route("/admin/locations", get(handlers::location_list_page))
        .route("/admin/locations/{id}", get(handlers::location_detail_page))
        .route(
            "/admin/locations/{id}/deactivate",
            post(handlers::deactivate_location_page),
        )
        .fallback(handlers::not_found)
        .with_state(state)
}
