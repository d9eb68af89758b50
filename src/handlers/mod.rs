pub mod admin;
pub mod bootstrap;
pub mod health;
pub mod locations;
pub mod reference_images;
pub mod stamps;

use axum::extract::FromRequest;

use crate::error::AppError;

pub use admin::{deactivate_location_page, location_detail_page, location_list_page};
pub use bootstrap::bootstrap_locations;
pub use health::health_check;
pub use locations::{deactivate_location, list_active_locations, set_coordinates, set_geofence_radius};
pub use reference_images::fetch_reference_images;
pub use stamps::generate_stamps;

/// JSON body extractor whose rejections render as `AppError`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

pub async fn not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}
