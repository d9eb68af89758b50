pub mod bootstrap;
pub mod reference_images;
pub mod stamps;

pub use bootstrap::{BootstrapRequest, bootstrap_locations};
pub use reference_images::fetch_reference_images;
pub use stamps::{StampOutcome, StampSettings, StampStatus, StampTarget, generate_stamps};
