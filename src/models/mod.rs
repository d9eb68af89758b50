pub mod location;

pub use location::{
    Location, LocationMutationResult, StampRef, hero_image_filename, location_slug,
    reference_image_filename, stamp_filename,
};
