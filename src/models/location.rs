use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A location record as stored by the GraphQL backend.
///
/// Queries select different subsets of columns, so everything except the id and
/// name is optional on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zipcode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geofence_radius: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty_level: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_time_to_visit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_fee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessibility_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_featured: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_trending: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stamp: Option<StampRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StampRef {
    pub stamp_image: String,
}

/// Rows touched by an `update_locations` mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationMutationResult {
    #[serde(default)]
    pub affected_rows: i64,
    pub returning: Vec<Location>,
}

impl Location {
    pub fn new(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            hero_image: None,
            latitude: None,
            longitude: None,
            address: None,
            city: None,
            state: None,
            zipcode: None,
            geofence_radius: None,
            difficulty_level: None,
            estimated_time: None,
            best_time_to_visit: None,
            entry_fee: None,
            accessibility_info: None,
            is_active: None,
            is_featured: None,
            is_trending: None,
            admin_notes: None,
            created_at: None,
            last_updated_at: None,
            created_by: None,
            website: None,
            phone: None,
            stamp: None,
        }
    }

    /// Hero image file name, falling back to the one derived from the name.
    pub fn hero_image_or_derived(&self) -> String {
        match self.hero_image.as_deref() {
            Some(image) if !image.is_empty() => image.to_string(),
            _ => hero_image_filename(&self.name),
        }
    }

    pub fn stamp_image(&self) -> Option<&str> {
        self.stamp
            .as_ref()
            .map(|s| s.stamp_image.as_str())
            .filter(|s| !s.is_empty())
    }

    /// "City, State" with whichever parts are present.
    pub fn place_label(&self) -> String {
        [self.city.as_deref(), self.state.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Normalizes a location name into the stem shared by all of its files.
///
/// Lowercases, drops `&` and any other punctuation, and joins words with a single
/// `_`. Applying it to its own output is a no-op.
pub fn location_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_separator = false;

    for c in name.chars() {
        if c.is_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('_');
            }
            pending_separator = false;
            slug.extend(c.to_lowercase());
        } else if c.is_whitespace() || c == '_' || c == '-' {
            pending_separator = true;
        }
    }

    slug
}

pub fn hero_image_filename(name: &str) -> String {
    format!("{}.jpg", location_slug(name))
}

pub fn stamp_filename(name: &str) -> String {
    format!("{}.png", location_slug(name))
}

pub fn reference_image_filename(name: &str, index: usize) -> String {
    format!("{}_{}.jpg", location_slug(name), index)
}
