pub mod pixabay;

use serde::Deserialize;

pub use pixabay::PixabayClient;

/// One stock-photo search result.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoHit {
    #[serde(rename = "largeImageURL")]
    pub large_image_url: String,
    #[serde(default)]
    pub downloads: u64,
    #[serde(default)]
    pub is_ai_generated: bool,
}

#[async_trait::async_trait]
pub trait PhotoSource: Send + Sync {
    /// Searches horizontal photographs for an already-normalized query.
    async fn search(&self, query: &str) -> anyhow::Result<Vec<PhotoHit>>;

    async fn download(&self, url: &str) -> anyhow::Result<Vec<u8>>;
}

/// Turns a location name into a search term: `&` removed, spaces and `_` as `+`.
pub fn search_query(location_name: &str) -> String {
    location_name
        .replace('&', "")
        .replace([' ', '_'], "+")
}

/// Drops AI-generated hits and keeps the `limit` most downloaded, most first.
pub fn rank_hits(hits: Vec<PhotoHit>, limit: usize) -> Vec<PhotoHit> {
    let mut hits: Vec<PhotoHit> = hits.into_iter().filter(|h| !h.is_ai_generated).collect();
    hits.sort_by(|a, b| b.downloads.cmp(&a.downloads));
    hits.truncate(limit);
    hits
}
