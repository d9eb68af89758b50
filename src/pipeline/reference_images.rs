use crate::assets::AssetStore;
use crate::error::AppError;
use crate::models::reference_image_filename;
use crate::photos::{PhotoSource, rank_hits, search_query};
use crate::telemetry::metrics::REFERENCE_IMAGES_DOWNLOADED;

const FAILURE_CONTEXT: &str = "Failed to fetch reference images";

/// Downloads the top stock photos for each location name, in order.
///
/// The first search, download or write failure ends the batch.
#[tracing::instrument(
    name = "pipeline fetch_reference_images",
    skip_all,
    fields(
        pipeline.stage = "reference_images",
        locations.count = locations.len(),
        images.downloaded,
    )
)]
pub async fn fetch_reference_images(
    photos: &dyn PhotoSource,
    assets: &AssetStore,
    limit: usize,
    locations: &[String],
) -> Result<Vec<String>, AppError> {
    let mut files = Vec::new();

    for location_name in locations {
        let query = search_query(location_name);
        let hits = photos
            .search(&query)
            .await
            .map_err(|e| AppError::upstream(FAILURE_CONTEXT, e))?;

        let total = hits.len();
        let top = rank_hits(hits, limit);
        tracing::info!(
            location = %location_name,
            query = %query,
            hits = total,
            selected = top.len(),
            "Reference photo search complete"
        );

        for (index, hit) in top.iter().enumerate() {
            let bytes = photos
                .download(&hit.large_image_url)
                .await
                .map_err(|e| AppError::upstream(FAILURE_CONTEXT, e))?;

            let file_name = reference_image_filename(location_name, index);
            assets
                .write_reference_image(&file_name, &bytes)
                .await
                .map_err(|e| AppError::upstream(FAILURE_CONTEXT, e))?;

            REFERENCE_IMAGES_DOWNLOADED.add(1, &[]);
            files.push(file_name);
        }
    }

    tracing::Span::current().record("images.downloaded", files.len());

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::photos::PhotoHit;
    use crate::testing::FakePhotoSource;

    fn hit(url: &str, downloads: u64, ai: bool) -> PhotoHit {
        PhotoHit {
            large_image_url: url.to_string(),
            downloads,
            is_ai_generated: ai,
        }
    }

    #[tokio::test]
    async fn test_downloads_ranked_hits_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let assets = AssetStore::new(dir.path().join("stamps"), dir.path().join("images"));
        let photos = FakePhotoSource::new(vec![
            hit("https://img/50", 50, false),
            hit("https://img/200", 200, false),
            hit("https://img/10", 10, false),
            hit("https://img/500", 500, true),
            hit("https://img/75", 75, false),
        ]);

        let files = fetch_reference_images(&photos, &assets, 5, &["Park & Gym".to_string()])
            .await
            .unwrap();

        assert_eq!(
            files,
            vec!["park_gym_0.jpg", "park_gym_1.jpg", "park_gym_2.jpg", "park_gym_3.jpg"]
        );
        assert_eq!(
            photos.downloaded(),
            vec!["https://img/200", "https://img/75", "https://img/50", "https://img/10"]
        );
        assert_eq!(photos.queries(), vec!["Park++Gym"]);

        let first = std::fs::read(dir.path().join("images").join("park_gym_0.jpg")).unwrap();
        assert_eq!(first, b"https://img/200");
    }

    #[tokio::test]
    async fn test_processes_each_location_sequentially() {
        let dir = tempfile::tempdir().unwrap();
        let assets = AssetStore::new(dir.path().join("stamps"), dir.path().join("images"));
        let photos = FakePhotoSource::new(vec![hit("https://img/1", 1, false)]);

        let files = fetch_reference_images(
            &photos,
            &assets,
            5,
            &["Coit Tower".to_string(), "Muir_Woods".to_string()],
        )
        .await
        .unwrap();

        assert_eq!(files, vec!["coit_tower_0.jpg", "muir_woods_0.jpg"]);
        assert_eq!(photos.queries(), vec!["Coit+Tower", "Muir+Woods"]);
    }

    #[tokio::test]
    async fn test_search_failure_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let assets = AssetStore::new(dir.path().join("stamps"), dir.path().join("images"));
        let photos = FakePhotoSource::failing("Pixabay API error (400): [ERROR 400] Invalid API key");

        let err = fetch_reference_images(&photos, &assets, 5, &["Coit Tower".to_string()])
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Upstream { .. }));
    }
}
