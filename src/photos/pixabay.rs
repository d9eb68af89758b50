use serde::Deserialize;

use super::{PhotoHit, PhotoSource};

const API_URL: &str = "https://pixabay.com/api/";

pub struct PixabayClient {
    client: reqwest::Client,
    api_key: String,
}

impl PixabayClient {
    pub fn new(api_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
        }
    }

    /// `query` is `+`-joined; the form encoder writes spaces back as `+` and
    /// percent-encodes everything else that is reserved.
    fn search_request(&self, query: &str) -> reqwest::Result<reqwest::Request> {
        let terms = query.replace('+', " ");
        self.client
            .get(API_URL)
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", terms.as_str()),
                ("image_type", "photo"),
                ("orientation", "horizontal"),
            ])
            .build()
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: Vec<PhotoHit>,
}

#[async_trait::async_trait]
impl PhotoSource for PixabayClient {
    async fn search(&self, query: &str) -> anyhow::Result<Vec<PhotoHit>> {
        let response = self.client.execute(self.search_request(query)?).await?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "Pixabay API error ({}): {}",
                status,
                error_body
            ));
        }

        let body: SearchResponse = response.json().await?;
        Ok(body.hits)
    }

    async fn download(&self, url: &str) -> anyhow::Result<Vec<u8>> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_request_keeps_plus_separators() {
        let client = PixabayClient::new("test-key");
        let request = client.search_request("Griffith+Observatory").unwrap();
        let query = request.url().query().unwrap();
        assert!(query.contains("key=test-key"));
        assert!(query.contains("q=Griffith+Observatory"));
        assert!(query.contains("image_type=photo"));
        assert!(query.contains("orientation=horizontal"));
    }

    #[test]
    fn test_search_request_encodes_reserved_characters() {
        let client = PixabayClient::new("test-key");
        let request = client.search_request("Pier+#39").unwrap();
        let url = request.url();
        assert!(url.fragment().is_none());
        let query = url.query().unwrap();
        assert!(query.contains("q=Pier+%2339"), "{query}");
        assert!(query.contains("orientation=horizontal"));

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("q".to_string(), "Pier #39".to_string())));
        assert_eq!(pairs.len(), 4);
    }

    #[test]
    fn test_search_response_without_hits() {
        let body: SearchResponse = serde_json::from_str(r#"{"total": 0}"#).unwrap();
        assert!(body.hits.is_empty());
    }
}
