//! In-memory stand-ins for the external services, shared by unit tests.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::{Value, json};
use uuid::Uuid;

use crate::AppState;
use crate::assets::AssetStore;
use crate::config::Config;
use crate::graphql::{GraphqlClient, GraphqlRequest, GraphqlTransport};
use crate::llm::{
    GenerateRequest, GenerateResponse, ImageProvider, ImageRequest, ImageResponse, LlmClient,
    Provider,
};
use crate::models::{Location, StampRef, stamp_filename};
use crate::photos::{PhotoHit, PhotoSource};

pub fn test_config(dir: &Path) -> Config {
    Config {
        port: 0,
        environment: "test".to_string(),
        graphql_endpoint: "http://graphql.test/v1/graphql".to_string(),
        graphql_admin_secret: "secret".to_string(),
        llm_provider: "anthropic".to_string(),
        anthropic_api_key: None,
        openai_api_key: None,
        pixabay_api_key: None,
        sql_model: "sql-model".to_string(),
        prompt_model: "prompt-model".to_string(),
        image_model: "gpt-image-1".to_string(),
        image_quality: "high".to_string(),
        llm_max_tokens: 2048,
        stamps_dir: dir.join("stamps"),
        images_dir: dir.join("images"),
        asset_base_url: "https://assets.test".to_string(),
        reference_image_limit: 5,
        otel_service_name: "journeys-admin-test".to_string(),
        otel_exporter_endpoint: "http://localhost:4317".to_string(),
    }
}

pub struct TestServices {
    pub text: Arc<FakeTextProvider>,
    pub images: Arc<FakeImageProvider>,
    pub photos: Arc<FakePhotoSource>,
    pub backend: Arc<FakeBackend>,
}

impl TestServices {
    pub fn new() -> Self {
        Self {
            text: Arc::new(FakeTextProvider::replying("generated text")),
            images: Arc::new(FakeImageProvider::returning(Some("UE5HREFUQQ==".to_string()))),
            photos: Arc::new(FakePhotoSource::new(Vec::new())),
            backend: Arc::new(FakeBackend::seeded(&[])),
        }
    }

    pub fn state(&self, dir: &Path) -> AppState {
        let config = test_config(dir);
        AppState {
            assets: AssetStore::new(config.stamps_dir.clone(), config.images_dir.clone()),
            graphql: Arc::new(GraphqlClient::new(self.backend.clone())),
            llm_client: Arc::new(LlmClient::new(self.text.clone(), self.images.clone())),
            photos: self.photos.clone(),
            config,
        }
    }
}

/// Returns the same `data` for every request and counts round trips.
pub struct FakeTransport {
    response: Result<Value, String>,
    calls: AtomicUsize,
}

impl FakeTransport {
    pub fn with_data(data: Value) -> Self {
        Self {
            response: Ok(data),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl GraphqlTransport for FakeTransport {
    async fn execute(&self, _req: &GraphqlRequest) -> anyhow::Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response.clone().map_err(|m| anyhow::anyhow!(m))
    }
}

/// A tiny location table that answers the documents in `graphql::documents`.
pub struct FakeBackend {
    rows: Mutex<Vec<Location>>,
    calls: AtomicUsize,
}

impl FakeBackend {
    pub fn seeded(names: &[&str]) -> Self {
        let rows = names
            .iter()
            .map(|name| {
                let mut location = Location::new(Uuid::new_v4(), *name);
                location.city = Some("San Francisco".to_string());
                location.state = Some("California".to_string());
                location.is_active = Some(true);
                location.stamp = Some(StampRef {
                    stamp_image: stamp_filename(name),
                });
                location
            })
            .collect();

        Self {
            rows: Mutex::new(rows),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn update(&self, id: Uuid, apply: impl Fn(&mut Location)) -> Value {
        let mut rows = self.rows.lock().unwrap();
        let returning: Vec<Location> = rows
            .iter_mut()
            .filter(|l| l.id == id)
            .map(|l| {
                apply(l);
                l.clone()
            })
            .collect();
        json!({
            "update_locations": {
                "affected_rows": returning.len(),
                "returning": returning,
            }
        })
    }
}

fn uuid_var(vars: &Value, name: &str) -> anyhow::Result<Uuid> {
    let raw = vars
        .get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow::anyhow!("missing variable {name}"))?;
    Ok(raw.parse()?)
}

#[async_trait::async_trait]
impl GraphqlTransport for FakeBackend {
    async fn execute(&self, req: &GraphqlRequest) -> anyhow::Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let vars = &req.variables;

        if req.query.contains("update_locations") {
            let id = uuid_var(vars, "location")?;
            if let Some(radius) = vars.get("radius").and_then(Value::as_i64) {
                return Ok(self.update(id, |l| l.geofence_radius = Some(radius as i32)));
            }
            if let (Some(lat), Some(lng)) = (
                vars.get("latitude").and_then(Value::as_f64),
                vars.get("longitude").and_then(Value::as_f64),
            ) {
                return Ok(self.update(id, |l| {
                    l.latitude = Some(lat);
                    l.longitude = Some(lng);
                }));
            }
            return Ok(self.update(id, |l| l.is_active = Some(false)));
        }

        if req.query.contains("locations_by_pk") {
            let id = uuid_var(vars, "location")?;
            let rows = self.rows.lock().unwrap();
            let found = rows.iter().find(|l| l.id == id).cloned();
            return Ok(json!({ "locations_by_pk": found }));
        }

        let mut active: Vec<Location> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.is_active == Some(true))
            .cloned()
            .collect();
        active.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(json!({ "locations": active }))
    }
}

pub struct FakeTextProvider {
    reply: Result<String, String>,
    requests: Mutex<Vec<GenerateRequest>>,
}

impl FakeTextProvider {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Provider for FakeTextProvider {
    async fn generate(&self, req: &GenerateRequest) -> anyhow::Result<GenerateResponse> {
        self.requests.lock().unwrap().push(req.clone());
        let content = self.reply.clone().map_err(|m| anyhow::anyhow!(m))?;
        Ok(GenerateResponse {
            content,
            model: req.model.clone(),
            input_tokens: 10,
            output_tokens: 20,
            finish_reason: "end_turn".to_string(),
            provider: String::new(),
        })
    }

    fn name(&self) -> &str {
        "fake"
    }
}

pub struct FakeImageProvider {
    payload: Option<String>,
    requests: Mutex<Vec<ImageRequest>>,
}

impl FakeImageProvider {
    pub fn returning(payload: Option<String>) -> Self {
        Self {
            payload,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<ImageRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ImageProvider for FakeImageProvider {
    async fn generate_image(&self, req: &ImageRequest) -> anyhow::Result<ImageResponse> {
        self.requests.lock().unwrap().push(req.clone());
        Ok(ImageResponse {
            b64_json: self.payload.clone(),
        })
    }

    fn name(&self) -> &str {
        "fake"
    }
}

/// Serves the same hits for every search; a download returns the URL as bytes.
pub struct FakePhotoSource {
    hits: Result<Vec<PhotoHit>, String>,
    queries: Mutex<Vec<String>>,
    downloaded: Mutex<Vec<String>>,
}

impl FakePhotoSource {
    pub fn new(hits: Vec<PhotoHit>) -> Self {
        Self {
            hits: Ok(hits),
            queries: Mutex::new(Vec::new()),
            downloaded: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            hits: Err(message.to_string()),
            queries: Mutex::new(Vec::new()),
            downloaded: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    pub fn downloaded(&self) -> Vec<String> {
        self.downloaded.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl PhotoSource for FakePhotoSource {
    async fn search(&self, query: &str) -> anyhow::Result<Vec<PhotoHit>> {
        self.queries.lock().unwrap().push(query.to_string());
        self.hits.clone().map_err(|m| anyhow::anyhow!(m))
    }

    async fn download(&self, url: &str) -> anyhow::Result<Vec<u8>> {
        self.downloaded.lock().unwrap().push(url.to_string());
        Ok(url.as_bytes().to_vec())
    }
}
