use std::collections::HashMap;
use std::sync::Arc;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::telemetry::metrics::{GRAPHQL_CACHE_HITS, GRAPHQL_REQUESTS};

#[derive(Debug, Clone, Serialize)]
pub struct GraphqlRequest {
    pub query: String,
    pub variables: Value,
}

/// Sends one GraphQL document to the backend and returns its `data` object.
#[async_trait::async_trait]
pub trait GraphqlTransport: Send + Sync {
    async fn execute(&self, req: &GraphqlRequest) -> anyhow::Result<Value>;
}

pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
    admin_secret: String,
}

impl HttpTransport {
    pub fn new(endpoint: &str, admin_secret: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.to_string(),
            admin_secret: admin_secret.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct GraphqlResponse {
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphqlErrorDetail>,
}

#[derive(Deserialize)]
struct GraphqlErrorDetail {
    message: String,
}

#[async_trait::async_trait]
impl GraphqlTransport for HttpTransport {
    async fn execute(&self, req: &GraphqlRequest) -> anyhow::Result<Value> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-hasura-admin-secret",
            HeaderValue::from_str(&self.admin_secret)
                .map_err(|e| anyhow::anyhow!("invalid admin secret header: {e}"))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let response = self
            .client
            .post(&self.endpoint)
            .headers(headers)
            .json(req)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "GraphQL endpoint error ({}): {}",
                status,
                error_body
            ));
        }

        let body: GraphqlResponse = response.json().await?;
        unwrap_response(body)
    }
}

fn unwrap_response(body: GraphqlResponse) -> anyhow::Result<Value> {
    if !body.errors.is_empty() {
        let messages = body
            .errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(anyhow::anyhow!("{messages}"));
    }

    body.data
        .ok_or_else(|| anyhow::anyhow!("GraphQL response contained no data"))
}

/// Cached results plus a counter bumped on every invalidation.
#[derive(Default)]
struct Cache {
    generation: u64,
    entries: HashMap<String, Value>,
}

impl Cache {
    fn invalidate(&mut self) {
        self.generation += 1;
        self.entries.clear();
    }
}

/// GraphQL client with an in-memory result cache.
///
/// Reads are cached by document and variables. Every mutation clears the cache,
/// and a read that was in flight across a mutation is not stored.
pub struct GraphqlClient {
    transport: Arc<dyn GraphqlTransport>,
    cache: RwLock<Cache>,
}

impl GraphqlClient {
    pub fn new(transport: Arc<dyn GraphqlTransport>) -> Self {
        Self {
            transport,
            cache: RwLock::new(Cache::default()),
        }
    }

    #[tracing::instrument(
        name = "graphql query",
        skip(self, document, variables),
        fields(graphql.operation = "query", graphql.cache_hit)
    )]
    pub async fn query(&self, document: &str, variables: Value) -> anyhow::Result<Value> {
        let key = cache_key(document, &variables);

        let generation = {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.entries.get(&key) {
                tracing::Span::current().record("graphql.cache_hit", true);
                GRAPHQL_CACHE_HITS.add(1, &[]);
                return Ok(cached.clone());
            }
            cache.generation
        };
        tracing::Span::current().record("graphql.cache_hit", false);

        let data = self.send(document, variables).await?;

        let mut cache = self.cache.write().await;
        if cache.generation == generation {
            cache.entries.insert(key, data.clone());
        } else {
            tracing::debug!("Cache invalidated during query, result not stored");
        }

        Ok(data)
    }

    #[tracing::instrument(
        name = "graphql mutation",
        skip(self, document, variables),
        fields(graphql.operation = "mutation")
    )]
    pub async fn mutate(&self, document: &str, variables: Value) -> anyhow::Result<Value> {
        let result = self.send(document, variables).await;
        // Invalidate even on failure; the write may have landed.
        self.cache.write().await.invalidate();
        result
    }

    /// Drops every cached result.
    pub async fn reset_cache(&self) {
        self.cache.write().await.invalidate();
    }

    async fn send(&self, document: &str, variables: Value) -> anyhow::Result<Value> {
        let req = GraphqlRequest {
            query: document.to_string(),
            variables,
        };

        let result = self.transport.execute(&req).await;
        let outcome = if result.is_ok() { "ok" } else { "error" };
        GRAPHQL_REQUESTS.add(1, &[opentelemetry::KeyValue::new("outcome", outcome)]);

        if let Err(err) = &result {
            tracing::warn!(error = %err, "GraphQL request failed");
        }
        result
    }
}

fn cache_key(document: &str, variables: &Value) -> String {
    format!("{document}\u{0}{variables}")
}
