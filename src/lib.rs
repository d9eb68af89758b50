pub mod assets;
pub mod config;
pub mod error;
pub mod graphql;
pub mod handlers;
pub mod llm;
pub mod models;
pub mod photos;
pub mod pipeline;
pub mod routes;
pub mod telemetry;
pub mod views;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

pub use config::Config;

use assets::AssetStore;
use graphql::GraphqlClient;
use llm::LlmClient;
use photos::PhotoSource;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub graphql: Arc<GraphqlClient>,
    pub llm_client: Arc<LlmClient>,
    pub photos: Arc<dyn PhotoSource>,
    pub assets: AssetStore,
}
