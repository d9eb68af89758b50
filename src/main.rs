use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use journeys_admin::assets::AssetStore;
use journeys_admin::graphql::{GraphqlClient, HttpTransport};
use journeys_admin::llm::{self, LlmClient};
use journeys_admin::photos::{PhotoSource, PixabayClient};
use journeys_admin::telemetry::{HttpMakeSpan, HttpOnResponse, init_telemetry};
use journeys_admin::{AppState, Config, routes};

/// Upper bound for one request; a stamp batch makes two model calls per location.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(600);

fn text_provider(config: &Config) -> Arc<dyn llm::Provider> {
    match config.llm_provider.as_str() {
        "openai" => Arc::new(llm::openai::OpenAIProvider::new(
            config.openai_api_key.as_deref().unwrap_or(""),
        )),
        other => {
            if other != "anthropic" {
                tracing::warn!(provider = %other, "Unknown LLM_PROVIDER, using anthropic");
            }
            Arc::new(llm::anthropic::AnthropicProvider::new(
                config.anthropic_api_key.as_deref().unwrap_or(""),
            ))
        }
    }
}

fn build_state(config: &Config) -> AppState {
    for (name, value) in [
        ("OPENAI_API_KEY", &config.openai_api_key),
        ("PIXABAY_API_KEY", &config.pixabay_api_key),
    ] {
        if value.is_none() {
            tracing::warn!(variable = name, "API key not set; calls that need it will fail");
        }
    }

    let llm_client = LlmClient::new(
        text_provider(config),
        Arc::new(llm::images::OpenAIImageProvider::new(
            config.openai_api_key.as_deref().unwrap_or(""),
        )),
    );

    let transport = HttpTransport::new(&config.graphql_endpoint, &config.graphql_admin_secret);
    let photos: Arc<dyn PhotoSource> = Arc::new(PixabayClient::new(
        config.pixabay_api_key.as_deref().unwrap_or(""),
    ));
    let assets = AssetStore::new(config.stamps_dir.clone(), config.images_dir.clone());

    tracing::info!(
        text_provider = %config.llm_provider,
        sql_model = %config.sql_model,
        prompt_model = %config.prompt_model,
        image_model = %config.image_model,
        graphql_endpoint = %config.graphql_endpoint,
        stamps_dir = %assets.stamps_dir().display(),
        images_dir = %assets.images_dir().display(),
        "Services configured"
    );

    AppState {
        config: config.clone(),
        graphql: Arc::new(GraphqlClient::new(Arc::new(transport))),
        llm_client: Arc::new(llm_client),
        photos,
        assets,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    let telemetry_guard = init_telemetry(&config)?;

    tracing::info!(
        port = config.port,
        environment = %config.environment,
        "Starting journeys-admin"
    );

    let app = routes::create_router(build_state(&config))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(HttpMakeSpan)
                .on_response(HttpOnResponse),
        )
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            REQUEST_TIMEOUT,
        ))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped, flushing telemetry");
    telemetry_guard.shutdown();

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
