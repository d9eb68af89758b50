use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub environment: String,
    pub graphql_endpoint: String,
    pub graphql_admin_secret: String,
    pub llm_provider: String,
    pub anthropic_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub pixabay_api_key: Option<String>,
    pub sql_model: String,
    pub prompt_model: String,
    pub image_model: String,
    pub image_quality: String,
    pub llm_max_tokens: u32,
    pub stamps_dir: PathBuf,
    pub images_dir: PathBuf,
    pub asset_base_url: String,
    pub reference_image_limit: usize,
    pub otel_service_name: String,
    pub otel_exporter_endpoint: String,
}

/// Default `(sql_model, prompt_model)` for a text provider.
pub fn default_text_models(provider: &str) -> (&'static str, &'static str) {
    match provider {
        "openai" => ("gpt-4.1", "gpt-4.1"),
        _ => ("claude-sonnet-4-20250514", "claude-sonnet-4-5-20250929"),
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let llm_provider = env::var("LLM_PROVIDER").unwrap_or_else(|_| "anthropic".to_string());
        let (default_sql_model, default_prompt_model) = default_text_models(&llm_provider);

        Self {
            port: env::var("APP_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("APP_PORT must be a number"),
            environment: env::var("APP_ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
            graphql_endpoint: env::var("GRAPHQL_ENDPOINT").expect("GRAPHQL_ENDPOINT must be set"),
            graphql_admin_secret: env::var("GRAPHQL_ADMIN_SECRET")
                .expect("GRAPHQL_ADMIN_SECRET must be set"),
            anthropic_api_key: env::var("ANTHROPIC_API_KEY").ok(),
            openai_api_key: env::var("OPENAI_API_KEY").ok(),
            pixabay_api_key: env::var("PIXABAY_API_KEY").ok(),
            sql_model: env::var("SQL_MODEL").unwrap_or_else(|_| default_sql_model.to_string()),
            prompt_model: env::var("PROMPT_MODEL")
                .unwrap_or_else(|_| default_prompt_model.to_string()),
            llm_provider,
            image_model: env::var("IMAGE_MODEL").unwrap_or_else(|_| "gpt-image-1".to_string()),
            image_quality: env::var("IMAGE_QUALITY").unwrap_or_else(|_| "high".to_string()),
            llm_max_tokens: env::var("LLM_MAX_TOKENS")
                .unwrap_or_else(|_| "2048".to_string())
                .parse()
                .expect("LLM_MAX_TOKENS must be a number"),
            stamps_dir: env::var("STAMPS_DIR")
                .unwrap_or_else(|_| "generated_stamps".to_string())
                .into(),
            images_dir: env::var("IMAGES_DIR")
                .unwrap_or_else(|_| "location_images".to_string())
                .into(),
            asset_base_url: env::var("ASSET_BASE_URL")
                .unwrap_or_else(|_| "https://questica.s3.us-east-1.amazonaws.com".to_string()),
            reference_image_limit: env::var("REFERENCE_IMAGE_LIMIT")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .expect("REFERENCE_IMAGE_LIMIT must be a number"),
            otel_service_name: env::var("OTEL_SERVICE_NAME")
                .unwrap_or_else(|_| "journeys-admin".to_string()),
            otel_exporter_endpoint: env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
                .unwrap_or_else(|_| "http://localhost:4317".to_string()),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Public URL of a hero image stored in the asset bucket.
    pub fn hero_image_url(&self, file_name: &str) -> String {
        format!(
            "{}/location_images/{}",
            self.asset_base_url.trim_end_matches('/'),
            file_name
        )
    }

    pub fn stamp_image_url(&self, file_name: &str) -> String {
        format!(
            "{}/stamps/{}",
            self.asset_base_url.trim_end_matches('/'),
            file_name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::default_text_models;
    use crate::testing::test_config;

    #[test]
    fn test_default_models_follow_provider() {
        let (sql, prompt) = default_text_models("openai");
        assert!(sql.starts_with("gpt-"));
        assert!(prompt.starts_with("gpt-"));

        let (sql, prompt) = default_text_models("anthropic");
        assert_eq!(sql, "claude-sonnet-4-20250514");
        assert_eq!(prompt, "claude-sonnet-4-5-20250929");
    }

    #[test]
    fn test_unknown_provider_gets_anthropic_models() {
        assert_eq!(default_text_models("ollama"), default_text_models("anthropic"));
    }

    #[test]
    fn test_asset_urls() {
        let mut config = test_config(std::path::Path::new("/tmp"));
        config.asset_base_url = "https://assets.example.com/".to_string();
        assert_eq!(
            config.hero_image_url("griffith_park.jpg"),
            "https://assets.example.com/location_images/griffith_park.jpg"
        );
        assert_eq!(
            config.stamp_image_url("griffith_park.png"),
            "https://assets.example.com/stamps/griffith_park.png"
        );
    }

    #[test]
    fn test_is_production() {
        let mut config = test_config(std::path::Path::new("/tmp"));
        assert!(!config.is_production());
        config.environment = "production".to_string();
        assert!(config.is_production());
    }
}
