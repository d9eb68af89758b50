pub mod anthropic;
pub mod client;
pub mod images;
pub mod openai;

pub use client::LlmClient;
pub use images::{ImageProvider, ImageRequest, ImageResponse};

#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub model: String,
    pub system: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub operation: String,
}

#[derive(Debug, Clone)]
pub struct GenerateResponse {
    /// First text block of the completion.
    pub content: String,
    pub model: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub finish_reason: String,
    pub provider: String,
}

#[async_trait::async_trait]
pub trait Provider: Send + Sync {
    async fn generate(&self, req: &GenerateRequest) -> anyhow::Result<GenerateResponse>;
    fn name(&self) -> &str;
}
