use async_openai::{
    Client,
    config::OpenAIConfig,
    types::images::{
        CreateImageRequest, Image, ImageBackground, ImageModel, ImageQuality, ImageSize,
        ImagesResponse,
    },
};
use serde::de::DeserializeOwned;

#[derive(Debug, Clone)]
pub struct ImageRequest {
    pub model: String,
    pub prompt: String,
    pub size: String,
    pub background: String,
    pub quality: String,
}

impl ImageRequest {
    /// Square transparent-background render used for stamps.
    pub fn stamp(model: &str, quality: &str, prompt: &str) -> Self {
        Self {
            model: model.to_string(),
            prompt: prompt.to_string(),
            size: "1024x1024".to_string(),
            background: "transparent".to_string(),
            quality: quality.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ImageResponse {
    /// Base64 payload of the first image, if the API returned one.
    pub b64_json: Option<String>,
}

#[async_trait::async_trait]
pub trait ImageProvider: Send + Sync {
    async fn generate_image(&self, req: &ImageRequest) -> anyhow::Result<ImageResponse>;
    fn name(&self) -> &str;
}

/// Image generation through the OpenAI images API.
pub struct OpenAIImageProvider {
    client: Client<OpenAIConfig>,
}

impl OpenAIImageProvider {
    pub fn new(api_key: &str) -> Self {
        Self {
            client: Client::with_config(OpenAIConfig::new().with_api_key(api_key)),
        }
    }
}

/// Reads a config string as one of the API's enum values.
fn api_value<T: DeserializeOwned>(field: &str, value: &str) -> anyhow::Result<T> {
    serde_json::from_value(serde_json::Value::String(value.to_string()))
        .map_err(|_| anyhow::anyhow!("unsupported image {field}: {value}"))
}

fn create_image_request(req: &ImageRequest) -> anyhow::Result<CreateImageRequest> {
    Ok(CreateImageRequest {
        prompt: req.prompt.clone(),
        model: Some(api_value::<ImageModel>("model", &req.model)?),
        n: Some(1),
        size: Some(api_value::<ImageSize>("size", &req.size)?),
        background: Some(api_value::<ImageBackground>("background", &req.background)?),
        quality: Some(api_value::<ImageQuality>("quality", &req.quality)?),
        ..Default::default()
    })
}

fn first_b64(response: ImagesResponse) -> Option<String> {
    response.data.first().and_then(|image| match image.as_ref() {
        Image::B64Json { b64_json, .. } => Some(b64_json.to_string()),
        Image::Url { .. } => None,
    })
}

#[async_trait::async_trait]
impl ImageProvider for OpenAIImageProvider {
    async fn generate_image(&self, req: &ImageRequest) -> anyhow::Result<ImageResponse> {
        let response = self
            .client
            .images()
            .generate(create_image_request(req)?)
            .await
            .map_err(|e| anyhow::anyhow!("OpenAI images error: {e}"))?;

        Ok(ImageResponse {
            b64_json: first_b64(response),
        })
    }

    fn name(&self) -> &str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stamp_request_shape() {
        let req = ImageRequest::stamp("gpt-image-1", "high", "a flat drawing");
        let value = serde_json::to_value(create_image_request(&req).unwrap()).unwrap();
        assert_eq!(value["model"], "gpt-image-1");
        assert_eq!(value["size"], "1024x1024");
        assert_eq!(value["background"], "transparent");
        assert_eq!(value["quality"], "high");
        assert_eq!(value["prompt"], "a flat drawing");
        assert_eq!(value["n"], 1);
        assert!(value.get("response_format").is_none());
    }

    #[test]
    fn test_unlisted_model_is_passed_through() {
        let req = ImageRequest::stamp("gpt-image-2", "medium", "a flat drawing");
        let value = serde_json::to_value(create_image_request(&req).unwrap()).unwrap();
        assert_eq!(value["model"], "gpt-image-2");
        assert_eq!(value["quality"], "medium");
    }

    #[test]
    fn test_unknown_quality_is_rejected() {
        let req = ImageRequest::stamp("gpt-image-1", "ultra", "a flat drawing");
        let err = create_image_request(&req).unwrap_err();
        assert_eq!(err.to_string(), "unsupported image quality: ultra");
    }

    #[test]
    fn test_images_response_without_data() {
        let resp: ImagesResponse =
            serde_json::from_str(r#"{"created": 1, "data": []}"#).unwrap();
        assert_eq!(first_b64(resp), None);
    }

    #[test]
    fn test_images_response_payload() {
        let resp: ImagesResponse =
            serde_json::from_str(r#"{"created": 1, "data": [{"b64_json": "aGVsbG8="}]}"#).unwrap();
        assert_eq!(first_b64(resp).as_deref(), Some("aGVsbG8="));
    }
}
