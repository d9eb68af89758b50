use std::sync::Arc;
use std::time::Instant;

use opentelemetry::KeyValue;
use tracing::Instrument;
use tracing_opentelemetry::OpenTelemetrySpanExt;

use super::{GenerateRequest, GenerateResponse, ImageProvider, ImageRequest, ImageResponse, Provider};
use crate::telemetry::metrics::{
    GEN_AI_ERROR_COUNT, GEN_AI_OPERATION_DURATION, GEN_AI_TOKEN_USAGE,
};

/// Instrumented front for the text and image providers.
///
/// Calls are made exactly once; failures go straight back to the caller.
pub struct LlmClient {
    pub text: Arc<dyn Provider>,
    pub images: Arc<dyn ImageProvider>,
}

impl LlmClient {
    pub fn new(text: Arc<dyn Provider>, images: Arc<dyn ImageProvider>) -> Self {
        Self { text, images }
    }

    pub async fn generate(&self, req: &GenerateRequest) -> anyhow::Result<GenerateResponse> {
        let provider_name = self.text.name().to_string();
        let attrs = CallAttributes::new("chat", &provider_name, &req.model);
        let start = Instant::now();

        let span = tracing::info_span!(
            "gen_ai.chat",
            otel.name = %format!("gen_ai.chat {}", req.model),
            gen_ai.operation.name = "chat",
            gen_ai.provider.name = %provider_name,
            gen_ai.request.model = %req.model,
            gen_ai.request.max_tokens = i64::from(req.max_tokens),
            gen_ai.response.model = tracing::field::Empty,
            gen_ai.usage.input_tokens = tracing::field::Empty,
            gen_ai.usage.output_tokens = tracing::field::Empty,
            gen_ai.response.finish_reasons = tracing::field::Empty,
            journeys.operation = %req.operation,
            otel.status_code = tracing::field::Empty,
            error.type = tracing::field::Empty,
        );
        span.add_event(
            "gen_ai.user.message",
            vec![KeyValue::new("gen_ai.prompt", truncate(&req.prompt, 1000))],
        );

        let mut resp = match self.text.generate(req).instrument(span.clone()).await {
            Ok(resp) => resp,
            Err(err) => return Err(attrs.fail(&span, err)),
        };
        resp.provider = provider_name;

        span.record("gen_ai.response.model", resp.model.as_str());
        span.record("gen_ai.usage.input_tokens", i64::from(resp.input_tokens));
        span.record("gen_ai.usage.output_tokens", i64::from(resp.output_tokens));
        if !resp.finish_reason.is_empty() {
            span.record("gen_ai.response.finish_reasons", resp.finish_reason.as_str());
        }
        span.add_event(
            "gen_ai.assistant.message",
            vec![KeyValue::new("gen_ai.completion", truncate(&resp.content, 2000))],
        );

        attrs.record_tokens("input", resp.input_tokens);
        attrs.record_tokens("output", resp.output_tokens);
        attrs.record_duration(start);

        Ok(resp)
    }

    pub async fn generate_image(&self, req: &ImageRequest) -> anyhow::Result<ImageResponse> {
        let provider_name = self.images.name().to_string();
        let attrs = CallAttributes::new("image_generation", &provider_name, &req.model);
        let start = Instant::now();

        let span = tracing::info_span!(
            "gen_ai.image",
            otel.name = %format!("gen_ai.image {}", req.model),
            gen_ai.operation.name = "image_generation",
            gen_ai.provider.name = %provider_name,
            gen_ai.request.model = %req.model,
            image.size = %req.size,
            image.quality = %req.quality,
            image.returned = tracing::field::Empty,
            otel.status_code = tracing::field::Empty,
            error.type = tracing::field::Empty,
        );

        match self.images.generate_image(req).instrument(span.clone()).await {
            Ok(resp) => {
                span.record("image.returned", resp.b64_json.is_some());
                attrs.record_duration(start);
                Ok(resp)
            }
            Err(err) => Err(attrs.fail(&span, err)),
        }
    }
}

/// Metric attributes shared by every instrument touched during one call.
struct CallAttributes {
    operation: KeyValue,
    provider: KeyValue,
    model: KeyValue,
}

impl CallAttributes {
    fn new(operation: &'static str, provider: &str, model: &str) -> Self {
        Self {
            operation: KeyValue::new("gen_ai.operation.name", operation),
            provider: KeyValue::new("gen_ai.provider.name", provider.to_string()),
            model: KeyValue::new("gen_ai.request.model", model.to_string()),
        }
    }

    fn record_tokens(&self, token_type: &'static str, count: u32) {
        GEN_AI_TOKEN_USAGE.record(
            f64::from(count),
            &[
                KeyValue::new("gen_ai.token.type", token_type),
                self.operation.clone(),
                self.provider.clone(),
                self.model.clone(),
            ],
        );
    }

    fn record_duration(&self, start: Instant) {
        GEN_AI_OPERATION_DURATION.record(
            start.elapsed().as_secs_f64(),
            &[self.operation.clone(), self.provider.clone(), self.model.clone()],
        );
    }

    /// Marks the span as failed and counts the error; the error is returned as is.
    fn fail(&self, span: &tracing::Span, err: anyhow::Error) -> anyhow::Error {
        let error_type = classify_error(&err);
        span.record("otel.status_code", "ERROR");
        span.record("error.type", error_type);
        GEN_AI_ERROR_COUNT.add(
            1,
            &[
                self.operation.clone(),
                self.provider.clone(),
                self.model.clone(),
                KeyValue::new("error.type", error_type),
            ],
        );
        tracing::warn!(parent: span, error = %err, error.type = error_type, "Model call failed");
        err
    }
}

fn classify_error(err: &anyhow::Error) -> &'static str {
    let msg = err.to_string().to_lowercase();
    if msg.contains("rate limit") || msg.contains("429") {
        "rate_limit"
    } else if msg.contains("timeout") || msg.contains("timed out") {
        "timeout"
    } else if msg.contains("401")
        || msg.contains("403")
        || msg.contains("auth")
        || msg.contains("api key")
    {
        "auth_error"
    } else if msg.contains("400") || msg.contains("422") || msg.contains("invalid") {
        "invalid_request"
    } else if msg.contains("500")
        || msg.contains("502")
        || msg.contains("503")
        || msg.contains("529")
        || msg.contains("overloaded")
    {
        "server_error"
    } else if msg.contains("connect") || msg.contains("dns") || msg.contains("reset") {
        "network_error"
    } else {
        "unknown_error"
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        s.char_indices()
            .take_while(|&(i, _)| i < max)
            .map(|(_, c)| c)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeImageProvider, FakeTextProvider};

    #[test]
    fn test_classify_error_categories() {
        let cases = vec![
            ("status 429: too many requests", "rate_limit"),
            ("request timed out", "timeout"),
            ("Anthropic API error (401 Unauthorized): invalid x-api-key", "auth_error"),
            ("400 bad request", "invalid_request"),
            ("Anthropic API error (529): Overloaded", "server_error"),
            ("connection refused", "network_error"),
            ("something unexpected", "unknown_error"),
        ];

        for (msg, expected) in cases {
            let err = anyhow::anyhow!("{}", msg);
            assert_eq!(classify_error(&err), expected, "classify_error({msg:?})");
        }
    }

    #[test]
    fn test_truncate_multibyte_safe() {
        let result = truncate("hé世界!", 3);
        assert!(result.len() <= 3);
        assert!(result.is_char_boundary(result.len()));
        assert_eq!(truncate("short", 10), "short");
    }

    #[tokio::test]
    async fn test_generate_records_provider_name() {
        let client = LlmClient::new(
            Arc::new(FakeTextProvider::replying("SELECT 1;")),
            Arc::new(FakeImageProvider::returning(None)),
        );
        let resp = client
            .generate(&GenerateRequest {
                model: "m".into(),
                system: String::new(),
                prompt: "p".into(),
                max_tokens: 16,
                operation: "test".into(),
            })
            .await
            .unwrap();
        assert_eq!(resp.content, "SELECT 1;");
        assert_eq!(resp.provider, "fake");
    }

    #[tokio::test]
    async fn test_generate_passes_errors_through_once() {
        let text = Arc::new(FakeTextProvider::failing("503 service unavailable"));
        let client = LlmClient::new(text.clone(), Arc::new(FakeImageProvider::returning(None)));
        let err = client
            .generate(&GenerateRequest {
                model: "m".into(),
                system: String::new(),
                prompt: "p".into(),
                max_tokens: 16,
                operation: "test".into(),
            })
            .await
            .unwrap_err();
        assert!(err.to_string().contains("503"));
        assert_eq!(text.calls(), 1);
    }
}
