use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use opentelemetry::trace::TraceContextExt;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::Span;
use tracing_opentelemetry::OpenTelemetrySpanExt;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),

    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{context}: {source}")]
    Upstream {
        context: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error("GraphQL error: {0}")]
    Graphql(String),
}

impl AppError {
    pub fn upstream(context: &'static str, source: impl Into<anyhow::Error>) -> Self {
        AppError::Upstream {
            context,
            source: source.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Graphql(_) => StatusCode::BAD_GATEWAY,
            AppError::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message and optional details exposed to the caller.
    fn public_body(&self) -> (String, Option<String>) {
        match self {
            AppError::Validation(msg) | AppError::NotFound(msg) => (msg.clone(), None),
            AppError::InvalidBody(rejection) => (
                "Invalid request body".to_string(),
                Some(rejection.body_text()),
            ),
            AppError::MethodNotAllowed => (self.to_string(), None),
            AppError::Upstream { context, source } => {
                tracing::error!(error = %source, context = %context, "Upstream service error");
                (context.to_string(), Some(source.to_string()))
            }
            AppError::Graphql(msg) => {
                tracing::error!(error = %msg, "GraphQL error");
                ("GraphQL request failed".to_string(), Some(msg.clone()))
            }
        }
    }
}

pub fn get_trace_id() -> Option<String> {
    let span = Span::current();
    let context = span.context();
    let span_ref = context.span();
    let span_context = span_ref.span_context();

    if span_context.is_valid() {
        Some(span_context.trace_id().to_string())
    } else {
        None
    }
}

fn error_body(status: StatusCode, error: String, details: Option<String>) -> Value {
    let mut body = json!({
        "error": error,
        "status": status.as_u16(),
    });
    if let Some(details) = details {
        body["details"] = Value::String(details);
    }
    if let Some(trace_id) = get_trace_id() {
        body["trace_id"] = Value::String(trace_id);
    }
    body
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (error, details) = self.public_body();

        (status, Json(error_body(status, error, details))).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
