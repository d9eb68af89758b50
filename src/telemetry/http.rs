use std::time::Duration;

use axum::extract::MatchedPath;
use axum::http::{Request, Response};
use opentelemetry::KeyValue;
use tower_http::trace::{MakeSpan, OnResponse};
use tracing::Span;

use super::metrics::{HTTP_REQUEST_DURATION, HTTP_REQUESTS_TOTAL};

/// Route template of the request (`/admin/locations/{id}`), or the raw path when
/// no route matched.
fn route_of<B>(request: &Request<B>) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string())
}

#[derive(Clone, Default)]
pub struct HttpMakeSpan;

impl<B> MakeSpan<B> for HttpMakeSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let method = request.method().as_str();
        let route = route_of(request);

        tracing::info_span!(
            "HTTP request",
            otel.name = %format!("{method} {route}"),
            http.request.method = %method,
            http.route = %route,
            url.path = %request.uri().path(),
            url.query = request.uri().query().unwrap_or(""),
            user_agent.original = request
                .headers()
                .get("user-agent")
                .and_then(|v| v.to_str().ok())
                .unwrap_or(""),
            http.response.status_code = tracing::field::Empty,
            otel.status_code = tracing::field::Empty,
        )
    }
}

#[derive(Clone, Default)]
pub struct HttpOnResponse;

impl<B> OnResponse<B> for HttpOnResponse {
    fn on_response(self, response: &Response<B>, latency: Duration, span: &Span) {
        let status = response.status().as_u16();
        span.record("http.response.status_code", i64::from(status));
        span.record("otel.status_code", if status >= 500 { "ERROR" } else { "OK" });

        let latency_ms = latency.as_secs_f64() * 1000.0;
        let attributes = [
            KeyValue::new("http.status_code", i64::from(status)),
            KeyValue::new("http.status_class", format!("{}xx", status / 100)),
        ];
        HTTP_REQUESTS_TOTAL.add(1, &attributes);
        HTTP_REQUEST_DURATION.record(latency_ms, &attributes);

        if status >= 500 {
            tracing::warn!(http.response.status_code = status, latency_ms, "request failed");
        } else {
            tracing::info!(http.response.status_code = status, latency_ms, "request finished");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_falls_back_to_path() {
        let req = Request::builder()
            .uri("/admin/locations?refresh=true")
            .body(())
            .unwrap();
        assert_eq!(route_of(&req), "/admin/locations");
    }
}
