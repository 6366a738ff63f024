//! # Request/Response Tracing
//!
//! `tower_http::trace::TraceLayer` with one span per request carrying the
//! method and path. The query string is left out of the span because admin
//! search terms may contain participant names.

use axum::body::Body;
use axum::http::Request;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{MakeSpan, TraceLayer};
use tracing::Span;

/// Span factory recording method and path only.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathOnlySpan;

impl MakeSpan<Body> for PathOnlySpan {
    fn make_span(&mut self, request: &Request<Body>) -> Span {
        tracing::info_span!(
            "request",
            method = %request.method(),
            path = %request.uri().path(),
        )
    }
}

/// Build the `TraceLayer` for the portal API.
pub fn layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>, PathOnlySpan> {
    TraceLayer::new_for_http().make_span_with(PathOnlySpan)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_omits_query() {
        let request = Request::builder()
            .uri("/v1/admin/participants?query=Diop")
            .body(Body::empty())
            .unwrap();
        let span = PathOnlySpan.make_span(&request);
        // Span metadata only exists when a subscriber is installed; building
        // it must still succeed without one.
        drop(span);
        let _layer = layer();
    }
}
