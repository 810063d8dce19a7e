//! Fixture replay.
//!
//! # Responsibilities
//! - Parse the matched route's fixture
//! - Copy status and headers onto the outbound response
//! - Write the body verbatim, except for 204 No Content
//!
//! # Design Decisions
//! - Parsing happens per request; nothing is cached or mutated between calls
//! - `Content-Length` is dropped and re-derived by the transport from the body
//! - A broken fixture is an error for the caller to escalate, never a synthetic 500

use axum::body::Body;
use axum::http::header::CONTENT_LENGTH;
use axum::http::{Request, StatusCode};
use axum::response::Response;

use crate::http::raw::{self, ParseError, ParsedResponse};
use crate::routing::Route;

/// Error type for replaying a fixture.
#[derive(Debug, thiserror::Error)]
#[error("fixture for {method} {pattern} is not a valid HTTP response: {source}")]
pub struct ReplayError {
    pub method: String,
    pub pattern: String,
    #[source]
    pub source: ParseError,
}

/// Turns matched routes into responses.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReplayHandler;

impl ReplayHandler {
    /// Build the response for `request` from the route's fixture.
    pub fn handle<B>(&self, route: &Route, request: &Request<B>) -> Result<Response, ReplayError> {
        let parsed = raw::parse(route.response()).map_err(|source| ReplayError {
            method: route.method().to_string(),
            pattern: route.pattern().to_string(),
            source,
        })?;

        tracing::debug!(
            method = %request.method(),
            path = %request.uri().path(),
            pattern = %route.pattern(),
            status = parsed.status.as_u16(),
            "Replaying fixture"
        );

        Ok(self.replay(parsed))
    }

    /// Write a parsed fixture onto a fresh response.
    pub fn replay(&self, parsed: ParsedResponse) -> Response {
        let ParsedResponse {
            status,
            headers,
            body,
            ..
        } = parsed;

        let mut response = Response::new(Body::empty());
        *response.status_mut() = status;

        let out = response.headers_mut();
        for (name, value) in headers.iter() {
            if name == CONTENT_LENGTH {
                continue;
            }
            out.append(name.clone(), value.clone());
        }

        if status == StatusCode::NO_CONTENT {
            return response;
        }

        *response.body_mut() = Body::from(body);
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::http::header::TRANSFER_ENCODING;

    fn get(path: &str) -> Request<Body> {
        Request::builder().uri(path).body(Body::empty()).unwrap()
    }

    async fn body_of(response: Response) -> Vec<u8> {
        to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
    }

    #[tokio::test]
    async fn replays_status_headers_and_body() {
        let route = Route::new(
            "GET",
            "/a",
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nTransfer-Encoding: chunked\r\n\r\n{\"a\":1}",
        );
        let response = ReplayHandler.handle(&route, &get("/a")).unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "application/json");
        assert!(response.headers().get(TRANSFER_ENCODING).is_none());
        assert_eq!(body_of(response).await, b"{\"a\":1}");
    }

    #[tokio::test]
    async fn no_content_never_has_a_body() {
        let route = Route::new("DELETE", "/a", "HTTP/1.1 204 No Content\nX-Trace: 1\n\nleftover");
        let response = ReplayHandler.handle(&route, &get("/a")).unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(response.headers()["x-trace"], "1");
        assert!(body_of(response).await.is_empty());
    }

    #[tokio::test]
    async fn non_ok_status_is_kept() {
        let route = Route::new("POST", "/a", "HTTP/1.1 400 Bad Request\n\n{\"error\":\"age\"}");
        let response = ReplayHandler.handle(&route, &get("/a")).unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_of(response).await, b"{\"error\":\"age\"}");
    }

    #[test]
    fn captured_content_length_is_dropped() {
        let route = Route::new("GET", "/a", "HTTP/1.1 200 OK\nContent-Length: 999\n\nshort");
        let response = ReplayHandler.handle(&route, &get("/a")).unwrap();
        assert!(response.headers().get(CONTENT_LENGTH).is_none());
    }

    #[test]
    fn broken_fixture_names_the_route() {
        let route = Route::new("GET", "/broken", "garbage");
        let err = ReplayHandler.handle(&route, &get("/broken")).unwrap_err();

        assert!(matches!(err.source, ParseError::MalformedStatusLine(_)));
        assert!(err.to_string().contains("GET /broken"));
    }
}
