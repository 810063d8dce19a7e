//! Not-found and method-not-allowed handlers.
//!
//! Both default to an empty response with the matching status. Either can be
//! swapped while the server runs; the last write wins for subsequent requests.

use arc_swap::ArcSwap;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use futures_util::future::{BoxFuture, FutureExt};
use std::future::Future;
use std::sync::Arc;

type BoxedHandler = Box<dyn Fn(Request<Body>) -> BoxFuture<'static, Response> + Send + Sync>;

/// A user-supplied handler for requests no route answers.
pub struct FallbackHandler {
    inner: BoxedHandler,
}

impl FallbackHandler {
    /// Wrap an async handler.
    pub fn new<H, Fut, R>(handler: H) -> Self
    where
        H: Fn(Request<Body>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse + 'static,
    {
        Self {
            inner: Box::new(move |req| handler(req).map(IntoResponse::into_response).boxed()),
        }
    }

    /// A handler answering with `status` and an empty body.
    pub fn status(status: StatusCode) -> Self {
        Self::new(move |_req| async move { status })
    }

    pub fn call(&self, request: Request<Body>) -> BoxFuture<'static, Response> {
        (self.inner)(request)
    }
}

impl std::fmt::Debug for FallbackHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackHandler").finish_non_exhaustive()
    }
}

/// The pair of fallback handlers a server consults.
#[derive(Debug)]
pub struct Fallbacks {
    not_found: ArcSwap<FallbackHandler>,
    method_not_allowed: ArcSwap<FallbackHandler>,
}

impl Fallbacks {
    pub fn new() -> Self {
        Self {
            not_found: ArcSwap::from_pointee(FallbackHandler::status(StatusCode::NOT_FOUND)),
            method_not_allowed: ArcSwap::from_pointee(FallbackHandler::status(
                StatusCode::METHOD_NOT_ALLOWED,
            )),
        }
    }

    pub fn set_not_found(&self, handler: FallbackHandler) {
        self.not_found.store(Arc::new(handler));
    }

    pub fn set_method_not_allowed(&self, handler: FallbackHandler) {
        self.method_not_allowed.store(Arc::new(handler));
    }

    pub async fn not_found(&self, request: Request<Body>) -> Response {
        let fut = self.not_found.load().call(request);
        fut.await
    }

    pub async fn method_not_allowed(&self, request: Request<Body>) -> Response {
        let fut = self.method_not_allowed.load().call(request);
        fut.await
    }
}

impl Default for Fallbacks {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    fn request() -> Request<Body> {
        Request::builder().uri("/nowhere").body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn defaults_are_empty_404_and_405() {
        let fallbacks = Fallbacks::new();

        let res = fallbacks.not_found(request()).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert!(to_bytes(res.into_body(), usize::MAX).await.unwrap().is_empty());

        let res = fallbacks.method_not_allowed(request()).await;
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert!(to_bytes(res.into_body(), usize::MAX).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn last_write_wins() {
        let fallbacks = Fallbacks::new();
        fallbacks.set_not_found(FallbackHandler::status(StatusCode::IM_A_TEAPOT));
        fallbacks.set_not_found(FallbackHandler::new(|req: Request<Body>| async move {
            (StatusCode::GONE, format!("gone: {}", req.uri().path()))
        }));

        let res = fallbacks.not_found(request()).await;
        assert_eq!(res.status(), StatusCode::GONE);
        let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert_eq!(body.as_ref(), b"gone: /nowhere");
    }

    #[tokio::test]
    async fn owned_response_types_are_accepted() {
        let fallbacks = Fallbacks::new();
        fallbacks.set_method_not_allowed(FallbackHandler::new(|_req| async {
            let mut res = Response::new(Body::from(String::from("nope")));
            *res.status_mut() = StatusCode::FORBIDDEN;
            res
        }));

        let res = fallbacks.method_not_allowed(request()).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert_eq!(body.as_ref(), b"nope");
    }
}
