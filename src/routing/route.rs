//! Route definitions supplied by test authors.
//!
//! # Responsibilities
//! - Hold the (method, pattern, fixture) triple exactly as registered
//! - Resolve the method string into a concrete method filter
//!
//! # Design Decisions
//! - Construction is infallible and cheap; validation happens at registration
//! - Fixture bytes are stored untouched and only parsed when a request hits the route

use axum::body::Bytes;
use axum::http::Method;

/// Methods accepted by [`Route::new`], in the order any-method routes are listed.
pub const STANDARD_METHODS: [Method; 9] = [
    Method::GET,
    Method::HEAD,
    Method::POST,
    Method::PUT,
    Method::PATCH,
    Method::DELETE,
    Method::CONNECT,
    Method::OPTIONS,
    Method::TRACE,
];

/// Error type for route registration.
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error("unsupported http method: {0:?}")]
    InvalidMethod(String),

    #[error(transparent)]
    Pattern(#[from] crate::routing::matcher::PatternError),

    #[error("route already registered: {method} {pattern}")]
    Duplicate { method: String, pattern: String },
}

/// A registered (method, path-pattern, raw response) triple.
#[derive(Debug, Clone)]
pub struct Route {
    method: String,
    pattern: String,
    response: Bytes,
}

impl Route {
    /// Create a new route.
    ///
    /// `method` is one of the standard HTTP verbs, or empty to match every method.
    /// `response` must be a complete captured HTTP/1.x response; it is not inspected
    /// until the first request that matches the route.
    pub fn new(
        method: impl Into<String>,
        pattern: impl Into<String>,
        response: impl Into<Bytes>,
    ) -> Self {
        Self {
            method: method.into(),
            pattern: pattern.into(),
            response: response.into(),
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The raw fixture bytes.
    pub fn response(&self) -> &Bytes {
        &self.response
    }

    /// Resolve the method string into a filter.
    pub(crate) fn method_filter(&self) -> Result<MethodFilter, RouteError> {
        MethodFilter::parse(&self.method)
    }
}

/// Which request methods a route answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodFilter {
    /// Registered with an empty method.
    Any,
    Only(Method),
}

impl MethodFilter {
    /// Parse a method string, case-insensitively.
    pub fn parse(method: &str) -> Result<Self, RouteError> {
        let trimmed = method.trim();
        if trimmed.is_empty() {
            return Ok(MethodFilter::Any);
        }

        let upper = trimmed.to_ascii_uppercase();
        STANDARD_METHODS
            .iter()
            .find(|m| m.as_str() == upper)
            .map(|m| MethodFilter::Only(m.clone()))
            .ok_or_else(|| RouteError::InvalidMethod(method.to_string()))
    }

    pub fn accepts(&self, method: &Method) -> bool {
        match self {
            MethodFilter::Any => true,
            MethodFilter::Only(m) => m == method,
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, MethodFilter::Any)
    }

    /// The methods this filter is listed under.
    pub fn listed_methods(&self) -> Vec<Method> {
        match self {
            MethodFilter::Any => STANDARD_METHODS.to_vec(),
            MethodFilter::Only(m) => vec![m.clone()],
        }
    }
}
