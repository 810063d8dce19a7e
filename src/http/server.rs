//! Mock server setup and lifecycle.
//!
//! # Responsibilities
//! - Own the route table and the fallback handlers for one server instance
//! - Funnel every request through a single axum fallback into the mock router
//! - Bind, serve (plain or TLS) and shut down via axum-server
//! - Expose the transport's URL, address and a matching client
//!
//! # Design Decisions
//! - Composition: transport handle and router are two owned fields
//! - No global state; every server has its own routes and handlers
//! - Broken fixtures panic the request task after logging, so clients see a
//!   dropped connection rather than a plausible-looking response

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
    Router as AxumRouter,
};
use axum_server::tls_rustls::RustlsConfig;
use axum_server::Handle;
use std::net::{SocketAddr, TcpListener};
use std::path::Path;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;

use crate::http::fallback::{FallbackHandler, Fallbacks};
use crate::http::replay::ReplayHandler;
use crate::lifecycle::{ServerState, TransitionError};
use crate::net::tls::{self, TlsError};
use crate::routing::{Route, RouteError, RouteMatch, Router};

/// Error type for server operations.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("router is not initialized")]
    RouterNotInitialized,

    #[error(transparent)]
    Route(#[from] RouteError),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Tls(#[from] TlsError),

    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
}

/// State shared with the request handler.
#[derive(Clone)]
pub struct DispatchState {
    router: Arc<Router>,
    fallbacks: Arc<Fallbacks>,
    replay: ReplayHandler,
}

/// An HTTP server that replays captured responses.
pub struct MockServer {
    router: Option<Arc<Router>>,
    fallbacks: Arc<Fallbacks>,
    bind_address: SocketAddr,
    state: ServerState,
    transport: Option<Transport>,
}

struct Transport {
    handle: Handle,
    task: JoinHandle<()>,
    local_addr: SocketAddr,
    url: String,
    tls: bool,
}

impl MockServer {
    /// Create and start a server. Must be called from within a Tokio runtime.
    ///
    /// The caller should call [`close`](Self::close) when finished; dropping
    /// the server closes it as well.
    pub fn new(routes: impl IntoIterator<Item = Route>) -> Result<Self, ServerError> {
        let mut server = Self::unstarted(routes)?;
        server.start()?;
        Ok(server)
    }

    /// Create a server without starting it.
    ///
    /// After changing its configuration, the caller should call
    /// [`start`](Self::start) or one of the TLS variants.
    pub fn unstarted(routes: impl IntoIterator<Item = Route>) -> Result<Self, ServerError> {
        let router = Router::from_routes(routes)?;
        Ok(Self {
            router: Some(Arc::new(router)),
            fallbacks: Arc::new(Fallbacks::new()),
            bind_address: SocketAddr::from(([127, 0, 0, 1], 0)),
            state: ServerState::Unstarted,
            transport: None,
        })
    }

    /// Change the address `start` binds to. Defaults to `127.0.0.1:0`.
    pub fn set_bind_address(&mut self, address: SocketAddr) -> Result<(), ServerError> {
        self.state.ensure_unstarted()?;
        self.bind_address = address;
        Ok(())
    }

    /// Start serving plain HTTP.
    pub fn start(&mut self) -> Result<(), ServerError> {
        self.launch(None)
    }

    /// Start serving HTTPS with the given TLS configuration.
    pub fn start_tls(&mut self, config: RustlsConfig) -> Result<(), ServerError> {
        self.launch(Some(config))
    }

    /// Start serving HTTPS with a certificate and key read from PEM files.
    pub async fn start_tls_pem(&mut self, cert_path: &Path, key_path: &Path) -> Result<(), ServerError> {
        let config = tls::load_tls_config(cert_path, key_path).await?;
        self.start_tls(config)
    }

    fn launch(&mut self, tls: Option<RustlsConfig>) -> Result<(), ServerError> {
        let router = self.router.clone().ok_or(ServerError::RouterNotInitialized)?;
        self.state.ensure_unstarted()?;

        let listener = TcpListener::bind(self.bind_address).map_err(|source| ServerError::Bind {
            address: self.bind_address,
            source,
        })?;
        let local_addr = listener.local_addr().map_err(|source| ServerError::Bind {
            address: self.bind_address,
            source,
        })?;
        listener
            .set_nonblocking(true)
            .map_err(|source| ServerError::Bind { address: local_addr, source })?;

        let app = build_app(DispatchState::new(router, Arc::clone(&self.fallbacks)));

        let handle = Handle::new();
        let is_tls = tls.is_some();
        let task = match tls {
            None => {
                let server = axum_server::from_tcp(listener).handle(handle.clone());
                tokio::spawn(async move {
                    if let Err(e) = server.serve(app.into_make_service()).await {
                        tracing::error!(error = %e, "Mock server stopped with error");
                    }
                })
            }
            Some(config) => {
                let server = axum_server::tls_rustls::from_tcp_rustls(listener, config)
                    .handle(handle.clone());
                tokio::spawn(async move {
                    if let Err(e) = server.serve(app.into_make_service()).await {
                        tracing::error!(error = %e, "Mock server stopped with error");
                    }
                })
            }
        };

        let scheme = if is_tls { "https" } else { "http" };
        let url = format!("{}://{}", scheme, local_addr);
        self.state.start()?;
        self.transport = Some(Transport {
            handle,
            task,
            local_addr,
            url,
            tls: is_tls,
        });

        tracing::info!(address = %local_addr, tls = is_tls, "Mock server started");
        Ok(())
    }

    /// Shut the server down and release the listener. Safe to call repeatedly.
    pub fn close(&mut self) {
        let was_running = self.state.close();
        if let Some(transport) = self.transport.take() {
            transport.handle.shutdown();
            transport.task.abort();
        }
        if was_running {
            tracing::info!("Mock server closed");
        }
    }

    /// Base URL such as `http://127.0.0.1:40123`, once started.
    pub fn url(&self) -> Option<&str> {
        self.transport.as_ref().map(|t| t.url.as_str())
    }

    /// `url()` joined with `path`.
    pub fn url_for(&self, path: &str) -> Option<String> {
        self.url().map(|base| format!("{}{}", base, path))
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.transport.as_ref().map(|t| t.local_addr)
    }

    pub fn state(&self) -> ServerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// An HTTP client suited to this server. In TLS mode it trusts any certificate.
    pub fn client(&self) -> Result<reqwest::Client, ServerError> {
        let tls = self.transport.as_ref().is_some_and(|t| t.tls);
        let client = reqwest::Client::builder()
            .no_proxy()
            .danger_accept_invalid_certs(tls)
            .build()?;
        Ok(client)
    }

    /// Registered routes as `Method: X, Pattern: Y` lines, sorted.
    pub fn get_routes(&self) -> Result<Vec<String>, ServerError> {
        let router = self.router.as_ref().ok_or(ServerError::RouterNotInitialized)?;
        Ok(router.table().list())
    }

    /// Replace the handler for requests no pattern matches.
    pub fn set_custom_not_found_handler(&self, handler: FallbackHandler) {
        self.fallbacks.set_not_found(handler);
    }

    /// Replace the handler for requests whose path matches but method does not.
    pub fn set_custom_method_not_allowed_handler(&self, handler: FallbackHandler) {
        self.fallbacks.set_method_not_allowed(handler);
    }

    /// Same as [`set_custom_not_found_handler`](Self::set_custom_not_found_handler).
    pub fn set_not_found_handler(&self, handler: FallbackHandler) {
        self.set_custom_not_found_handler(handler);
    }
}

impl std::fmt::Debug for MockServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockServer")
            .field("state", &self.state)
            .field("url", &self.url())
            .field("routes", &self.router.as_ref().map(|r| r.table().len()))
            .finish()
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.close();
    }
}

/// Build the axum app: everything lands in [`dispatch`].
pub fn build_app(state: DispatchState) -> AxumRouter {
    AxumRouter::new()
        .fallback(dispatch)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

impl DispatchState {
    pub fn new(router: Arc<Router>, fallbacks: Arc<Fallbacks>) -> Self {
        Self {
            router,
            fallbacks,
            replay: ReplayHandler,
        }
    }
}

async fn dispatch(State(state): State<DispatchState>, request: Request<Body>) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    match state.router.match_route(&method, &path) {
        RouteMatch::Found { route, params } => {
            tracing::debug!(method = %method, path = %path, params = ?params, "Route matched");
            match state.replay.handle(route, &request) {
                Ok(response) => response,
                Err(e) => {
                    tracing::error!(fixture = true, error = %e, "Broken fixture, aborting request");
                    panic!("broken fixture: {}", e);
                }
            }
        }
        RouteMatch::MethodNotAllowed { allowed } => {
            tracing::debug!(method = %method, path = %path, allowed = ?allowed, "Method not allowed");
            state.fallbacks.method_not_allowed(request).await
        }
        RouteMatch::NotFound => {
            tracing::debug!(method = %method, path = %path, "No route matched");
            state.fallbacks.not_found(request).await
        }
    }
}
