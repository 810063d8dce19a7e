//! In-process HTTP mock server that replays captured raw responses.
//!
//! Register routes as (method, path pattern, captured response) triples and
//! point the client under test at the server's URL:
//!
//! ```no_run
//! use raw_mock::{MockServer, Route};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let fixture = std::fs::read("testdata/get_unicorn.txt")?;
//! let server = MockServer::new(vec![Route::new("GET", "/unicorns/{id}", fixture)])?;
//!
//! let body = server
//!     .client()?
//!     .get(server.url_for("/unicorns/6198f9da97069d03e849096d").unwrap())
//!     .send()
//!     .await?
//!     .text()
//!     .await?;
//! println!("{body}");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod routing;

pub use http::{FallbackHandler, MockServer, ParsedResponse, ServerError};
pub use routing::Route;
