//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (construction time):
//!     Route[] (method, pattern, fixture bytes)
//!     → route.rs (method filter)
//!     → matcher.rs (compile pattern into segments)
//!     → table.rs (store, ordered by specificity)
//!
//! Incoming Request (method, path)
//!     → router.rs (scan compiled entries)
//!     → Return: Found(route, params) | NotFound | MethodNotAllowed
//! ```
//!
//! # Design Decisions
//! - Patterns compiled once, immutable while serving
//! - Most specific pattern wins; registration order breaks remaining ties
//! - Deterministic: same input always matches same route

pub mod matcher;
pub mod route;
pub mod router;
pub mod table;

pub use matcher::{Pattern, PatternError};
pub use route::{MethodFilter, Route, RouteError, STANDARD_METHODS};
pub use router::{RouteMatch, Router};
pub use table::RouteTable;
