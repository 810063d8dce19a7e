//! Route lookup.
//!
//! # Responsibilities
//! - Resolve an inbound (method, path) to a single registered route
//! - Distinguish "no pattern matched" from "pattern matched, method did not"
//!
//! # Design Decisions
//! - Immutable after construction (shared via Arc without locks)
//! - Entries are pre-sorted by specificity, so the first accepting entry wins
//! - O(n) scan over patterns; mock servers carry a handful of routes

use axum::http::Method;
use std::collections::HashMap;

use crate::routing::route::{Route, RouteError};
use crate::routing::table::RouteTable;

/// Outcome of a route lookup.
#[derive(Debug)]
pub enum RouteMatch<'a> {
    Found {
        route: &'a Route,
        params: HashMap<String, String>,
    },
    NotFound,
    /// The path matched at least one pattern, but none registered for this method.
    MethodNotAllowed { allowed: Vec<Method> },
}

/// Matches requests against a [`RouteTable`].
#[derive(Debug, Default)]
pub struct Router {
    table: RouteTable,
}

impl Router {
    pub fn new(table: RouteTable) -> Self {
        Self { table }
    }

    pub fn from_routes(routes: impl IntoIterator<Item = Route>) -> Result<Self, RouteError> {
        RouteTable::from_routes(routes).map(Self::new)
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Look up the route for a request.
    pub fn match_route(&self, method: &Method, path: &str) -> RouteMatch<'_> {
        let mut allowed: Vec<Method> = Vec::new();
        let mut path_matched = false;

        for entry in self.table.entries() {
            let Some(params) = entry.pattern.matches(path) else {
                continue;
            };
            path_matched = true;

            if entry.method.accepts(method) {
                return RouteMatch::Found {
                    route: &entry.route,
                    params,
                };
            }

            for m in entry.method.listed_methods() {
                if !allowed.contains(&m) {
                    allowed.push(m);
                }
            }
        }

        if path_matched {
            RouteMatch::MethodNotAllowed { allowed }
        } else {
            RouteMatch::NotFound
        }
    }
}
