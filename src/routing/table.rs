//! Registered routes and their compiled matchers.
//!
//! # Responsibilities
//! - Compile each route's pattern and method once, at registration
//! - Keep entries ordered from most to least specific pattern
//! - List registered (method, pattern) pairs for introspection
//!
//! # Design Decisions
//! - Append-only: there is no removal, and registration finishes before traffic starts
//! - Fixture bytes are not validated here; a broken fixture surfaces on first dispatch

use crate::routing::matcher::Pattern;
use crate::routing::route::{MethodFilter, Route, RouteError};

/// A route together with its compiled matchers.
#[derive(Debug, Clone)]
pub struct CompiledRoute {
    pub route: Route,
    pub method: MethodFilter,
    pub pattern: Pattern,
    /// Position in registration order.
    pub order: usize,
}

/// The set of routes a server answers.
#[derive(Debug, Default, Clone)]
pub struct RouteTable {
    entries: Vec<CompiledRoute>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from routes, failing on the first invalid one.
    pub fn from_routes(routes: impl IntoIterator<Item = Route>) -> Result<Self, RouteError> {
        let mut table = Self::new();
        for route in routes {
            table.register(route)?;
        }
        Ok(table)
    }

    /// Compile and store a route.
    pub fn register(&mut self, route: Route) -> Result<(), RouteError> {
        let method = route.method_filter()?;
        let pattern = Pattern::compile(route.pattern())?;

        let duplicate = self
            .entries
            .iter()
            .any(|e| e.method == method && e.pattern.as_str() == pattern.as_str());
        if duplicate {
            return Err(RouteError::Duplicate {
                method: route.method().to_string(),
                pattern: route.pattern().to_string(),
            });
        }

        tracing::debug!(
            method = %route.method(),
            pattern = %route.pattern(),
            "Route registered"
        );

        let entry = CompiledRoute {
            route,
            method,
            pattern,
            order: self.entries.len(),
        };

        // Insert after every entry that ranks at or above the new one, so equal
        // patterns keep registration order and specific methods precede `Any`.
        let pos = self
            .entries
            .iter()
            .position(|e| rank(&entry, e).is_lt())
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);

        Ok(())
    }

    /// Entries from most to least specific.
    pub fn entries(&self) -> &[CompiledRoute] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One `Method: X, Pattern: Y` line per (method, pattern) pair, sorted by method then pattern.
    ///
    /// Routes registered for any method are listed once for every standard method.
    pub fn list(&self) -> Vec<String> {
        let mut pairs: Vec<(String, &str)> = self
            .entries
            .iter()
            .flat_map(|e| {
                e.method
                    .listed_methods()
                    .into_iter()
                    .map(move |m| (m.to_string(), e.pattern.as_str()))
            })
            .collect();
        pairs.sort();
        pairs.dedup();

        pairs
            .into_iter()
            .map(|(method, pattern)| format!("Method: {}, Pattern: {}", method, pattern))
            .collect()
    }
}

fn rank(a: &CompiledRoute, b: &CompiledRoute) -> std::cmp::Ordering {
    a.pattern
        .specificity_cmp(&b.pattern)
        .then_with(|| a.method.is_any().cmp(&b.method.is_any()))
        .then_with(|| a.order.cmp(&b.order))
}
