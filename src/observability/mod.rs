//! Observability subsystem.
//!
//! Every subsystem emits `tracing` events with structured fields
//! (`method`, `path`, `pattern`, `status`, `address`). Broken fixtures are
//! logged at error level with `fixture = true` so they stand apart from
//! transport errors.

pub mod logging;
