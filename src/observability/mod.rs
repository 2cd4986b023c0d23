//! Observability: structured logging is wired up in `main` through
//! `tracing-subscriber`; this module owns the metrics side.

pub mod metrics;
