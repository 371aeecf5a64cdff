//! Logging sinks for the SDK
//!
//! Structured diagnostics go through `tracing` directly. The per-request
//! narrative (one info line per attempt, one warn line per transient failure)
//! goes through a [`PanelLogger`] injected at construction, so an embedding
//! application can route it wherever it wants.

pub mod logger;

pub use logger::{NoopLogger, PanelLogger, TracingLogger};
