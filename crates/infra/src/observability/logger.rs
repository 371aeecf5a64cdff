//! Injectable logger used by the dispatcher and facades.

use std::sync::Arc;

/// Minimal sink for SDK progress messages.
///
/// Logging is a side channel: implementations must not panic and their
/// outcome never influences request control flow.
pub trait PanelLogger: Send + Sync {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
}

/// Default sink: forwards to `tracing` under the `xui::panel` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl PanelLogger for TracingLogger {
    fn info(&self, message: &str) {
        tracing::info!(target: "xui::panel", "{message}");
    }

    fn warn(&self, message: &str) {
        tracing::warn!(target: "xui::panel", "{message}");
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl PanelLogger for NoopLogger {
    fn info(&self, _message: &str) {}

    fn warn(&self, _message: &str) {}
}

impl<L: PanelLogger + ?Sized> PanelLogger for Arc<L> {
    fn info(&self, message: &str) {
        (**self).info(message);
    }

    fn warn(&self, message: &str) {
        (**self).warn(message);
    }
}

/// Logger used when the embedding application does not provide one.
pub fn default_logger() -> Arc<dyn PanelLogger> {
    Arc::new(TracingLogger)
}
