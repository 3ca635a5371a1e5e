//! User-facing notifications emitted during resolution

#[cfg(test)]
use mockall::automock;
use tracing::{info, warn};

/// Sink for non-fatal warnings and resolution success messages
///
/// Messages are emitted in call order; a notifier shared between concurrent
/// resolutions would interleave them.
#[cfg_attr(test, automock)]
pub trait Notifier: Send + Sync {
    fn warn(&self, message: &str);

    fn success(&self, message: &str);
}

/// Notifier that forwards messages to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn warn(&self, message: &str) {
        warn!("{}", message);
    }

    fn success(&self, message: &str) {
        info!("{}", message);
    }
}
