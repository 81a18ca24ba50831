//! Error reporting collaborator.

use std::error::Error;

/// Receives errors that handlers recover from but still want recorded.
pub trait ErrorLogger: Send + Sync {
    fn log_error(&self, label: &str, error: &(dyn Error + 'static));
}

/// Error logger emitting `tracing` events, including the source chain.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingErrorLogger;

impl ErrorLogger for TracingErrorLogger {
    fn log_error(&self, label: &str, error: &(dyn Error + 'static)) {
        let mut causes = Vec::new();
        let mut source = error.source();
        while let Some(cause) = source {
            causes.push(cause.to_string());
            source = cause.source();
        }

        if causes.is_empty() {
            tracing::error!(error = %error, "{}", label);
        } else {
            tracing::error!(error = %error, causes = ?causes, "{}", label);
        }
    }
}
