//! Fire-and-forget event sink.
//!
//! Inference code reports progress through an [`EventSink`] it receives in its
//! context. Nothing it does depends on the sink: calls return `()` and are never awaited.

use tracing::{error, info};

pub trait EventSink: Send + Sync {
    fn info(&self, message: &str);

    fn error(&self, message: &str);

    /// A structured, named event such as `scan_start` or `module_complete`.
    fn event(&self, name: &str, fields: &[(&str, String)]);
}

/// Forwards everything to `tracing` under the `adscout::events` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEvents;

impl EventSink for TracingEvents {
    fn info(&self, message: &str) {
        info!(target: "adscout::events", "{message}");
    }

    fn error(&self, message: &str) {
        error!(target: "adscout::events", "{message}");
    }

    fn event(&self, name: &str, fields: &[(&str, String)]) {
        let rendered: String = fields
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<String>>()
            .join(" ");
        info!(target: "adscout::events", event = name, "{rendered}");
    }
}
