//! The caller context threaded through every inference call.
//!
//! Replaces any process-wide "current services" handle: whoever starts a pass builds
//! an [`ExplorationContext`] and passes it down explicitly.

use std::sync::Arc;

use crate::error::InputError;
use crate::events::{EventSink, TracingEvents};
use crate::registry::TopologyRegistry;

#[derive(Clone)]
pub struct ExplorationContext {
    project_id: String,
    registry: Arc<dyn TopologyRegistry>,
    events: Arc<dyn EventSink>,
}

impl ExplorationContext {
    pub fn new(project_id: impl Into<String>, registry: Arc<dyn TopologyRegistry>) -> Self {
        Self {
            project_id: project_id.into(),
            registry,
            events: Arc::new(TracingEvents),
        }
    }

    pub fn with_events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn registry(&self) -> &dyn TopologyRegistry {
        self.registry.as_ref()
    }

    pub fn events(&self) -> &dyn EventSink {
        self.events.as_ref()
    }

    /// Rejects a context that cannot scope registrations to a project.
    pub fn validate(&self) -> Result<(), InputError> {
        if self.project_id.trim().is_empty() {
            return Err(InputError::MissingProject);
        }
        Ok(())
    }
}

impl std::fmt::Debug for ExplorationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExplorationContext")
            .field("project_id", &self.project_id)
            .finish_non_exhaustive()
    }
}

/// Validates the two preconditions every per-host operation shares.
pub fn validate_host_input(ip: &str, ctx: &ExplorationContext) -> Result<(), InputError> {
    if ip.trim().is_empty() {
        return Err(InputError::EmptyAddress);
    }
    ctx.validate()
}
