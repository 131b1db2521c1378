//! Error taxonomy of the inference core.
//!
//! A missing piece of evidence is not an error: lookups return `Option` and the
//! strategy chain falls through to the next source. Only the cases below escape.

use thiserror::Error;

/// Rejected before any query is issued.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("host address is empty")]
    EmptyAddress,

    #[error("caller context carries no project identifier")]
    MissingProject,
}

/// The scan document could not be obtained or parsed. Fatal to a whole pass.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("failed to parse scan document: {message}")]
pub struct ParseError {
    message: String,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Raised by a [`crate::registry::TopologyRegistry`] implementation when it rejects a call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct RegistryError {
    message: String,
}

impl RegistryError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Which kind of record a failed registration call was creating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Domain,
    Host,
    Service,
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RecordKind::Domain => "domain",
            RecordKind::Host => "host",
            RecordKind::Service => "service",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExplorationError {
    #[error("invalid input: {0}")]
    Input(#[from] InputError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("registration of {kind} '{subject}' failed: {source}")]
    Registration {
        kind: RecordKind,
        subject: String,
        #[source]
        source: RegistryError,
    },
}

impl ExplorationError {
    pub fn registration(kind: RecordKind, subject: impl Into<String>, source: RegistryError) -> Self {
        Self::Registration {
            kind,
            subject: subject.into(),
            source,
        }
    }

    /// `true` for errors that abort a whole pass instead of a single host.
    pub fn is_pass_fatal(&self) -> bool {
        matches!(self, ExplorationError::Parse(_))
    }
}

pub type Result<T> = std::result::Result<T, ExplorationError>;
