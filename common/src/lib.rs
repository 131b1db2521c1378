//! # adscout common
//!
//! Types shared by every `adscout` crate:
//!
//! * **[`topology`]**: host, port, domain and service records produced by inference.
//! * **[`registry`]**: the registration boundary the inference core writes into.
//! * **[`events`]**: fire-and-forget event sink.
//! * **[`context`]**: the caller context threaded through every inference call.
//! * **[`error`]**: error taxonomy.

pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod log;
pub mod registry;
pub mod topology;

#[doc(hidden)]
pub use tracing as __tracing;
