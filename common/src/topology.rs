//! # Topology Records
//!
//! Records produced by the inference core and handed to the registration boundary.
//!
//! * [`host::HostRecord`] and [`host::PortRecord`]: identity of a scanned host.
//! * [`domain::DomainRecord`]: a resolved Active Directory domain and the evidence it came from.
//! * [`service::ServiceRecord`]: a service listening on an open port.
//! * [`DomainId`], [`HostId`], [`ServiceId`]: identifiers assigned by the registry.

pub mod domain;
pub mod host;
pub mod service;

use std::fmt;

macro_rules! record_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

record_id!(DomainId);
record_id!(HostId);
record_id!(ServiceId);
