//! # Registration Boundary
//!
//! The inference core never stores anything itself. Every fact it derives is handed
//! to an implementation of [`TopologyRegistry`], which owns identifiers and
//! persistence (including deduplication across passes).

use async_trait::async_trait;

use crate::error::RegistryError;
use crate::topology::domain::DomainRecord;
use crate::topology::host::HostRecord;
use crate::topology::service::ServiceRecord;
use crate::topology::{DomainId, HostId, ServiceId};

/// Defines the contract for persisting inferred topology.
#[async_trait]
pub trait TopologyRegistry: Send + Sync {
    /// Creates `domain` under the project `project_id`.
    ///
    /// # Returns
    /// * `Ok(DomainId)` - Identifier assigned to the domain.
    /// * `Err(RegistryError)` - The registry rejected the domain.
    async fn add_domain(
        &self,
        project_id: &str,
        domain: &DomainRecord,
    ) -> Result<DomainId, RegistryError>;

    /// Attaches `host` to an already registered domain.
    async fn add_host_to_domain(
        &self,
        domain_id: &DomainId,
        host: &HostRecord,
    ) -> Result<HostId, RegistryError>;

    /// Registers `host` in the project's "unknown domain" bucket.
    async fn create_host_unknown_domain(
        &self,
        host: &HostRecord,
        project_id: &str,
    ) -> Result<HostId, RegistryError>;

    /// Registers a service running on `host_id`.
    async fn add_service(
        &self,
        host_id: &HostId,
        service: &ServiceRecord,
    ) -> Result<ServiceId, RegistryError>;
}
