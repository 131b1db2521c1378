//! In-memory [`TopologyRegistry`].
//!
//! Keeps every registered record in insertion order and hands out sequential ids
//! (`domain-1`, `host-1`, `service-1`, ...). Used by the CLI to print a pass result
//! and by tests, which can make it reject chosen calls.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use adscout_common::error::RegistryError;
use adscout_common::registry::TopologyRegistry;
use adscout_common::topology::domain::DomainRecord;
use adscout_common::topology::host::HostRecord;
use adscout_common::topology::service::ServiceRecord;
use adscout_common::topology::{DomainId, HostId, ServiceId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredDomain {
    pub id: DomainId,
    pub project_id: String,
    pub record: DomainRecord,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    Domain(DomainId),
    /// The project's "unknown domain" bucket.
    UnknownDomain { project_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredHost {
    pub id: HostId,
    pub placement: Placement,
    pub record: HostRecord,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredService {
    pub id: ServiceId,
    pub host_id: HostId,
    pub record: ServiceRecord,
}

#[derive(Debug, Default)]
struct State {
    domains: Vec<RegisteredDomain>,
    hosts: Vec<RegisteredHost>,
    services: Vec<RegisteredService>,
    reject_domains: HashSet<String>,
    reject_hosts: HashSet<String>,
    reject_service_ports: HashSet<u16>,
}

#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    state: Mutex<State>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `add_domain` fail for `name`.
    pub fn reject_domain(self, name: impl Into<String>) -> Self {
        self.with_state(|state| {
            state.reject_domains.insert(name.into());
        });
        self
    }

    /// Makes both host registration calls fail for the host at `ip`.
    pub fn reject_host(self, ip: impl Into<String>) -> Self {
        self.with_state(|state| {
            state.reject_hosts.insert(ip.into());
        });
        self
    }

    /// Makes `add_service` fail for services on `port`.
    pub fn reject_service_port(self, port: u16) -> Self {
        self.with_state(|state| {
            state.reject_service_ports.insert(port);
        });
        self
    }

    pub fn domains(&self) -> Vec<RegisteredDomain> {
        self.lock().map(|s| s.domains.clone()).unwrap_or_default()
    }

    pub fn hosts(&self) -> Vec<RegisteredHost> {
        self.lock().map(|s| s.hosts.clone()).unwrap_or_default()
    }

    pub fn services(&self) -> Vec<RegisteredService> {
        self.lock().map(|s| s.services.clone()).unwrap_or_default()
    }

    pub fn services_of(&self, host_id: &HostId) -> Vec<RegisteredService> {
        self.services()
            .into_iter()
            .filter(|service| &service.host_id == host_id)
            .collect()
    }

    fn with_state(&self, f: impl FnOnce(&mut State)) {
        if let Ok(mut state) = self.lock() {
            f(&mut state);
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, RegistryError> {
        self.state
            .lock()
            .map_err(|_| RegistryError::new("registry state poisoned"))
    }

    fn insert_host(&self, placement: Placement, host: &HostRecord) -> Result<HostId, RegistryError> {
        let mut state = self.lock()?;
        if state.reject_hosts.contains(&host.ip) {
            return Err(RegistryError::new(format!("host {} rejected", host.ip)));
        }

        let id = HostId::new(format!("host-{}", state.hosts.len() + 1));
        state.hosts.push(RegisteredHost {
            id: id.clone(),
            placement,
            record: host.clone(),
        });
        Ok(id)
    }
}

#[async_trait]
impl TopologyRegistry for InMemoryRegistry {
    async fn add_domain(
        &self,
        project_id: &str,
        domain: &DomainRecord,
    ) -> Result<DomainId, RegistryError> {
        let mut state = self.lock()?;
        if state.reject_domains.contains(&domain.name) {
            return Err(RegistryError::new(format!("domain {} rejected", domain.name)));
        }

        let id = DomainId::new(format!("domain-{}", state.domains.len() + 1));
        state.domains.push(RegisteredDomain {
            id: id.clone(),
            project_id: project_id.to_string(),
            record: domain.clone(),
        });
        Ok(id)
    }

    async fn add_host_to_domain(
        &self,
        domain_id: &DomainId,
        host: &HostRecord,
    ) -> Result<HostId, RegistryError> {
        let known = self.lock()?.domains.iter().any(|d| &d.id == domain_id);
        if !known {
            return Err(RegistryError::new(format!("unknown domain {domain_id}")));
        }
        self.insert_host(Placement::Domain(domain_id.clone()), host)
    }

    async fn create_host_unknown_domain(
        &self,
        host: &HostRecord,
        project_id: &str,
    ) -> Result<HostId, RegistryError> {
        let placement = Placement::UnknownDomain {
            project_id: project_id.to_string(),
        };
        self.insert_host(placement, host)
    }

    async fn add_service(
        &self,
        host_id: &HostId,
        service: &ServiceRecord,
    ) -> Result<ServiceId, RegistryError> {
        let mut state = self.lock()?;
        if state.reject_service_ports.contains(&service.port) {
            return Err(RegistryError::new(format!(
                "service on port {} rejected",
                service.port
            )));
        }
        if !state.hosts.iter().any(|h| &h.id == host_id) {
            return Err(RegistryError::new(format!("unknown host {host_id}")));
        }

        let id = ServiceId::new(format!("service-{}", state.services.len() + 1));
        state.services.push(RegisteredService {
            id: id.clone(),
            host_id: host_id.clone(),
            record: service.clone(),
        });
        Ok(id)
    }
}
