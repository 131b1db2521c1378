//! Registers the services running on a host's open ports.

use tracing::debug;

use adscout_common::context::ExplorationContext;
use adscout_common::error::{ExplorationError, RecordKind, Result};
use adscout_common::topology::host::PortRecord;
use adscout_common::topology::service::ServiceRecord;
use adscout_common::topology::{HostId, ServiceId};

#[derive(Debug, Default, Clone, Copy)]
pub struct ServiceCollector;

impl ServiceCollector {
    pub fn new() -> Self {
        Self
    }

    /// Service records for every port whose state is exactly `"open"`, in port order.
    pub fn services(&self, ports: &[PortRecord]) -> Vec<ServiceRecord> {
        ports
            .iter()
            .filter(|port| port.is_open())
            .map(ServiceRecord::from)
            .collect()
    }

    /// Registers the open-port services of `host_id`.
    ///
    /// Stops at the first rejected service. Services registered before it stay registered.
    pub async fn collect(
        &self,
        ports: &[PortRecord],
        host_id: &HostId,
        ctx: &ExplorationContext,
    ) -> Result<Vec<ServiceId>> {
        let mut registered = Vec::new();

        for service in self.services(ports) {
            let id = ctx
                .registry()
                .add_service(host_id, &service)
                .await
                .map_err(|e| {
                    ctx.events().error(&format!(
                        "Error creating service {}/{} on host {host_id}: {e}",
                        service.port, service.protocol
                    ));
                    let subject = format!("{}/{}", service.port, service.protocol);
                    ExplorationError::registration(RecordKind::Service, subject, e)
                })?;

            debug!(%host_id, port = service.port, name = %service.name, "service registered");
            registered.push(id);
        }

        Ok(registered)
    }
}
