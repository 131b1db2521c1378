//! Builds a host's identity record and registers it.
//!
//! A host is always registered: under its resolved domain when there is one,
//! otherwise in the project's unknown-domain bucket.

use tracing::info;

use adscout_common::context::{ExplorationContext, validate_host_input};
use adscout_common::error::{ExplorationError, RecordKind, Result};
use adscout_common::topology::host::HostRecord;
use adscout_common::topology::{DomainId, HostId};

use crate::evidence::EvidenceLocator;
use crate::scan::ScanDocument;

#[derive(Debug, Default, Clone, Copy)]
pub struct HostAssembler;

impl HostAssembler {
    pub fn new() -> Self {
        Self
    }

    /// Reads the host node for `ip`. A host missing from the document still yields
    /// a bare record carrying only the address.
    pub fn build(&self, doc: &ScanDocument, ip: &str) -> HostRecord {
        let query = EvidenceLocator::new(ip).host();
        doc.find_one(&query)
            .and_then(|node| node.as_host())
            .map(|host| host.to_record(ip))
            .unwrap_or_else(|| HostRecord::new(ip))
    }

    /// Builds and registers the host at `ip`.
    pub async fn assemble(
        &self,
        doc: &ScanDocument,
        ip: &str,
        domain: Option<&DomainId>,
        ctx: &ExplorationContext,
    ) -> Result<HostId> {
        validate_host_input(ip, ctx)?;
        let record = self.build(doc, ip);
        self.register(&record, domain, ctx).await
    }

    /// Registers `record` with its `domain_ref` set to `domain`.
    pub async fn register(
        &self,
        record: &HostRecord,
        domain: Option<&DomainId>,
        ctx: &ExplorationContext,
    ) -> Result<HostId> {
        validate_host_input(&record.ip, ctx)?;

        let placed = HostRecord {
            domain_ref: domain.cloned(),
            ..record.clone()
        };
        let registry = ctx.registry();
        let registered = match domain {
            Some(domain_id) => registry.add_host_to_domain(domain_id, &placed).await,
            None => {
                registry
                    .create_host_unknown_domain(&placed, ctx.project_id())
                    .await
            }
        };

        let host_id = registered.map_err(|e| {
            ctx.events()
                .error(&format!("Error while creating host {}: {e}", record.ip));
            ExplorationError::registration(RecordKind::Host, &record.ip, e)
        })?;

        info!(
            host = %record.ip,
            hostname = record.hostname.as_deref().unwrap_or("-"),
            domain = domain.map(DomainId::as_str).unwrap_or("unknown"),
            "host registered"
        );
        Ok(host_id)
    }
}
