//! # Network Exploration Pass
//!
//! Turns one finished scan result into registered topology.
//!
//! For every host, in document order:
//! 1. **Domain**: infer the AD domain and register it (once per name per pass).
//! 2. **Host**: register the host under that domain, or under the unknown domain.
//! 3. **Services**: register a service per open port.
//! 4. **Role**: score the host as a possible domain controller.
//!
//! A failure on one host is logged, recorded in its [`HostOutcome`] and the pass moves
//! on. Only a document that cannot be parsed aborts the pass.

use std::collections::HashMap;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use tracing::{Instrument, info_span, warn};

use adscout_common::context::{ExplorationContext, validate_host_input};
use adscout_common::error::{ExplorationError, Result};
use adscout_common::topology::domain::DomainRecord;
use adscout_common::topology::host::HostRecord;
use adscout_common::topology::{DomainId, HostId, ServiceId};

use crate::assembler::HostAssembler;
use crate::controller::{DcVerdict, DomainControllerClassifier};
use crate::inference::DomainInferenceEngine;
use crate::scan::{ScanDocument, ScanResult};
use crate::services::ServiceCollector;

pub const MODULE_KEY: &str = "NetworkExplorer";

type ProgressCallback = Box<dyn Fn(usize, &str) + Send + Sync>;

/// What one host contributed to a pass.
#[derive(Debug, Clone)]
pub struct HostOutcome {
    pub ip: String,
    pub record: Option<HostRecord>,
    pub domain: Option<DomainRecord>,
    pub host_id: Option<HostId>,
    pub services: Vec<ServiceId>,
    pub verdict: DcVerdict,
    pub error: Option<ExplorationError>,
}

impl HostOutcome {
    fn new(ip: &str) -> Self {
        Self {
            ip: ip.to_string(),
            record: None,
            domain: None,
            host_id: None,
            services: Vec::new(),
            verdict: DcVerdict::default(),
            error: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct PassSummary {
    pub hosts: Vec<HostOutcome>,
    /// Domains registered during the pass, in resolution order.
    pub domains: Vec<(DomainId, DomainRecord)>,
}

impl PassSummary {
    pub fn failures(&self) -> impl Iterator<Item = &HostOutcome> {
        self.hosts.iter().filter(|host| !host.is_ok())
    }

    pub fn controllers(&self) -> impl Iterator<Item = &HostOutcome> {
        self.hosts.iter().filter(|host| host.verdict.is_controller)
    }

    pub fn domain_name(&self, id: &DomainId) -> Option<&str> {
        self.domains
            .iter()
            .find(|(domain_id, _)| domain_id == id)
            .map(|(_, record)| record.name.as_str())
    }
}

/// Orchestrates a pass with explicitly constructed components.
#[derive(Default)]
pub struct NetworkExplorer {
    engine: DomainInferenceEngine,
    assembler: HostAssembler,
    collector: ServiceCollector,
    classifier: DomainControllerClassifier,
    on_host_done: Option<ProgressCallback>,
}

impl NetworkExplorer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called after each host with the number of hosts processed so far and its address.
    pub fn with_progress(mut self, callback: impl Fn(usize, &str) + Send + Sync + 'static) -> Self {
        self.on_host_done = Some(Box::new(callback));
        self
    }

    /// Runs a full pass over `scan`.
    ///
    /// # Errors
    /// Only [`ExplorationError::Parse`]: the document could not be built and no host
    /// was processed. Everything else is reported per host in the summary.
    pub async fn explore(
        &self,
        scan: &impl ScanResult,
        ctx: &ExplorationContext,
    ) -> Result<PassSummary> {
        let started = Instant::now();
        ctx.events().info(&format!("Starting module: {MODULE_KEY}"));

        let doc: ScanDocument = scan.document().inspect_err(|e| {
            ctx.events()
                .error(&format!("[{MODULE_KEY}] Error while parsing: {e}"));
        })?;

        ctx.events().event(
            "scan_start",
            &[
                ("project", ctx.project_id().to_string()),
                ("hosts", doc.hosts().len().to_string()),
                ("bytes", scan.raw_output().len().to_string()),
            ],
        );

        let summary = self.explore_document(&doc, ctx).await;

        ctx.events().event(
            "module_complete",
            &[
                ("moduleKey", MODULE_KEY.to_string()),
                ("timestamp", unix_timestamp().to_string()),
                ("hosts", summary.hosts.len().to_string()),
                ("domains", summary.domains.len().to_string()),
                ("failures", summary.failures().count().to_string()),
                ("elapsed_ms", started.elapsed().as_millis().to_string()),
            ],
        );

        Ok(summary)
    }

    /// Processes every host of an already parsed document.
    pub async fn explore_document(&self, doc: &ScanDocument, ctx: &ExplorationContext) -> PassSummary {
        let mut summary = PassSummary::default();
        let mut known_domains: HashMap<String, DomainId> = HashMap::new();

        for (idx, host) in doc.hosts().iter().enumerate() {
            let ip = host.primary_address().unwrap_or_default();
            let mut outcome = HostOutcome::new(ip);
            if let Err(e) = self
                .explore_host(doc, ip, ctx, &mut known_domains, &mut summary, &mut outcome)
                .instrument(info_span!("host", ip))
                .await
            {
                warn!("host {ip} skipped: {e}");
                ctx.events()
                    .error(&format!("Processing host {ip} failed: {e}"));
                outcome.error = Some(e);
            }
            summary.hosts.push(outcome);

            if let Some(callback) = &self.on_host_done {
                callback(idx + 1, ip);
            }
        }

        summary
    }

    async fn explore_host(
        &self,
        doc: &ScanDocument,
        ip: &str,
        ctx: &ExplorationContext,
        known_domains: &mut HashMap<String, DomainId>,
        summary: &mut PassSummary,
        outcome: &mut HostOutcome,
    ) -> Result<()> {
        validate_host_input(ip, ctx)?;

        outcome.verdict = self.classifier.classify(doc, ip);

        let domain_id = match self.engine.infer(doc, ip) {
            Some(domain) => {
                let id = match known_domains.get(&domain.name) {
                    Some(id) => id.clone(),
                    None => {
                        let id = self.engine.register(&domain, ip, ctx).await?;
                        known_domains.insert(domain.name.clone(), id.clone());
                        summary.domains.push((id.clone(), domain.clone()));
                        id
                    }
                };
                outcome.domain = Some(domain);
                Some(id)
            }
            None => {
                ctx.events().info(&format!(
                    "Could not determine domain from scan results for host {ip}"
                ));
                None
            }
        };

        let mut record = self.assembler.build(doc, ip);
        record.domain_ref = domain_id;
        let host_id = self
            .assembler
            .register(&record, record.domain_ref.as_ref(), ctx)
            .await?;
        outcome.host_id = Some(host_id.clone());

        let ports = record.ports.clone();
        outcome.record = Some(record);
        outcome.services = self.collector.collect(&ports, &host_id, ctx).await?;

        Ok(())
    }
}

fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::registry::{InMemoryRegistry, Placement};
    use crate::scan::NmapScanResult;
    use adscout_common::error::{InputError, RecordKind, RegistryError};
    use adscout_common::events::EventSink;
    use adscout_common::registry::TopologyRegistry;
    use adscout_common::topology::service::ServiceRecord;
    use async_trait::async_trait;

    #[derive(Default)]
    struct RecordedEvents {
        names: Mutex<Vec<String>>,
    }

    impl EventSink for RecordedEvents {
        fn info(&self, _message: &str) {}

        fn error(&self, _message: &str) {}

        fn event(&self, name: &str, _fields: &[(&str, String)]) {
            if let Ok(mut names) = self.names.lock() {
                names.push(name.to_string());
            }
        }
    }

    /// Remembers the `domain_ref` of every host it is asked to store.
    #[derive(Default)]
    struct RecordingRegistry {
        domain_refs: Mutex<Vec<Option<DomainId>>>,
    }

    type Registered<T> = std::result::Result<T, RegistryError>;

    #[async_trait]
    impl TopologyRegistry for RecordingRegistry {
        async fn add_domain(&self, _project: &str, _domain: &DomainRecord) -> Registered<DomainId> {
            Ok(DomainId::new("corp"))
        }

        async fn add_host_to_domain(&self, _domain: &DomainId, host: &HostRecord) -> Registered<HostId> {
            self.domain_refs.lock().unwrap().push(host.domain_ref.clone());
            Ok(HostId::new("dc"))
        }

        async fn create_host_unknown_domain(&self, host: &HostRecord, _project: &str) -> Registered<HostId> {
            self.domain_refs.lock().unwrap().push(host.domain_ref.clone());
            Ok(HostId::new("orphan"))
        }

        async fn add_service(&self, _host: &HostId, _service: &ServiceRecord) -> Registered<ServiceId> {
            Ok(ServiceId::new("svc"))
        }
    }

    fn ldap_host(ip: &str, domain: &str) -> String {
        format!(
            r#"<host><address addr="{ip}" addrtype="ipv4"/><ports>
                 <port protocol="tcp" portid="389"><state state="open"/><service name="ldap" extrainfo="Domain: {domain}0., Site: HQ"/></port>
                 <port protocol="tcp" portid="88"><state state="open"/><service name="kerberos-sec"/></port>
               </ports></host>"#
        )
    }

    fn web_host(ip: &str) -> String {
        format!(
            r#"<host><address addr="{ip}" addrtype="ipv4"/><ports>
                 <port protocol="tcp" portid="80"><state state="open"/><service name="http"/></port>
                 <port protocol="tcp" portid="22"><state state="closed"/><service name="ssh"/></port>
                 <port protocol="tcp" portid="443"><state state="open"/><service name="https"/></port>
               </ports></host>"#
        )
    }

    fn scan(hosts: &[String]) -> NmapScanResult {
        NmapScanResult::from_xml(format!("<nmaprun>{}</nmaprun>", hosts.concat()))
    }

    #[tokio::test]
    async fn hosts_sharing_a_domain_register_it_once() {
        let registry = Arc::new(InMemoryRegistry::new());
        let ctx = ExplorationContext::new("p1", registry.clone());
        let result = scan(&[
            ldap_host("10.0.0.10", "corp.local"),
            ldap_host("10.0.0.11", "corp.local"),
        ]);

        let summary = NetworkExplorer::new().explore(&result, &ctx).await.unwrap();

        assert_eq!(registry.domains().len(), 1);
        assert_eq!(summary.domains.len(), 1);
        let hosts = registry.hosts();
        assert_eq!(hosts.len(), 2);
        assert_eq!(hosts[0].placement, hosts[1].placement);
        assert_eq!(summary.controllers().count(), 2);
    }

    #[tokio::test]
    async fn registry_receives_resolved_domain_ref() {
        let registry = Arc::new(RecordingRegistry::default());
        let ctx = ExplorationContext::new("p1", registry.clone());
        let result = scan(&[ldap_host("10.0.0.10", "corp.local"), web_host("10.0.0.20")]);

        NetworkExplorer::new().explore(&result, &ctx).await.unwrap();

        assert_eq!(
            *registry.domain_refs.lock().unwrap(),
            vec![Some(DomainId::new("corp")), None]
        );
    }

    #[tokio::test]
    async fn undetermined_domain_still_registers_host_and_services() {
        let registry = Arc::new(InMemoryRegistry::new());
        let ctx = ExplorationContext::new("p1", registry.clone());

        let summary = NetworkExplorer::new()
            .explore(&scan(&[web_host("10.0.0.20")]), &ctx)
            .await
            .unwrap();

        let outcome = &summary.hosts[0];
        assert!(outcome.is_ok());
        assert_eq!(outcome.domain, None);
        assert_eq!(outcome.services.len(), 2);
        assert!(!outcome.verdict.is_controller);
        assert_eq!(
            registry.hosts()[0].placement,
            Placement::UnknownDomain {
                project_id: "p1".into()
            }
        );
    }

    #[tokio::test]
    async fn failing_host_does_not_stop_the_pass() {
        let registry = Arc::new(InMemoryRegistry::new().reject_domain("corp.local"));
        let ctx = ExplorationContext::new("p1", registry.clone());
        let result = scan(&[ldap_host("10.0.0.10", "corp.local"), web_host("10.0.0.20")]);

        let summary = NetworkExplorer::new().explore(&result, &ctx).await.unwrap();

        assert_eq!(summary.failures().count(), 1);
        assert!(matches!(
            summary.hosts[0].error,
            Some(ExplorationError::Registration { kind: RecordKind::Domain, .. })
        ));
        assert!(summary.hosts[0].host_id.is_none());
        assert!(summary.hosts[1].is_ok());
        assert_eq!(registry.hosts().len(), 1);
    }

    #[tokio::test]
    async fn host_without_address_is_an_input_error() {
        let registry = Arc::new(InMemoryRegistry::new());
        let ctx = ExplorationContext::new("p1", registry.clone());
        let result = NmapScanResult::from_xml("<nmaprun><host><status state=\"up\"/></host></nmaprun>");

        let summary = NetworkExplorer::new().explore(&result, &ctx).await.unwrap();

        assert_eq!(
            summary.hosts[0].error,
            Some(ExplorationError::Input(InputError::EmptyAddress))
        );
        assert!(registry.hosts().is_empty());
    }

    #[tokio::test]
    async fn parse_failure_aborts_before_any_host() {
        let registry = Arc::new(InMemoryRegistry::new());
        let events = Arc::new(RecordedEvents::default());
        let ctx = ExplorationContext::new("p1", registry.clone()).with_events(events.clone());
        let result = NmapScanResult::from_xml("<nmaprun><host><ports><port portid=\"eighty\"/>");

        let err = NetworkExplorer::new().explore(&result, &ctx).await.unwrap_err();

        assert!(err.is_pass_fatal());
        assert!(registry.hosts().is_empty());
        assert!(events.names.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn emits_start_and_completion_events() {
        let events = Arc::new(RecordedEvents::default());
        let ctx = ExplorationContext::new("p1", Arc::new(InMemoryRegistry::new()))
            .with_events(events.clone());

        NetworkExplorer::new()
            .explore(&scan(&[web_host("10.0.0.20")]), &ctx)
            .await
            .unwrap();

        assert_eq!(
            *events.names.lock().unwrap(),
            vec!["scan_start".to_string(), "module_complete".to_string()]
        );
    }

    #[tokio::test]
    async fn progress_reports_each_host() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let explorer = NetworkExplorer::new().with_progress(move |count, ip| {
            sink.lock().unwrap().push((count, ip.to_string()));
        });
        let ctx = ExplorationContext::new("p1", Arc::new(InMemoryRegistry::new()));

        explorer
            .explore(&scan(&[web_host("10.0.0.20"), web_host("10.0.0.21")]), &ctx)
            .await
            .unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![(1, "10.0.0.20".to_string()), (2, "10.0.0.21".to_string())]
        );
    }
}
