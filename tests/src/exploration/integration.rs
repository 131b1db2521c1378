use std::sync::Arc;

use adscout_common::context::ExplorationContext;
use adscout_common::error::{ExplorationError, InputError, RecordKind};
use adscout_common::topology::domain::DomainSource;
use adscout_core::explorer::{NetworkExplorer, PassSummary};
use adscout_core::registry::{InMemoryRegistry, Placement};

use super::corp_scan;

async fn run(registry: Arc<InMemoryRegistry>, project: &str) -> PassSummary {
    let ctx = ExplorationContext::new(project, registry);
    NetworkExplorer::new()
        .explore(&corp_scan(), &ctx)
        .await
        .expect("fixture report parses")
}

fn domain_of<'a>(summary: &'a PassSummary, ip: &str) -> Option<(&'a str, DomainSource)> {
    summary
        .hosts
        .iter()
        .find(|host| host.ip == ip)
        .and_then(|host| host.domain.as_ref())
        .map(|domain| (domain.name.as_str(), domain.source))
}

#[tokio::test]
async fn full_pass_registers_every_host() {
    let registry = Arc::new(InMemoryRegistry::new());

    let summary = run(registry.clone(), "engagement-7").await;

    assert_eq!(summary.hosts.len(), 5);
    assert_eq!(summary.failures().count(), 0);
    assert_eq!(registry.hosts().len(), 5);

    let ips: Vec<&str> = summary.hosts.iter().map(|host| host.ip.as_str()).collect();
    assert_eq!(ips, vec!["10.0.0.10", "10.0.0.11", "10.0.0.12", "10.0.0.20", "10.0.0.30"]);
}

#[tokio::test]
async fn each_strategy_resolves_its_host() {
    let summary = run(Arc::new(InMemoryRegistry::new()), "engagement-7").await;

    assert_eq!(domain_of(&summary, "10.0.0.10"), Some(("corp.local", DomainSource::LdapExtraInfo)));
    assert_eq!(domain_of(&summary, "10.0.0.11"), Some(("corp.local", DomainSource::CertCommonName)));
    assert_eq!(domain_of(&summary, "10.0.0.12"), Some(("lab.local", DomainSource::CertIssuerDc)));
    assert_eq!(domain_of(&summary, "10.0.0.20"), None);
    assert_eq!(domain_of(&summary, "10.0.0.30"), Some(("branch.corp", DomainSource::CertSanDns)));
}

#[tokio::test]
async fn domains_are_scoped_to_the_project_and_registered_once() {
    let registry = Arc::new(InMemoryRegistry::new());

    run(registry.clone(), "engagement-7").await;

    let domains = registry.domains();
    let names: Vec<&str> = domains.iter().map(|d| d.record.name.as_str()).collect();
    assert_eq!(names, vec!["corp.local", "lab.local", "branch.corp"]);
    assert!(domains.iter().all(|d| d.project_id == "engagement-7"));

    let hosts = registry.hosts();
    assert_eq!(hosts[0].placement, Placement::Domain(domains[0].id.clone()));
    assert_eq!(hosts[1].placement, hosts[0].placement);
}

#[tokio::test]
async fn undetermined_host_lands_in_the_unknown_domain() {
    let registry = Arc::new(InMemoryRegistry::new());

    run(registry.clone(), "engagement-7").await;

    let intranet = registry
        .hosts()
        .into_iter()
        .find(|host| host.record.ip == "10.0.0.20")
        .unwrap();
    assert_eq!(
        intranet.placement,
        Placement::UnknownDomain {
            project_id: "engagement-7".into()
        }
    );
    assert_eq!(intranet.record.hostname.as_deref(), Some("intranet"));
}

#[tokio::test]
async fn only_open_ports_become_services() {
    let registry = Arc::new(InMemoryRegistry::new());

    let summary = run(registry.clone(), "engagement-7").await;

    let intranet = summary.hosts.iter().find(|host| host.ip == "10.0.0.20").unwrap();
    let host_id = intranet.host_id.clone().unwrap();
    let ports: Vec<u16> = registry
        .services_of(&host_id)
        .iter()
        .map(|service| service.record.port)
        .collect();
    assert_eq!(ports, vec![80, 443]);

    let expected: usize = summary
        .hosts
        .iter()
        .filter_map(|host| host.record.as_ref())
        .map(|record| record.open_ports().count())
        .sum();
    assert_eq!(registry.services().len(), expected);
}

#[tokio::test]
async fn controllers_are_flagged() {
    let summary = run(Arc::new(InMemoryRegistry::new()), "engagement-7").await;

    let controllers: Vec<&str> = summary.controllers().map(|host| host.ip.as_str()).collect();
    assert_eq!(controllers, vec!["10.0.0.10", "10.0.0.11"]);
}

#[tokio::test]
async fn rejected_domain_only_costs_its_host() {
    let registry = Arc::new(InMemoryRegistry::new().reject_domain("lab.local"));

    let summary = run(registry.clone(), "engagement-7").await;

    let failures: Vec<_> = summary.failures().collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].ip, "10.0.0.12");
    assert!(matches!(
        failures[0].error,
        Some(ExplorationError::Registration { kind: RecordKind::Domain, .. })
    ));
    assert_eq!(registry.hosts().len(), 4);
    assert!(registry.hosts().iter().all(|host| host.record.ip != "10.0.0.12"));
}

#[tokio::test]
async fn rejected_service_keeps_the_host() {
    let registry = Arc::new(InMemoryRegistry::new().reject_service_port(80));

    let summary = run(registry.clone(), "engagement-7").await;

    let failed: Vec<&str> = summary.failures().map(|host| host.ip.as_str()).collect();
    assert_eq!(failed, vec!["10.0.0.12", "10.0.0.20"]);
    assert!(summary.failures().all(|host| matches!(
        host.error,
        Some(ExplorationError::Registration { kind: RecordKind::Service, .. })
    )));
    assert_eq!(registry.hosts().len(), 5);
}

#[tokio::test]
async fn blank_project_registers_nothing() {
    let registry = Arc::new(InMemoryRegistry::new());

    let summary = run(registry.clone(), "  ").await;

    assert_eq!(summary.failures().count(), 5);
    assert!(summary.hosts.iter().all(|host| {
        host.error == Some(ExplorationError::Input(InputError::MissingProject))
    }));
    assert!(registry.domains().is_empty());
    assert!(registry.hosts().is_empty());
}
