//! # Domain Inference
//!
//! Resolves the Active Directory domain of a host from scan evidence.
//!
//! Strategies run in a fixed order of decreasing confidence (see [`STRATEGY_ORDER`]).
//! Each strategy walks the directory-service ports in [`DIRECTORY_PORTS`] order and
//! the first non-empty extraction ends the whole search.
//!
//! | Strategy         | Evidence                         | Canonicalization                 |
//! |------------------|----------------------------------|----------------------------------|
//! | LDAP extra-info  | `Domain: X` in service extrainfo | cut at the first `.local0.` artifact |
//! | Certificate CN   | subject commonName               | drop the first label             |
//! | Certificate SAN  | `DNS:` entries                   | strip `DNS:`, drop first label   |
//! | Issuer DC        | issuer domainComponent           | append `.local`                  |
//!
//! The issuer fallback assumes a `.local` forest. That holds for lab networks and is
//! kept as a heuristic; it always yields a name once the node exists.

use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, info};

use adscout_common::context::{ExplorationContext, validate_host_input};
use adscout_common::error::{ExplorationError, RecordKind, Result};
use adscout_common::topology::DomainId;
use adscout_common::topology::domain::{DomainRecord, DomainSource};

use crate::evidence::{EvidenceLocator, Query};
use crate::scan::ScanDocument;

/// LDAP, LDAPS, global catalog and global catalog over TLS.
pub const DIRECTORY_PORTS: [u16; 4] = [389, 636, 3268, 3269];

pub const STRATEGY_ORDER: [DomainSource; 4] = [
    DomainSource::LdapExtraInfo,
    DomainSource::CertCommonName,
    DomainSource::CertSanDns,
    DomainSource::CertIssuerDc,
];

const LOCAL_SUFFIX: &str = ".local";
const LOCAL_ARTIFACT: &str = ".local0.";
const SAN_DNS_PREFIX: &str = "DNS:";

static DOMAIN_PATTERN: OnceLock<Regex> = OnceLock::new();

fn domain_pattern() -> &'static Regex {
    DOMAIN_PATTERN.get_or_init(|| {
        Regex::new(r"Domain:\s*([a-zA-Z0-9.-]+)").expect("domain pattern is a valid regex")
    })
}

/// Extracts `X` from a `Domain: X` fragment of nmap's LDAP extra-info.
///
/// nmap reports the domain with a trailing `0.` (`corp.local0.`). The name is cut
/// right after the `.local` of the first `.local0.`, dropping whatever follows it.
pub fn extract_domain_from_extrainfo(info: &str) -> Option<String> {
    let captured = domain_pattern().captures(info)?.get(1)?.as_str();
    let domain = match captured.find(LOCAL_ARTIFACT) {
        Some(at) => &captured[..at + LOCAL_SUFFIX.len()],
        None => captured,
    };
    (!domain.is_empty()).then(|| domain.to_string())
}

/// Everything after the first label of a fully-qualified name.
///
/// `dc01.corp.local` gives `corp.local`; a single label gives nothing.
pub fn extract_domain_from_fqdn(fqdn: &str) -> Option<&str> {
    fqdn.split_once('.')
        .map(|(_, domain)| domain)
        .filter(|domain| !domain.is_empty())
}

fn strategy_query(strategy: DomainSource, locator: &EvidenceLocator, port: u16) -> Query {
    match strategy {
        DomainSource::LdapExtraInfo => locator.ldap_extra_info(port),
        DomainSource::CertCommonName => locator.cert_common_name(port),
        DomainSource::CertSanDns => locator.cert_san_dns(port),
        DomainSource::CertIssuerDc => locator.cert_issuer_dc(port),
    }
}

fn canonicalize(strategy: DomainSource, evidence: &str) -> Option<String> {
    match strategy {
        DomainSource::LdapExtraInfo => extract_domain_from_extrainfo(evidence),
        DomainSource::CertCommonName => extract_domain_from_fqdn(evidence).map(str::to_string),
        DomainSource::CertSanDns => {
            let fqdn = evidence.strip_prefix(SAN_DNS_PREFIX).unwrap_or(evidence);
            extract_domain_from_fqdn(fqdn.trim()).map(str::to_string)
        }
        DomainSource::CertIssuerDc => Some(format!("{evidence}{LOCAL_SUFFIX}")),
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DomainInferenceEngine;

impl DomainInferenceEngine {
    pub fn new() -> Self {
        Self
    }

    /// Runs the strategy chain for the host at `ip`.
    ///
    /// `None` means the domain is undetermined, which is not an error.
    pub fn infer(&self, doc: &ScanDocument, ip: &str) -> Option<DomainRecord> {
        let locator = EvidenceLocator::new(ip);
        STRATEGY_ORDER
            .iter()
            .find_map(|&strategy| self.apply(strategy, doc, &locator))
    }

    fn apply(
        &self,
        strategy: DomainSource,
        doc: &ScanDocument,
        locator: &EvidenceLocator,
    ) -> Option<DomainRecord> {
        DIRECTORY_PORTS.iter().find_map(|&port| {
            let query = strategy_query(strategy, locator, port);
            let name = doc
                .select(&query)
                .filter_map(|node| node.text())
                .find_map(|evidence| canonicalize(strategy, evidence))?;

            debug!(host = locator.ip(), port, %strategy, %query, "domain evidence found: {name}");
            Some(DomainRecord::new(name, strategy))
        })
    }

    /// Infers the domain of `ip` and registers it under the caller's project.
    pub async fn resolve(
        &self,
        doc: &ScanDocument,
        ip: &str,
        ctx: &ExplorationContext,
    ) -> Result<Option<DomainId>> {
        validate_host_input(ip, ctx)?;

        let Some(domain) = self.infer(doc, ip) else {
            ctx.events()
                .info(&format!("Could not determine domain from scan results for host {ip}"));
            return Ok(None);
        };

        self.register(&domain, ip, ctx).await.map(Some)
    }

    /// Registers an inferred domain; `ip` is only used for reporting.
    pub async fn register(
        &self,
        domain: &DomainRecord,
        ip: &str,
        ctx: &ExplorationContext,
    ) -> Result<DomainId> {
        match ctx.registry().add_domain(ctx.project_id(), domain).await {
            Ok(id) => {
                info!(host = ip, domain = %domain.name, source = %domain.source, "domain registered");
                ctx.events().info(&format!(
                    "Created domain {} for host {ip} from {}",
                    domain.name, domain.source
                ));
                Ok(id)
            }
            Err(e) => {
                ctx.events().error(&format!(
                    "Error while creating domain {} for host {ip}: {e}",
                    domain.name
                ));
                Err(ExplorationError::registration(RecordKind::Domain, &domain.name, e))
            }
        }
    }
}
