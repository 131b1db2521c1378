//! Queryable, immutable view over a parsed scan report.
//!
//! Evaluates the typed [`Query`] values built by [`crate::evidence::EvidenceLocator`]
//! with a plain walk over the report tree. Every selector keeps the predicate
//! semantics of its rendered expression: attribute equality on `address@addr`,
//! `port@portid`, `service@name`, `table@key` and `elem@key`, plus the nested
//! `state@state = 'open'` filter.

use adscout_common::error::ParseError;

use super::nmap::{NmapRun, SSL_CERT_SCRIPT, ScanHost, ScanPort, Script, ScriptTree};
use crate::evidence::{
    AD_HINT_SERVICES, AD_HINT_THRESHOLD, KERBEROS_PORT, LDAP_SERVICE, Query, Selector,
};

const SAN_DNS_MARKER: &str = "DNS:";

/// A node matched by a query.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Host(&'a ScanHost),
    Port(&'a ScanPort),
    Text(&'a str),
}

impl<'a> Node<'a> {
    /// Text content of a value node, trimmed. Host and port nodes carry none.
    pub fn text(&self) -> Option<&'a str> {
        match self {
            Node::Text(text) => Some(text.trim()),
            _ => None,
        }
    }

    pub fn as_port(&self) -> Option<&'a ScanPort> {
        match self {
            Node::Port(port) => Some(port),
            _ => None,
        }
    }

    pub fn as_host(&self) -> Option<&'a ScanHost> {
        match self {
            Node::Host(host) => Some(host),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct ScanDocument {
    run: NmapRun,
}

impl ScanDocument {
    pub fn parse(xml: &str) -> Result<Self, ParseError> {
        let run: NmapRun =
            quick_xml::de::from_str(xml).map_err(|e| ParseError::new(e.to_string()))?;
        Ok(Self { run })
    }

    /// Hosts in document order.
    pub fn hosts(&self) -> &[ScanHost] {
        &self.run.hosts
    }

    /// First host listing `ip` among its addresses.
    pub fn host(&self, ip: &str) -> Option<&ScanHost> {
        self.run.hosts.iter().find(|host| host.has_address(ip))
    }

    pub fn find_one<'a>(&'a self, query: &'a Query) -> Option<Node<'a>> {
        self.select(query).next()
    }

    pub fn find_all<'a>(&'a self, query: &'a Query) -> Vec<Node<'a>> {
        self.select(query).collect()
    }

    pub fn count(&self, query: &Query) -> usize {
        self.select(query).count()
    }

    /// Lazily yields every node matched by `query`, in document order.
    pub fn select<'a>(&'a self, query: &'a Query) -> Box<dyn Iterator<Item = Node<'a>> + 'a> {
        let hosts = self.hosts_with_address(query.ip());

        match query.selector() {
            Selector::Host => Box::new(hosts.map(Node::Host)),
            Selector::Port(id) => Box::new(
                hosts
                    .flat_map(move |host| ports_with_id(host, id))
                    .map(Node::Port),
            ),
            Selector::OpenPort(id) => Box::new(
                hosts
                    .flat_map(move |host| ports_with_id(host, id))
                    .filter(|port| port.is_open())
                    .map(Node::Port),
            ),
            Selector::OpenService(name) => Box::new(
                hosts
                    .flat_map(ScanHost::open_ports)
                    .filter(move |port| port.has_service(name))
                    .map(Node::Port),
            ),
            Selector::LdapExtraInfo(id) => Box::new(
                hosts
                    .flat_map(move |host| ports_with_id(host, id))
                    .filter_map(|port| port.service.as_ref())
                    .filter(|service| service.name == LDAP_SERVICE)
                    .filter_map(|service| service.extrainfo.as_deref())
                    .map(Node::Text),
            ),
            Selector::CertCommonName(id) => Box::new(
                certificates(hosts, id)
                    .flat_map(|script| script.tables_keyed("subject"))
                    .flat_map(|table| table.elems_keyed("commonName"))
                    .map(|elem| Node::Text(&elem.value)),
            ),
            Selector::CertIssuerDc(id) => Box::new(
                certificates(hosts, id)
                    .flat_map(|script| script.tables_keyed("issuer"))
                    .flat_map(|table| table.elems_keyed("domainComponent"))
                    .map(|elem| Node::Text(&elem.value)),
            ),
            Selector::CertSanDns(id) => Box::new(
                certificates(hosts, id)
                    .flat_map(|script| script.tables_keyed("extensions"))
                    .flat_map(|extensions| extensions.tables.iter())
                    .flat_map(|extension| extension.elems.iter())
                    .filter(|elem| elem.value.contains(SAN_DNS_MARKER))
                    .flat_map(|elem| san_dns_entries(&elem.value))
                    .map(Node::Text),
            ),
            Selector::DomainControllerHint => {
                Box::new(hosts.filter(|host| has_dc_hint(host)).map(Node::Host))
            }
        }
    }

    fn hosts_with_address<'a>(&'a self, ip: &'a str) -> impl Iterator<Item = &'a ScanHost> + 'a {
        self.run
            .hosts
            .iter()
            .filter(move |host| host.has_address(ip))
    }
}

fn ports_with_id(host: &ScanHost, id: u16) -> impl Iterator<Item = &ScanPort> {
    host.ports().iter().filter(move |port| port.portid == id)
}

fn certificates<'a>(
    hosts: impl Iterator<Item = &'a ScanHost> + 'a,
    id: u16,
) -> impl Iterator<Item = &'a Script> + 'a {
    hosts
        .flat_map(move |host| ports_with_id(host, id))
        .flat_map(|port| port.scripts_with_id(SSL_CERT_SCRIPT))
}

/// Splits a SAN value such as `DNS:dc01.corp.local, DNS:corp.local, IP:10.0.0.1`
/// into its `DNS:` entries, prefix kept.
fn san_dns_entries(value: &str) -> impl Iterator<Item = &str> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| entry.starts_with(SAN_DNS_MARKER))
}

fn has_dc_hint(host: &ScanHost) -> bool {
    let kerberos_open = host.open_ports().any(|port| port.portid == KERBEROS_PORT);
    let ad_services = host
        .open_ports()
        .filter(|port| {
            AD_HINT_SERVICES
                .iter()
                .any(|service| port.has_service(service))
        })
        .count();

    kerberos_open || ad_services >= AD_HINT_THRESHOLD
}
