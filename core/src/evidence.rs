//! Evidence locator.
//!
//! Pure constructors for the typed queries the inference core runs against a
//! [`crate::scan::ScanDocument`]. Nothing here touches the document; a malformed
//! address simply produces a query that matches nothing.
//!
//! Each [`Query`] renders as its canonical XPath-style expression, which is what ends
//! up in debug logs:
//!
//! ```
//! use adscout_core::evidence::EvidenceLocator;
//!
//! let query = EvidenceLocator::new("10.0.0.10").cert_common_name(636);
//! assert_eq!(
//!     query.to_string(),
//!     "//host[address/@addr='10.0.0.10']/ports/port[@portid='636']\
//!      /script[@id='ssl-cert']/table[@key='subject']/elem[@key='commonName']"
//! );
//! ```

use std::fmt;

pub const KERBEROS_PORT: u16 = 88;
pub const LDAP_SERVICE: &str = "ldap";

/// Service names counted by the domain-controller hint.
pub const AD_HINT_SERVICES: [&str; 3] = ["ldap", "kerberos", "microsoft-ds"];
pub const AD_HINT_THRESHOLD: usize = 3;

const OPEN_PREDICATE: &str = "state/@state='open'";
const SSL_CERT_PATH: &str = "script[@id='ssl-cert']";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    Host,
    Port(u16),
    OpenPort(u16),
    OpenService(&'static str),
    LdapExtraInfo(u16),
    CertCommonName(u16),
    CertSanDns(u16),
    CertIssuerDc(u16),
    /// Port 88 open, or at least three open ports exposing an AD service.
    DomainControllerHint,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    ip: String,
    selector: Selector,
}

impl Query {
    pub fn ip(&self) -> &str {
        &self.ip
    }

    pub fn selector(&self) -> Selector {
        self.selector
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let host = format!("//host[address/@addr='{}']", self.ip);
        let port = |id: u16| format!("{host}/ports/port[@portid='{id}']");

        match self.selector {
            Selector::Host => write!(f, "{host}"),
            Selector::Port(id) => write!(f, "{}", port(id)),
            Selector::OpenPort(id) => {
                write!(f, "{host}/ports/port[@portid='{id}' and {OPEN_PREDICATE}]")
            }
            Selector::OpenService(name) => {
                write!(f, "{host}/ports/port[{OPEN_PREDICATE}]/service[@name='{name}']")
            }
            Selector::LdapExtraInfo(id) => {
                write!(f, "{}/service[@name='{LDAP_SERVICE}']/@extrainfo", port(id))
            }
            Selector::CertCommonName(id) => write!(
                f,
                "{}/{SSL_CERT_PATH}/table[@key='subject']/elem[@key='commonName']",
                port(id)
            ),
            Selector::CertSanDns(id) => write!(
                f,
                "{}/{SSL_CERT_PATH}/table[@key='extensions']/table/elem[contains(., 'DNS:')]",
                port(id)
            ),
            Selector::CertIssuerDc(id) => write!(
                f,
                "{}/{SSL_CERT_PATH}/table[@key='issuer']/elem[@key='domainComponent']",
                port(id)
            ),
            Selector::DomainControllerHint => {
                let services: Vec<String> = AD_HINT_SERVICES
                    .iter()
                    .map(|name| format!("service/@name='{name}'"))
                    .collect();
                write!(
                    f,
                    "{host}[ports/port[{OPEN_PREDICATE}][@portid='{KERBEROS_PORT}'] or \
                     count(ports/port[{OPEN_PREDICATE}][{}]) >= {AD_HINT_THRESHOLD}]",
                    services.join(" or ")
                )
            }
        }
    }
}

/// Builds queries scoped to a single host address.
#[derive(Debug, Clone)]
pub struct EvidenceLocator {
    ip: String,
}

impl EvidenceLocator {
    pub fn new(ip: impl Into<String>) -> Self {
        Self { ip: ip.into() }
    }

    pub fn ip(&self) -> &str {
        &self.ip
    }

    fn query(&self, selector: Selector) -> Query {
        Query {
            ip: self.ip.clone(),
            selector,
        }
    }

    pub fn host(&self) -> Query {
        self.query(Selector::Host)
    }

    pub fn port(&self, port_id: u16) -> Query {
        self.query(Selector::Port(port_id))
    }

    pub fn open_port(&self, port_id: u16) -> Query {
        self.query(Selector::OpenPort(port_id))
    }

    pub fn open_service(&self, service: &'static str) -> Query {
        self.query(Selector::OpenService(service))
    }

    pub fn ldap_extra_info(&self, port_id: u16) -> Query {
        self.query(Selector::LdapExtraInfo(port_id))
    }

    pub fn cert_common_name(&self, port_id: u16) -> Query {
        self.query(Selector::CertCommonName(port_id))
    }

    /// Matches each `DNS:` entry of the certificate's SAN extension separately.
    pub fn cert_san_dns(&self, port_id: u16) -> Query {
        self.query(Selector::CertSanDns(port_id))
    }

    pub fn cert_issuer_dc(&self, port_id: u16) -> Query {
        self.query(Selector::CertIssuerDc(port_id))
    }

    pub fn domain_controller_hint(&self) -> Query {
        self.query(Selector::DomainControllerHint)
    }
}
