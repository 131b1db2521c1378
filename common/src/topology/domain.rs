use std::fmt;

/// Evidence source a domain name was extracted from, in descending confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomainSource {
    /// `Domain: X` in the extra-info of an LDAP service.
    LdapExtraInfo,
    /// Subject common name of a TLS certificate.
    CertCommonName,
    /// `DNS:` entry of a certificate's subject alternative names.
    CertSanDns,
    /// Issuer domain component of a certificate, suffixed with `.local`.
    CertIssuerDc,
}

impl DomainSource {
    pub fn label(&self) -> &'static str {
        match self {
            DomainSource::LdapExtraInfo => "ldap extra-info",
            DomainSource::CertCommonName => "certificate common name",
            DomainSource::CertSanDns => "certificate SAN DNS",
            DomainSource::CertIssuerDc => "certificate issuer DC",
        }
    }
}

impl fmt::Display for DomainSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainRecord {
    pub name: String,
    pub source: DomainSource,
}

impl DomainRecord {
    pub fn new(name: impl Into<String>, source: DomainSource) -> Self {
        Self {
            name: name.into(),
            source,
        }
    }
}
