//! # Domain Controller Classification
//!
//! Two tiers:
//!
//! 1. **Fast path**: the [`EvidenceLocator::domain_controller_hint`] query. Kerberos
//!    open, or three open ports exposing an LDAP, Kerberos or SMB service.
//! 2. **Fallback scoring**: one point per open port in [`DC_PORTS`] (Kerberos alone
//!    is decisive), plus one point per open port running a service in
//!    [`DC_SERVICES`]. Three points make a controller.

use tracing::debug;

use crate::evidence::{EvidenceLocator, KERBEROS_PORT};
use crate::scan::ScanDocument;

/// DNS, Kerberos, LDAP, SMB, kpasswd, LDAPS and both global catalog ports.
pub const DC_PORTS: [u16; 8] = [53, 88, 389, 445, 464, 636, 3268, 3269];
pub const DC_SERVICES: [&str; 3] = ["ldap", "kerberos", "msrpc"];
pub const DC_THRESHOLD: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DcVerdict {
    pub is_controller: bool,
    pub match_count: usize,
    pub matched_fast_path: bool,
}

impl DcVerdict {
    fn fast_path() -> Self {
        Self {
            is_controller: true,
            match_count: 0,
            matched_fast_path: true,
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DomainControllerClassifier;

impl DomainControllerClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(&self, doc: &ScanDocument, ip: &str) -> DcVerdict {
        let locator = EvidenceLocator::new(ip);

        if doc.find_one(&locator.domain_controller_hint()).is_some() {
            debug!(host = ip, "domain controller hint matched");
            return DcVerdict::fast_path();
        }

        let mut match_count: usize = 0;

        for port in DC_PORTS {
            if doc.find_one(&locator.open_port(port)).is_none() {
                continue;
            }
            match_count += 1;

            if port == KERBEROS_PORT {
                return DcVerdict {
                    is_controller: true,
                    match_count,
                    matched_fast_path: false,
                };
            }
        }

        for service in DC_SERVICES {
            match_count += doc.count(&locator.open_service(service));
        }

        debug!(host = ip, match_count, "domain controller score");
        DcVerdict {
            is_controller: match_count >= DC_THRESHOLD,
            match_count,
            matched_fast_path: false,
        }
    }
}
