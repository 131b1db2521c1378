use adscout_core::controller::DomainControllerClassifier;
use adscout_core::evidence::EvidenceLocator;
use adscout_core::scan::{ScanDocument, ScanResult};

use super::corp_scan;

fn document() -> ScanDocument {
    corp_scan().document().expect("fixture report parses")
}

#[test]
fn kerberos_host_takes_the_fast_path() {
    let verdict = DomainControllerClassifier::new().classify(&document(), "10.0.0.10");

    assert!(verdict.is_controller);
    assert!(verdict.matched_fast_path);
}

#[test]
fn global_catalog_alone_scores_one() {
    let verdict = DomainControllerClassifier::new().classify(&document(), "10.0.0.12");

    assert!(!verdict.is_controller);
    assert!(!verdict.matched_fast_path);
    assert_eq!(verdict.match_count, 1);
}

#[test]
fn unknown_address_is_not_a_controller() {
    let verdict = DomainControllerClassifier::new().classify(&document(), "10.9.9.9");

    assert!(!verdict.is_controller);
    assert_eq!(verdict.match_count, 0);
}

#[test]
fn evidence_queries_are_scoped_to_one_host() {
    let doc = document();

    assert_eq!(doc.count(&EvidenceLocator::new("10.0.0.20").open_port(80)), 1);
    assert_eq!(doc.count(&EvidenceLocator::new("10.0.0.20").open_port(22)), 0);
    assert_eq!(doc.count(&EvidenceLocator::new("10.0.0.11").open_service("ldap")), 3);
    assert!(doc.find_one(&EvidenceLocator::new("10.0.0.30").cert_san_dns(636)).is_some());
    assert!(doc.find_one(&EvidenceLocator::new("10.0.0.12").cert_common_name(3269)).is_none());
}
