mod classification;
mod integration;

use adscout_core::scan::NmapScanResult;

pub const CORP_REPORT: &str = include_str!("../fixtures/corp_scan.xml");

pub fn corp_scan() -> NmapScanResult {
    NmapScanResult::from_xml(CORP_REPORT)
}
