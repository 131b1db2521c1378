//! Access to a finished scan result.
//!
//! Running the scan tool is somebody else's job; by the time anything in this crate
//! sees a result it is final. [`ScanResult`] is the accessor contract the explorer
//! consumes, [`NmapScanResult`] its implementation for nmap XML output.

mod document;
pub mod nmap;

use std::path::Path;

use adscout_common::error::ParseError;

pub use document::{Node, ScanDocument};

pub trait ScanResult {
    /// Raw tool output the document is built from.
    fn raw_output(&self) -> &str;

    /// Parses the raw output into a queryable document.
    fn document(&self) -> Result<ScanDocument, ParseError>;
}

#[derive(Debug, Clone)]
pub struct NmapScanResult {
    raw: String,
}

impl NmapScanResult {
    pub fn from_xml(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// Loads a report written with `nmap -oX`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ParseError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ParseError::new(format!("reading {}: {e}", path.display())))?;
        Ok(Self::from_xml(raw))
    }
}

impl ScanResult for NmapScanResult {
    fn raw_output(&self) -> &str {
        &self.raw
    }

    fn document(&self) -> Result<ScanDocument, ParseError> {
        ScanDocument::parse(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_path_keeps_the_raw_report() {
        let path = std::env::temp_dir().join(format!("adscout-scan-{}.xml", std::process::id()));
        let xml = r#"<nmaprun><host><address addr="10.0.0.10" addrtype="ipv4"/></host></nmaprun>"#;
        std::fs::write(&path, xml).unwrap();

        let scan = NmapScanResult::from_path(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(scan.raw_output(), xml);
        assert_eq!(scan.document().unwrap().hosts().len(), 1);
    }

    #[test]
    fn missing_file_is_a_parse_error() {
        let err = NmapScanResult::from_path("/nonexistent/adscout/report.xml").unwrap_err();
        assert!(err.message().starts_with("reading /nonexistent/adscout/report.xml"));
    }
}
