use std::path::Path;

use anyhow::{Context, bail};
use colored::*;

use crate::terminal::{colors, format, print};
use adscout_common::{config::Config, success};
use adscout_core::controller::{DcVerdict, DomainControllerClassifier};
use adscout_core::inference::DomainInferenceEngine;
use adscout_core::scan::{NmapScanResult, ScanResult};

const KEY_WIDTH: usize = 10;

pub fn classify(report: &Path, host: &str, cfg: &Config) -> anyhow::Result<()> {
    if host.trim().is_empty() {
        bail!("a host address is required");
    }

    let doc = NmapScanResult::from_path(report)
        .and_then(|scan| scan.document())
        .with_context(|| format!("failed to load {}", report.display()))?;

    if doc.host(host).is_none() {
        bail!("{host} does not appear in {}", report.display());
    }

    let verdict: DcVerdict = DomainControllerClassifier::new().classify(&doc, host);
    let domain = DomainInferenceEngine::new().infer(&doc, host);

    if cfg.quiet > 1 {
        success!("{host}: {}", format::verdict_to_colored(&verdict));
        return Ok(());
    }

    print::aligned_line("Host", host.color(colors::IPV4_ADDR), KEY_WIDTH);
    let domain_value: ColoredString = match &domain {
        Some(domain) => format!("{} ({})", domain.name, domain.source).color(colors::DOMAIN),
        None => "unknown".color(colors::SEPARATOR),
    };
    print::aligned_line("Domain", domain_value, KEY_WIDTH);
    print::aligned_line("Fast path", yes_no(verdict.matched_fast_path), KEY_WIDTH);
    print::aligned_line("Indicators", verdict.match_count.to_string().normal(), KEY_WIDTH);
    print::aligned_line("Verdict", format::verdict_to_colored(&verdict), KEY_WIDTH);

    Ok(())
}

fn yes_no(flag: bool) -> ColoredString {
    if flag { "yes".green() } else { "no".color(colors::SEPARATOR) }
}
