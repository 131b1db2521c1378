use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use colored::*;

use crate::{mprint, terminal::{colors, format, print, spinner}};
use adscout_common::{config::Config, context::ExplorationContext, error, success, warn};
use adscout_core::explorer::{HostOutcome, NetworkExplorer, PassSummary};
use adscout_core::registry::InMemoryRegistry;
use adscout_core::scan::NmapScanResult;

pub async fn infer(report: &Path, project: &str, cfg: &Config) -> anyhow::Result<()> {
    let scan = NmapScanResult::from_path(report)
        .with_context(|| format!("failed to read {}", report.display()))?;

    let registry = Arc::new(InMemoryRegistry::new());
    let ctx = ExplorationContext::new(project, registry.clone());
    ctx.validate()?;

    let explorer = NetworkExplorer::new().with_progress(spinner::report_progress);

    spinner::start("Exploring scan report...");
    let start_time: Instant = Instant::now();
    let result = explorer.explore(&scan, &ctx).await;
    spinner::finish();

    let summary: PassSummary =
        result.with_context(|| format!("{} is not a readable nmap report", report.display()))?;

    inference_ends(&summary, start_time.elapsed(), cfg);
    Ok(())
}

fn inference_ends(summary: &PassSummary, total_time: Duration, cfg: &Config) {
    if summary.hosts.is_empty() {
        print::header("zero hosts in report", cfg.quiet);
        print::no_results();
        return;
    }

    if cfg.quiet > 0 {
        mprint!();
    }

    print::header("hosts", cfg.quiet);
    print_hosts(&summary.hosts, cfg);

    if !summary.domains.is_empty() {
        mprint!();
        print::header("domains", cfg.quiet);
        print_domains(summary, cfg);
    }

    for failed in summary.failures() {
        if let Some(e) = &failed.error {
            error!("{} could not be registered: {}", failed.ip, e);
        }
    }

    print_summary(summary, total_time, cfg);
}

fn print_hosts(hosts: &[HostOutcome], cfg: &Config) {
    if cfg.quiet > 1 {
        return;
    }
    for (idx, host) in hosts.iter().enumerate() {
        let name: &str = host
            .record
            .as_ref()
            .map(|record| record.display_name())
            .unwrap_or(host.ip.as_str());
        print::tree_head(idx, name);
        print::as_tree_one_level(format::outcome_to_key_value_pair(host));
        if idx + 1 != hosts.len() {
            mprint!();
        }
    }
}

fn print_domains(summary: &PassSummary, cfg: &Config) {
    if cfg.quiet > 1 {
        return;
    }
    let key_width: usize = summary
        .domains
        .iter()
        .map(|(_, record)| record.name.len())
        .max()
        .unwrap_or_default();

    for (id, record) in &summary.domains {
        let controllers: Vec<&str> = summary
            .controllers()
            .filter(|host| {
                host.record
                    .as_ref()
                    .and_then(|r| r.domain_ref.as_ref())
                    .is_some_and(|domain| domain == id)
            })
            .map(|host| host.ip.as_str())
            .collect();

        let value: ColoredString = if controllers.is_empty() {
            format!("{id}, no controller seen").color(colors::TEXT_DEFAULT)
        } else {
            format!("{id}, controllers {}", controllers.join(", ")).color(colors::CONTROLLER)
        };
        print::aligned_line(&record.name, value, key_width);
    }

    let unplaced = summary
        .hosts
        .iter()
        .filter(|host| host.is_ok() && host.domain.is_none())
        .count();
    if unplaced > 0 {
        warn!("{unplaced} hosts placed under the unknown domain");
    }
}

fn print_summary(summary: &PassSummary, total_time: Duration, cfg: &Config) {
    let hosts: ColoredString = format!("{} hosts", summary.hosts.len()).bold().green();
    let domains: ColoredString = format!("{} domains", summary.domains.len()).bold().green();
    let controllers: ColoredString =
        format!("{} controllers", summary.controllers().count()).bold().red();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let output: ColoredString =
        format!("Inference Complete: {hosts}, {domains}, {controllers} in {total_time}")
            .color(colors::TEXT_DEFAULT);

    match cfg.quiet {
        0 => {
            print::fat_separator();
            print::centerln(&output);
        }
        _ => {
            mprint!();
            success!("{}", output);
        }
    }
}
