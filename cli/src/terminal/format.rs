use adscout_core::controller::DcVerdict;
use adscout_core::explorer::HostOutcome;
use colored::*;

use crate::terminal::colors;

pub fn outcome_to_key_value_pair(outcome: &HostOutcome) -> Vec<(String, ColoredString)> {
    let mut details: Vec<(String, ColoredString)> = Vec::new();

    details.push((
        String::from("IPv4"),
        outcome.ip.as_str().color(colors::IPV4_ADDR),
    ));

    if let Some(hostname) = outcome.record.as_ref().and_then(|r| r.hostname.as_deref()) {
        details.push((String::from("Name"), hostname.color(colors::TEXT_DEFAULT)));
    }

    let domain: ColoredString = match &outcome.domain {
        Some(domain) => format!(
            "{} {}",
            domain.name.color(colors::DOMAIN),
            format!("({})", domain.source).color(colors::SEPARATOR)
        )
        .normal(),
        None => "unknown".color(colors::SEPARATOR),
    };
    details.push((String::from("Domain"), domain));

    details.push((String::from("Role"), verdict_to_colored(&outcome.verdict)));

    if let Some(record) = &outcome.record {
        let open: Vec<String> = record
            .open_ports()
            .map(|port| match &port.service_name {
                Some(name) => format!("{}/{}", port.port_id, name),
                None => port.port_id.to_string(),
            })
            .collect();
        if !open.is_empty() {
            details.push((String::from("Services"), open.join(", ").color(colors::SERVICE)));
        }
    }

    if let Some(error) = &outcome.error {
        details.push((String::from("Error"), error.to_string().red()));
    }

    details
}

pub fn verdict_to_colored(verdict: &DcVerdict) -> ColoredString {
    if !verdict.is_controller {
        return format!("member ({} indicators)", verdict.match_count).color(colors::TEXT_DEFAULT);
    }
    if verdict.matched_fast_path {
        "domain controller (fast path)".color(colors::CONTROLLER).bold()
    } else {
        format!("domain controller ({} indicators)", verdict.match_count)
            .color(colors::CONTROLLER)
            .bold()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adscout_common::topology::domain::{DomainRecord, DomainSource};
    use adscout_common::topology::host::{HostRecord, PortRecord};

    fn outcome() -> HostOutcome {
        let verdict = DcVerdict {
            is_controller: true,
            match_count: 1,
            matched_fast_path: true,
        };
        let record = HostRecord::new("10.0.0.10").with_ports(vec![
            PortRecord::new(88, "open").with_service("kerberos"),
            PortRecord::new(22, "closed").with_service("ssh"),
        ]);
        HostOutcome {
            ip: "10.0.0.10".into(),
            record: Some(record),
            domain: Some(DomainRecord::new("corp.local", DomainSource::LdapExtraInfo)),
            host_id: None,
            services: Vec::new(),
            verdict,
            error: None,
        }
    }

    #[test]
    fn lists_only_open_services() {
        let details = outcome_to_key_value_pair(&outcome());
        let services = details.iter().find(|(key, _)| key == "Services").unwrap();
        let rendered = services.1.to_string();
        assert!(rendered.contains("88/kerberos"));
        assert!(!rendered.contains("ssh"));
    }

    #[test]
    fn keys_in_display_order() {
        let keys: Vec<String> = outcome_to_key_value_pair(&outcome())
            .into_iter()
            .map(|(key, _)| key)
            .collect();
        assert_eq!(keys, vec!["IPv4", "Domain", "Role", "Services"]);
    }

    #[test]
    fn fast_path_verdict_is_not_tied_to_kerberos() {
        let verdict = DcVerdict {
            is_controller: true,
            match_count: 0,
            matched_fast_path: true,
        };
        let label = verdict_to_colored(&verdict).to_string();
        assert!(label.contains("domain controller (fast path)"));
        assert!(!label.contains("kerberos"));
    }

    #[test]
    fn scored_verdict_shows_indicator_count() {
        let verdict = DcVerdict {
            is_controller: true,
            match_count: 3,
            matched_fast_path: false,
        };
        assert!(verdict_to_colored(&verdict).to_string().contains("(3 indicators)"));
    }
}
