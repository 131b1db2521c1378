use super::DomainId;

pub const OPEN_STATE: &str = "open";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortRecord {
    pub port_id: u16,
    pub protocol: String,
    pub state: String,
    pub service_name: Option<String>,
    pub service_product: Option<String>,
    pub service_extra_info: Option<String>,
}

impl PortRecord {
    pub fn new(port_id: u16, state: impl Into<String>) -> Self {
        Self {
            port_id,
            protocol: String::from("tcp"),
            state: state.into(),
            service_name: None,
            service_product: None,
            service_extra_info: None,
        }
    }

    pub fn with_service(mut self, name: impl Into<String>) -> Self {
        self.service_name = Some(name.into());
        self
    }

    pub fn with_product(mut self, product: impl Into<String>) -> Self {
        self.service_product = Some(product.into());
        self
    }

    /// Only the exact state `"open"` counts; `open|filtered` does not.
    pub fn is_open(&self) -> bool {
        self.state == OPEN_STATE
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostRecord {
    pub ip: String,
    pub hostname: Option<String>,
    pub domain_ref: Option<DomainId>,
    pub ports: Vec<PortRecord>,
}

impl HostRecord {
    pub fn new(ip: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            hostname: None,
            domain_ref: None,
            ports: Vec::new(),
        }
    }

    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    pub fn with_ports(mut self, ports: Vec<PortRecord>) -> Self {
        self.ports = ports;
        self
    }

    pub fn open_ports(&self) -> impl Iterator<Item = &PortRecord> {
        self.ports.iter().filter(|port| port.is_open())
    }

    /// Hostname when known, otherwise the address.
    pub fn display_name(&self) -> &str {
        self.hostname.as_deref().unwrap_or(&self.ip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_exact_open_state_counts() {
        assert!(PortRecord::new(80, "open").is_open());
        assert!(!PortRecord::new(80, "open|filtered").is_open());
        assert!(!PortRecord::new(80, "closed").is_open());
    }

    #[test]
    fn open_ports_keep_document_order() {
        let host = HostRecord::new("10.0.0.5").with_ports(vec![
            PortRecord::new(443, "open"),
            PortRecord::new(22, "closed"),
            PortRecord::new(80, "open"),
        ]);
        let ids: Vec<u16> = host.open_ports().map(|p| p.port_id).collect();
        assert_eq!(ids, vec![443, 80]);
    }

    #[test]
    fn display_name_falls_back_to_address() {
        assert_eq!(HostRecord::new("10.0.0.5").display_name(), "10.0.0.5");
        assert_eq!(
            HostRecord::new("10.0.0.5").with_hostname("dc01").display_name(),
            "dc01"
        );
    }
}
