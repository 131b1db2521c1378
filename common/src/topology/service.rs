use super::host::PortRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRecord {
    pub name: String,
    pub port: u16,
    pub protocol: String,
    pub product: Option<String>,
}

impl From<&PortRecord> for ServiceRecord {
    fn from(port: &PortRecord) -> Self {
        Self {
            name: port.service_name.clone().unwrap_or_default(),
            port: port.port_id,
            protocol: port.protocol.clone(),
            product: port.service_product.clone(),
        }
    }
}
