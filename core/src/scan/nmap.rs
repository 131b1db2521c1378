//! Typed subset of the nmap XML report format.
//!
//! Only the elements the inference core reads are modelled; everything else in the
//! report (`status`, `extraports`, `os`, `times`, ...) is skipped by the deserializer.

use serde::Deserialize;

use adscout_common::topology::host::{HostRecord, OPEN_STATE, PortRecord};

pub const SSL_CERT_SCRIPT: &str = "ssl-cert";

#[derive(Debug, Default, Deserialize)]
pub struct NmapRun {
    #[serde(rename = "host", default)]
    pub hosts: Vec<ScanHost>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ScanHost {
    #[serde(rename = "address", default)]
    pub addresses: Vec<Address>,
    #[serde(default)]
    pub hostnames: Option<Hostnames>,
    #[serde(default)]
    pub ports: Option<Ports>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Address {
    #[serde(rename = "@addr")]
    pub addr: String,
    #[serde(rename = "@addrtype", default)]
    pub addr_type: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct Hostnames {
    #[serde(rename = "hostname", default)]
    pub hostnames: Vec<Hostname>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Hostname {
    #[serde(rename = "@name")]
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct Ports {
    #[serde(rename = "port", default)]
    pub ports: Vec<ScanPort>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ScanPort {
    #[serde(rename = "@protocol", default)]
    pub protocol: String,
    #[serde(rename = "@portid")]
    pub portid: u16,
    #[serde(default)]
    pub state: Option<PortState>,
    #[serde(default)]
    pub service: Option<ScanService>,
    #[serde(rename = "script", default)]
    pub scripts: Vec<Script>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PortState {
    #[serde(rename = "@state")]
    pub state: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ScanService {
    #[serde(rename = "@name", default)]
    pub name: String,
    #[serde(rename = "@product", default)]
    pub product: Option<String>,
    #[serde(rename = "@extrainfo", default)]
    pub extrainfo: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Script {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "@output", default)]
    pub output: String,
    #[serde(rename = "table", default)]
    pub tables: Vec<Table>,
    #[serde(rename = "elem", default)]
    pub elems: Vec<Elem>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Table {
    #[serde(rename = "@key", default)]
    pub key: Option<String>,
    #[serde(rename = "table", default)]
    pub tables: Vec<Table>,
    #[serde(rename = "elem", default)]
    pub elems: Vec<Elem>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Elem {
    #[serde(rename = "@key", default)]
    pub key: Option<String>,
    #[serde(rename = "$text", default)]
    pub value: String,
}

/// Shared navigation over the `table`/`elem` tree nmap scripts emit.
pub trait ScriptTree {
    fn tables(&self) -> &[Table];
    fn elems(&self) -> &[Elem];

    fn tables_keyed<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Table> + 'a {
        self.tables()
            .iter()
            .filter(move |table| table.key.as_deref() == Some(key))
    }

    fn elems_keyed<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Elem> + 'a {
        self.elems()
            .iter()
            .filter(move |elem| elem.key.as_deref() == Some(key))
    }
}

impl ScriptTree for Script {
    fn tables(&self) -> &[Table] {
        &self.tables
    }

    fn elems(&self) -> &[Elem] {
        &self.elems
    }
}

impl ScriptTree for Table {
    fn tables(&self) -> &[Table] {
        &self.tables
    }

    fn elems(&self) -> &[Elem] {
        &self.elems
    }
}

impl ScanHost {
    pub fn has_address(&self, ip: &str) -> bool {
        self.addresses.iter().any(|address| address.addr == ip)
    }

    /// First listed address. nmap lists the IP before the MAC address.
    pub fn primary_address(&self) -> Option<&str> {
        self.addresses.first().map(|address| address.addr.as_str())
    }

    pub fn hostname(&self) -> Option<&str> {
        self.hostnames
            .as_ref()
            .and_then(|names| names.hostnames.first())
            .map(|hostname| hostname.name.as_str())
            .filter(|name| !name.is_empty())
    }

    pub fn ports(&self) -> &[ScanPort] {
        self.ports
            .as_ref()
            .map(|ports| ports.ports.as_slice())
            .unwrap_or_default()
    }

    pub fn open_ports(&self) -> impl Iterator<Item = &ScanPort> {
        self.ports().iter().filter(|port| port.is_open())
    }

    pub fn to_record(&self, ip: &str) -> HostRecord {
        let record = HostRecord::new(ip).with_ports(self.ports().iter().map(ScanPort::to_record).collect());
        match self.hostname() {
            Some(hostname) => record.with_hostname(hostname),
            None => record,
        }
    }
}

impl ScanPort {
    pub fn state(&self) -> &str {
        self.state.as_ref().map(|s| s.state.as_str()).unwrap_or_default()
    }

    pub fn is_open(&self) -> bool {
        self.state() == OPEN_STATE
    }

    pub fn service_name(&self) -> Option<&str> {
        self.service.as_ref().map(|service| service.name.as_str())
    }

    pub fn has_service(&self, name: &str) -> bool {
        self.service_name() == Some(name)
    }

    pub fn scripts_with_id<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Script> + 'a {
        self.scripts.iter().filter(move |script| script.id == id)
    }

    pub fn to_record(&self) -> PortRecord {
        let service = self.service.as_ref();
        PortRecord {
            port_id: self.portid,
            protocol: self.protocol.clone(),
            state: self.state().to_string(),
            service_name: service.map(|s| s.name.clone()).filter(|name| !name.is_empty()),
            service_product: service.and_then(|s| s.product.clone()),
            service_extra_info: service.and_then(|s| s.extrainfo.clone()),
        }
    }
}
