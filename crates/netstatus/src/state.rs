//! Runtime state written by the network daemon.
//!
//! The daemon keeps one global state file and one file per interface in
//! environment-file syntax (`KEY=VALUE`, optional quotes, `#` and `;`
//! comments). List values are whitespace separated.

use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::path::Path;

use serde::{Serialize, Serializer};

use crate::netlink::error::Result;

/// Default runtime directory of the network daemon.
pub const NETIF_DIR: &str = "/run/systemd/netif";

/// Operational state of a link or of the whole system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationalState {
    Routable,
    Degraded,
    Other(String),
}

impl From<&str> for OperationalState {
    fn from(s: &str) -> Self {
        match s {
            "routable" => Self::Routable,
            "degraded" => Self::Degraded,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for OperationalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Routable => write!(f, "routable"),
            Self::Degraded => write!(f, "degraded"),
            Self::Other(s) => write!(f, "{}", s),
        }
    }
}

impl Serialize for OperationalState {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Configuration progress of a link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupState {
    Configured,
    Configuring,
    Failed,
    Linger,
    Other(String),
}

impl From<&str> for SetupState {
    fn from(s: &str) -> Self {
        match s {
            "configured" => Self::Configured,
            "configuring" => Self::Configuring,
            "failed" => Self::Failed,
            "linger" => Self::Linger,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for SetupState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configured => write!(f, "configured"),
            Self::Configuring => write!(f, "configuring"),
            Self::Failed => write!(f, "failed"),
            Self::Linger => write!(f, "linger"),
            Self::Other(s) => write!(f, "{}", s),
        }
    }
}

impl Serialize for SetupState {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Parse environment-file content.
pub fn parse_env(content: &str) -> BTreeMap<String, String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(['#', ';']))
        .filter_map(|line| {
            let (key, value) = line.split_once('=')?;
            let key = key.trim();
            if key.is_empty() {
                return None;
            }
            Some((key.to_string(), unquote(value.trim()).to_string()))
        })
        .collect()
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

/// Read an environment file; a missing file is `Ok(None)`.
pub fn read_env_file(path: &Path) -> Result<Option<BTreeMap<String, String>>> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(parse_env(&content))),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn list(values: &BTreeMap<String, String>, key: &str) -> Vec<String> {
    values
        .get(key)
        .map(|v| v.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

fn string(values: &BTreeMap<String, String>, key: &str) -> Option<String> {
    values.get(key).filter(|v| !v.is_empty()).cloned()
}

/// Global network state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SystemState {
    pub operational: Option<OperationalState>,
    pub dns: Vec<String>,
    pub ntp: Vec<String>,
    pub search_domains: Vec<String>,
    pub route_domains: Vec<String>,
}

impl SystemState {
    /// Load `<netif_dir>/state`. A missing file is `Ok(None)`.
    pub fn load(netif_dir: &Path) -> Result<Option<Self>> {
        let Some(values) = read_env_file(&netif_dir.join("state"))? else {
            return Ok(None);
        };
        Ok(Some(Self::from_values(&values)))
    }

    fn from_values(values: &BTreeMap<String, String>) -> Self {
        Self {
            operational: values.get("OPER_STATE").map(|s| s.as_str().into()),
            dns: list(values, "DNS"),
            ntp: list(values, "NTP"),
            search_domains: list(values, "DOMAINS"),
            route_domains: list(values, "ROUTE_DOMAINS"),
        }
    }
}

/// Per-link network state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LinkState {
    pub operational: Option<OperationalState>,
    pub setup: Option<SetupState>,
    pub dns: Vec<String>,
    pub ntp: Vec<String>,
    pub search_domains: Vec<String>,
    pub route_domains: Vec<String>,
    pub network_file: Option<String>,
    pub carrier_bound_to: Vec<String>,
    pub carrier_bound_by: Vec<String>,
    pub timezone: Option<String>,
}

impl LinkState {
    /// Load `<netif_dir>/links/<ifindex>`. A missing file is `Ok(None)`.
    pub fn load(netif_dir: &Path, ifindex: u32) -> Result<Option<Self>> {
        let path = netif_dir.join("links").join(ifindex.to_string());
        let Some(values) = read_env_file(&path)? else {
            return Ok(None);
        };
        Ok(Some(Self::from_values(&values)))
    }

    fn from_values(values: &BTreeMap<String, String>) -> Self {
        Self {
            operational: values.get("OPER_STATE").map(|s| s.as_str().into()),
            setup: values.get("ADMIN_STATE").map(|s| s.as_str().into()),
            dns: list(values, "DNS"),
            ntp: list(values, "NTP"),
            search_domains: list(values, "DOMAINS"),
            route_domains: list(values, "ROUTE_DOMAINS"),
            network_file: string(values, "NETWORK_FILE"),
            carrier_bound_to: list(values, "CARRIER_BOUND_TO"),
            carrier_bound_by: list(values, "CARRIER_BOUND_BY"),
            timezone: string(values, "TIMEZONE"),
        }
    }
}
