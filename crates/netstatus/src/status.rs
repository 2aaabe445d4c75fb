//! Status aggregation.
//!
//! [`Reporter`] combines the kernel link, address, route and neighbor
//! tables with the hardware database, the LLDP logs, the network daemon's
//! state files and udev device data into report values for the `list`,
//! `status` and `lldp` requests.
//!
//! Every query is awaited before the next one is issued. Only a failing
//! link dump fails a request; everything else degrades to missing fields.

use std::net::IpAddr;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::device::{DeviceInfo, SYSFS_NET_DIR, UDEV_DATA_DIR};
use crate::gateway::describe_gateway;
use crate::hwdb::{HWDB_PATHS, HardwareDatabase, Hwdb};
use crate::links::{LinkRecord, decode_links, find_link, link_type_string};
use crate::lldp::{LldpLogReader, LldpNeighbor, lldp_log_path};
use crate::local::{local_addresses, local_gateways};
use crate::netlink::connection::RtnlDump;
use crate::netlink::error::{Error, Result};
use crate::netlink::family::AddressFamily;
use crate::netlink::parse::format_mac_addr;
use crate::oui::{VendorLookup, ieee_oui};
use crate::state::{LinkState, NETIF_DIR, OperationalState, SetupState, SystemState};

/// Where the reporter finds its on-disk inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusConfig {
    /// Prefix for the default hardware database locations.
    pub root: PathBuf,
    /// Network daemon runtime directory (state files and LLDP logs).
    pub netif_dir: PathBuf,
    /// udev runtime database.
    pub udev_data_dir: PathBuf,
    /// sysfs network class directory.
    pub sysfs_net_dir: PathBuf,
    /// Explicit hardware database file, instead of searching.
    pub hwdb_path: Option<PathBuf>,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self::with_root(Path::new("/"))
    }
}

impl StatusConfig {
    /// Default locations below `root`.
    pub fn with_root(root: &Path) -> Self {
        let under = |path: &str| root.join(path.trim_start_matches('/'));
        Self {
            root: root.to_path_buf(),
            netif_dir: under(NETIF_DIR),
            udev_data_dir: under(UDEV_DATA_DIR),
            sysfs_net_dir: under(SYSFS_NET_DIR),
            hwdb_path: None,
        }
    }

    /// Open the hardware database. Failing to find one is not an error.
    pub fn open_hwdb(&self) -> Option<Hwdb> {
        let hwdb = match &self.hwdb_path {
            Some(path) => Hwdb::open(path)
                .inspect_err(|e| tracing::debug!("Failed to open hardware database: {}", e))
                .ok(),
            None => Hwdb::open_first(&self.root, HWDB_PATHS),
        };
        if hwdb.is_none() {
            tracing::debug!("no hardware database, vendor lookups disabled");
        }
        hwdb
    }
}

/// Which interfaces a status request covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusScope {
    /// System-wide summary.
    System,
    /// The named interfaces (names or indices), in the given order.
    Links(Vec<String>),
    /// Every interface in index order.
    All,
}

/// One row of the interface list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkSummary {
    pub index: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub link_type: Option<String>,
    pub operational: Option<OperationalState>,
    pub setup: Option<SetupState>,
}

/// A local address annotated with its interface name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressEntry {
    pub address: IpAddr,
    pub family: AddressFamily,
    pub ifindex: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ifname: Option<String>,
}

/// A default gateway with the vendor of its link-layer address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GatewayEntry {
    pub address: IpAddr,
    pub family: AddressFamily,
    pub ifindex: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ifname: Option<String>,
    pub metric: u32,
    pub vendor: VendorLookup,
}

/// Status of one interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceReport {
    pub index: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub link_type: Option<String>,
    #[serde(flatten)]
    pub state: LinkState,
    #[serde(flatten)]
    pub device: DeviceInfo,
    /// Hardware address, when the link has a non-zero Ethernet address.
    pub hw_address: Option<String>,
    pub hw_vendor: VendorLookup,
    pub mtu: Option<u32>,
    pub addresses: Vec<AddressEntry>,
    pub gateways: Vec<GatewayEntry>,
    pub lldp: Vec<LldpNeighbor>,
}

/// System-wide status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemReport {
    #[serde(flatten)]
    pub state: SystemState,
    pub addresses: Vec<AddressEntry>,
    pub gateways: Vec<GatewayEntry>,
}

/// Result of a status request.
#[derive(Debug)]
pub enum StatusReport {
    System(SystemReport),
    /// One result per requested interface; a failed interface does not
    /// affect the others.
    Links(Vec<Result<InterfaceReport>>),
}

/// An LLDP neighbor seen on a link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LldpEntry {
    pub link: String,
    pub ifindex: u32,
    #[serde(flatten)]
    pub neighbor: LldpNeighbor,
}

fn ifname(links: &[LinkRecord], ifindex: u32) -> Option<String> {
    links
        .iter()
        .find(|l| l.index == ifindex)
        .map(|l| l.name.clone())
}

/// Builds status reports from a netlink source and the on-disk state.
pub struct Reporter<S, H = Hwdb> {
    source: S,
    hwdb: Option<H>,
    config: StatusConfig,
}

impl<S: RtnlDump, H: HardwareDatabase> Reporter<S, H> {
    /// Create a reporter.
    pub fn new(source: S, hwdb: Option<H>, config: StatusConfig) -> Self {
        Self {
            source,
            hwdb,
            config,
        }
    }

    /// The netlink source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The configuration.
    pub fn config(&self) -> &StatusConfig {
        &self.config
    }

    /// Dump and decode the link table.
    pub async fn links(&self) -> Result<Vec<LinkRecord>> {
        let messages = self.source.dump_links().await?;
        decode_links(&messages)
    }

    /// Summaries of every interface, in index order.
    pub async fn list(&self) -> Result<Vec<LinkSummary>> {
        let links = self.links().await?;
        Ok(links
            .iter()
            .map(|link| {
                let device = self.device_info(link);
                let state = self.link_state(link.index);
                LinkSummary {
                    index: link.index,
                    name: link.name.clone(),
                    link_type: link_type_string(link.iftype, device.devtype.as_deref()),
                    operational: state.operational,
                    setup: state.setup,
                }
            })
            .collect())
    }

    /// Status of the system or of a set of interfaces.
    ///
    /// The system-wide report only uses the link table to name interfaces;
    /// when it cannot be read, entries are reported by index.
    pub async fn status(&self, scope: StatusScope) -> Result<StatusReport> {
        let report = match scope {
            StatusScope::System => {
                let links = self.links().await.unwrap_or_else(|e| {
                    tracing::warn!("Failed to enumerate links, ignoring: {}", e);
                    Vec::new()
                });
                StatusReport::System(self.system_status(&links).await)
            }
            StatusScope::Links(names) => {
                let links = self.links().await?;
                let mut reports = Vec::with_capacity(names.len());
                for name in names {
                    let report = match find_link(&links, &name) {
                        Some(link) => Ok(self.link_status(link, &links).await),
                        None => Err(Error::InterfaceNotFound { name }),
                    };
                    reports.push(report);
                }
                StatusReport::Links(reports)
            }
            StatusScope::All => {
                let links = self.links().await?;
                let mut reports = Vec::with_capacity(links.len());
                for link in &links {
                    reports.push(Ok(self.link_status(link, &links).await));
                }
                StatusReport::Links(reports)
            }
        };
        Ok(report)
    }

    /// LLDP neighbors of every interface with a log.
    pub async fn lldp(&self) -> Result<Vec<LldpEntry>> {
        let links = self.links().await?;
        let mut entries = Vec::new();

        for link in &links {
            entries.extend(self.lldp_neighbors(link.index).into_iter().map(|neighbor| {
                LldpEntry {
                    link: link.name.clone(),
                    ifindex: link.index,
                    neighbor,
                }
            }));
        }
        Ok(entries)
    }

    async fn system_status(&self, links: &[LinkRecord]) -> SystemReport {
        let state = match SystemState::load(&self.config.netif_dir) {
            Ok(state) => state.unwrap_or_default(),
            Err(e) => {
                tracing::warn!("Failed to read network state: {}", e);
                SystemState::default()
            }
        };

        SystemReport {
            state,
            addresses: self.addresses(0, links).await,
            gateways: self.gateways(0, links).await,
        }
    }

    async fn link_status(&self, link: &LinkRecord, links: &[LinkRecord]) -> InterfaceReport {
        let device = self.device_info(link);
        let mac = link.ether_addr().filter(|mac| mac != &[0; 6]);

        InterfaceReport {
            index: link.index,
            name: link.name.clone(),
            link_type: link_type_string(link.iftype, device.devtype.as_deref()),
            state: self.link_state(link.index),
            device,
            hw_address: mac.as_ref().map(format_mac_addr),
            hw_vendor: ieee_oui(self.hwdb.as_ref(), mac.as_ref()),
            mtu: link.mtu.filter(|&mtu| mtu > 0),
            addresses: self.addresses(link.index, links).await,
            gateways: self.gateways(link.index, links).await,
            lldp: self.lldp_neighbors(link.index),
        }
    }

    async fn addresses(&self, ifindex: u32, links: &[LinkRecord]) -> Vec<AddressEntry> {
        let messages = match self.source.dump_addresses(None).await {
            Ok(messages) => messages,
            Err(e) => {
                tracing::warn!("Failed to dump addresses: {}", e);
                return Vec::new();
            }
        };

        local_addresses(&messages, ifindex, None)
            .into_iter()
            .map(|addr| AddressEntry {
                address: addr.address,
                family: addr.family,
                ifindex: addr.ifindex,
                ifname: ifname(links, addr.ifindex),
            })
            .collect()
    }

    async fn gateways(&self, ifindex: u32, links: &[LinkRecord]) -> Vec<GatewayEntry> {
        let messages = match self.source.dump_routes(None).await {
            Ok(messages) => messages,
            Err(e) => {
                tracing::warn!("Failed to dump routes: {}", e);
                return Vec::new();
            }
        };

        let mut entries = Vec::new();
        for gw in local_gateways(&messages, ifindex, None) {
            let vendor = describe_gateway(&self.source, self.hwdb.as_ref(), gw.ifindex, &gw.address)
                .await
                .unwrap_or_else(|e| {
                    tracing::debug!("Could not get description of gateway: {}", e);
                    VendorLookup::NoData
                });
            entries.push(GatewayEntry {
                address: gw.address,
                family: gw.family,
                ifindex: gw.ifindex,
                ifname: ifname(links, gw.ifindex),
                metric: gw.metric,
                vendor,
            });
        }
        entries
    }

    fn link_state(&self, ifindex: u32) -> LinkState {
        match LinkState::load(&self.config.netif_dir, ifindex) {
            Ok(state) => state.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(ifindex, "Failed to read link state: {}", e);
                LinkState::default()
            }
        }
    }

    fn device_info(&self, link: &LinkRecord) -> DeviceInfo {
        DeviceInfo::load(
            &self.config.udev_data_dir,
            &self.config.sysfs_net_dir,
            link.index,
            &link.name,
        )
        .unwrap_or_else(|e| {
            tracing::debug!(ifindex = link.index, "Failed to read device data: {}", e);
            DeviceInfo::default()
        })
    }

    fn lldp_neighbors(&self, ifindex: u32) -> Vec<LldpNeighbor> {
        let path = lldp_log_path(&self.config.netif_dir, ifindex);
        match LldpLogReader::open(&path) {
            Ok(Some(reader)) => reader.collect(),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to open {}, ignoring: {}", path.display(), e);
                Vec::new()
            }
        }
    }
}
