//! Network link status reporting for Linux.
//!
//! This crate answers the questions `networkctl` answers: which interfaces
//! exist, what state the network daemon reports for them, which addresses
//! and default gateways they carry, who manufactured the gateway's NIC,
//! and which LLDP neighbors were seen on each port.
//!
//! Kernel state comes from rtnetlink dumps, vendor names from the systemd
//! hardware database, neighbors from the LLDP logs the network daemon
//! writes, and configuration state from its runtime state files.
//!
//! # Example
//!
//! ```ignore
//! use netstatus::{Connection, Reporter, StatusConfig};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> netstatus::Result<()> {
//!     let config = StatusConfig::default();
//!     let reporter = Reporter::new(Connection::new()?, config.open_hwdb(), config);
//!
//!     for link in reporter.list().await? {
//!         println!("{}: {}", link.index, link.name);
//!     }
//!     Ok(())
//! }
//! ```

pub mod device;
pub mod gateway;
pub mod hwdb;
pub mod links;
pub mod lldp;
pub mod local;
pub mod netlink;
pub mod oui;
pub mod output;
pub mod state;
pub mod status;

// Re-export common types at crate root for convenience
pub use hwdb::{HardwareDatabase, Hwdb};
pub use netlink::{AddressFamily, Connection, Error, Result, RtnlDump};
pub use oui::VendorLookup;
pub use status::{
    InterfaceReport, LinkSummary, LldpEntry, Reporter, StatusConfig, StatusReport, StatusScope,
    SystemReport,
};
