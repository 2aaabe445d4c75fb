//! LLDP neighbor logs.
//!
//! The LLDP daemon appends every received frame to a per-interface log as
//! `(u64 little-endian length, raw Ethernet frame)` records. This module
//! decodes those logs into [`LldpNeighbor`] values.

mod frame;
mod reader;

#[cfg(test)]
pub(crate) mod fixtures;

use std::path::{Path, PathBuf};

use serde::Serialize;

pub use frame::decode_frame;
pub use reader::{LldpLogReader, Termination};

/// Neighbor information extracted from one LLDP frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LldpNeighbor {
    /// Chassis ID rendered by subtype.
    pub chassis_id: String,
    /// Port ID rendered by subtype.
    pub port_id: String,
    /// Time to live in seconds.
    pub ttl: u16,
    /// System name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_name: Option<String>,
    /// Port description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port_description: Option<String>,
    /// Supported capabilities bitmap.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_capabilities: Option<u16>,
    /// Enabled capabilities bitmap.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled_capabilities: Option<u16>,
}

/// Capability bits in the order they are displayed.
const CAPABILITY_CHARS: [(u16, char); 11] = [
    (1 << 0, 'o'),  // other
    (1 << 1, 'p'),  // repeater
    (1 << 2, 'b'),  // bridge
    (1 << 3, 'w'),  // WLAN access point
    (1 << 4, 'r'),  // router
    (1 << 5, 't'),  // telephone
    (1 << 6, 'd'),  // DOCSIS cable device
    (1 << 7, 'a'),  // station
    (1 << 8, 'c'),  // customer VLAN
    (1 << 9, 's'),  // service VLAN
    (1 << 10, 'm'), // two-port MAC relay
];

/// Render a capability bitmap, one character per known bit and `.` for
/// bits that are not set.
pub fn capabilities_to_string(caps: u16) -> String {
    CAPABILITY_CHARS
        .iter()
        .map(|&(bit, c)| if caps & bit != 0 { c } else { '.' })
        .collect()
}

/// Path of the LLDP log for an interface.
pub fn lldp_log_path(netif_dir: &Path, ifindex: u32) -> PathBuf {
    netif_dir.join("lldp").join(ifindex.to_string())
}
