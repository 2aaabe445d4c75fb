//! udev device properties of network interfaces.

use std::collections::BTreeMap;
use std::io;
use std::path::Path;

use serde::Serialize;

use crate::netlink::error::Result;
use crate::state::read_env_file;

/// Default udev runtime database.
pub const UDEV_DATA_DIR: &str = "/run/udev/data";

/// Default sysfs network class directory.
pub const SYSFS_NET_DIR: &str = "/sys/class/net";

/// Device metadata udev recorded for an interface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    /// Kernel device type (`wlan`, `wwan`, `bridge`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub devtype: Option<String>,
    /// `.link` file applied to the device.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// Parse a udev database entry, keeping the `E:` property lines.
pub fn parse_udev_data(content: &str) -> BTreeMap<String, String> {
    content
        .lines()
        .filter_map(|line| line.strip_prefix("E:"))
        .filter_map(|prop| prop.split_once('='))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl DeviceInfo {
    /// Build from udev properties and the sysfs `DEVTYPE`.
    pub fn from_properties(props: &BTreeMap<String, String>, devtype: Option<String>) -> Self {
        let get = |key: &str| props.get(key).cloned();
        Self {
            devtype: devtype.or_else(|| get("DEVTYPE")),
            link_file: get("ID_NET_LINK_FILE"),
            driver: get("ID_NET_DRIVER"),
            path: get("ID_PATH"),
            vendor: get("ID_VENDOR_FROM_DATABASE").or_else(|| get("ID_VENDOR")),
            model: get("ID_MODEL_FROM_DATABASE").or_else(|| get("ID_MODEL")),
        }
    }

    /// Load the properties of interface `ifindex` named `name`.
    ///
    /// Devices udev does not know about have no properties.
    pub fn load(udev_data_dir: &Path, sysfs_net_dir: &Path, ifindex: u32, name: &str) -> Result<Self> {
        let data_path = udev_data_dir.join(format!("n{}", ifindex));
        let props = match std::fs::read_to_string(&data_path) {
            Ok(content) => parse_udev_data(&content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        let uevent_path = sysfs_net_dir.join(name).join("uevent");
        let devtype = read_env_file(&uevent_path)
            .unwrap_or_else(|e| {
                tracing::debug!(path = %uevent_path.display(), "Failed to read uevent: {}", e);
                None
            })
            .and_then(|mut uevent| uevent.remove("DEVTYPE"));

        Ok(Self::from_properties(&props, devtype))
    }
}
