//! IEEE OUI vendor lookup.

use serde::Serialize;

use crate::hwdb::HardwareDatabase;

/// hwdb property holding the vendor name of an OUI.
pub const OUI_PROPERTY: &str = "ID_OUI_FROM_DATABASE";

/// Outcome of a vendor lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", content = "vendor", rename_all = "snake_case")]
pub enum VendorLookup {
    /// The database knows the vendor.
    Found(String),
    /// The database has no entry for the address.
    NoData,
    /// No lookup was possible (no database, no address, or an all-zero
    /// OUI).
    NotApplicable,
}

impl VendorLookup {
    /// The vendor name, if one was found.
    pub fn vendor(&self) -> Option<&str> {
        match self {
            Self::Found(vendor) => Some(vendor),
            _ => None,
        }
    }
}

/// The modalias `OUI:XXXXXXXXXXXX` for a MAC address.
pub fn oui_modalias(mac: &[u8; 6]) -> String {
    let mut modalias = String::from("OUI:");
    for byte in mac {
        modalias.push_str(&format!("{:02X}", byte));
    }
    modalias
}

/// Resolve the vendor of a MAC address.
///
/// The `00:00:00` prefix is commonly misused and never looked up.
pub fn ieee_oui<H: HardwareDatabase + ?Sized>(hwdb: Option<&H>, mac: Option<&[u8; 6]>) -> VendorLookup {
    let (Some(hwdb), Some(mac)) = (hwdb, mac) else {
        return VendorLookup::NotApplicable;
    };
    if mac[..3] == [0, 0, 0] {
        return VendorLookup::NotApplicable;
    }

    match hwdb.get(&oui_modalias(mac), OUI_PROPERTY) {
        Some(vendor) => VendorLookup::Found(vendor),
        None => VendorLookup::NoData,
    }
}
