//! IP address families.

use std::net::IpAddr;

use serde::Serialize;

/// An IP address family. "Any family" is expressed as `Option::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressFamily {
    /// IPv4 (AF_INET).
    Inet,
    /// IPv6 (AF_INET6).
    Inet6,
}

impl AddressFamily {
    /// The AF_* value.
    pub fn as_u8(self) -> u8 {
        match self {
            Self::Inet => libc::AF_INET as u8,
            Self::Inet6 => libc::AF_INET6 as u8,
        }
    }

    /// Map an AF_* value, `None` for anything but AF_INET and AF_INET6.
    pub fn from_u8(family: u8) -> Option<Self> {
        match i32::from(family) {
            libc::AF_INET => Some(Self::Inet),
            libc::AF_INET6 => Some(Self::Inet6),
            _ => None,
        }
    }

    /// The family of an address.
    pub fn of(addr: &IpAddr) -> Self {
        match addr {
            IpAddr::V4(_) => Self::Inet,
            IpAddr::V6(_) => Self::Inet6,
        }
    }
}

/// AF_* value for an optional family filter (AF_UNSPEC for any).
pub fn family_or_unspec(family: Option<AddressFamily>) -> u8 {
    family.map_or(libc::AF_UNSPEC as u8, AddressFamily::as_u8)
}
