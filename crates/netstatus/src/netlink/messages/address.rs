//! Strongly-typed address message.

use std::net::IpAddr;

use crate::netlink::parse::{
    FromNetlink, PResult, attr_u32, cut, parse_attrs, parse_header, parse_ip_addr,
};
use crate::netlink::types::addr::{IfAddrMsg, ifa_flags};

/// Attribute IDs for IFA_* constants.
mod attr_ids {
    pub const IFA_ADDRESS: u16 = 1;
    pub const IFA_LOCAL: u16 = 2;
    pub const IFA_FLAGS: u16 = 8;
}

/// Address message with its address attributes parsed.
#[derive(Debug, Clone, Default)]
pub struct AddressMessage {
    /// Fixed-size header.
    pub header: IfAddrMsg,
    /// Address (IFA_ADDRESS).
    pub address: Option<IpAddr>,
    /// Local address (IFA_LOCAL).
    pub local: Option<IpAddr>,
    /// Extended flags (IFA_FLAGS).
    pub flags: Option<u32>,
}

impl AddressMessage {
    /// Get the address family.
    pub fn family(&self) -> u8 {
        self.header.ifa_family
    }

    /// Get the interface index.
    pub fn ifindex(&self) -> u32 {
        self.header.ifa_index
    }

    /// Get the scope (RT_SCOPE_*).
    pub fn scope(&self) -> u8 {
        self.header.ifa_scope
    }

    /// Check if this address is deprecated.
    pub fn is_deprecated(&self) -> bool {
        let flags = self.flags.unwrap_or(self.header.ifa_flags as u32);
        flags & ifa_flags::DEPRECATED != 0
    }
}

impl FromNetlink for AddressMessage {
    fn parse(input: &mut &[u8]) -> PResult<Self> {
        let header = IfAddrMsg::from_bytes(parse_header(input, IfAddrMsg::SIZE)?)
            .map_err(|_| cut())?;

        let mut msg = AddressMessage {
            header,
            ..Default::default()
        };

        for (attr_type, data) in parse_attrs(input) {
            match attr_type {
                attr_ids::IFA_ADDRESS => msg.address = parse_ip_addr(data, header.ifa_family).ok(),
                attr_ids::IFA_LOCAL => msg.local = parse_ip_addr(data, header.ifa_family).ok(),
                attr_ids::IFA_FLAGS => msg.flags = attr_u32(data),
                _ => {}
            }
        }

        Ok(msg)
    }
}
