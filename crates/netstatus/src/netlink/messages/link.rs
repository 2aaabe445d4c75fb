//! Strongly-typed link message.

use crate::netlink::parse::{
    FromNetlink, PResult, attr_u32, cut, parse_attrs, parse_header, parse_string_from_bytes,
};
use crate::netlink::types::link::IfInfoMsg;

/// Attribute IDs for IFLA_* constants.
mod attr_ids {
    pub const IFLA_ADDRESS: u16 = 1;
    pub const IFLA_IFNAME: u16 = 3;
    pub const IFLA_MTU: u16 = 4;
}

/// Link message with the attributes a status report needs.
#[derive(Debug, Clone, Default)]
pub struct LinkMessage {
    /// Fixed-size header.
    pub header: IfInfoMsg,
    /// Interface name (IFLA_IFNAME).
    pub name: Option<String>,
    /// Hardware address (IFLA_ADDRESS).
    pub address: Option<Vec<u8>>,
    /// MTU (IFLA_MTU).
    pub mtu: Option<u32>,
}

impl LinkMessage {
    /// Get the interface index.
    pub fn ifindex(&self) -> i32 {
        self.header.ifi_index
    }

    /// Get the device type (ARPHRD_*).
    pub fn iftype(&self) -> u16 {
        self.header.ifi_type
    }
}

impl FromNetlink for LinkMessage {
    fn parse(input: &mut &[u8]) -> PResult<Self> {
        let header = IfInfoMsg::from_bytes(parse_header(input, IfInfoMsg::SIZE)?)
            .map_err(|_| cut())?;

        let mut msg = LinkMessage {
            header,
            ..Default::default()
        };

        for (attr_type, data) in parse_attrs(input) {
            match attr_type {
                attr_ids::IFLA_IFNAME => msg.name = parse_string_from_bytes(data),
                attr_ids::IFLA_ADDRESS => msg.address = Some(data.to_vec()),
                attr_ids::IFLA_MTU => msg.mtu = attr_u32(data),
                _ => {}
            }
        }

        Ok(msg)
    }
}
