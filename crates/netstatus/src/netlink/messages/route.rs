//! Strongly-typed route message.

use std::net::IpAddr;

use crate::netlink::parse::{
    FromNetlink, PResult, attr_u32, cut, parse_attrs, parse_header, parse_ip_addr,
};
use crate::netlink::types::route::RtMsg;

/// Attribute IDs for RTA_* constants.
mod attr_ids {
    pub const RTA_DST: u16 = 1;
    pub const RTA_OIF: u16 = 4;
    pub const RTA_GATEWAY: u16 = 5;
    pub const RTA_PRIORITY: u16 = 6;
    pub const RTA_TABLE: u16 = 15;
}

/// Route message with the attributes gateway discovery needs.
#[derive(Debug, Clone, Default)]
pub struct RouteMessage {
    /// Fixed-size header.
    pub header: RtMsg,
    /// Destination (RTA_DST).
    pub destination: Option<IpAddr>,
    /// Output interface index (RTA_OIF).
    pub oif: Option<u32>,
    /// Gateway (RTA_GATEWAY).
    pub gateway: Option<IpAddr>,
    /// Route metric (RTA_PRIORITY).
    pub priority: Option<u32>,
    /// Full table ID (RTA_TABLE), overrides the 8-bit header field.
    pub table: Option<u32>,
}

impl RouteMessage {
    /// Get the address family.
    pub fn family(&self) -> u8 {
        self.header.rtm_family
    }

    /// Get the routing table ID.
    pub fn table_id(&self) -> u32 {
        self.table.unwrap_or(self.header.rtm_table as u32)
    }

    /// Check if this is a default route (no destination or source prefix).
    pub fn is_default(&self) -> bool {
        self.header.rtm_dst_len == 0 && self.header.rtm_src_len == 0
    }
}

impl FromNetlink for RouteMessage {
    fn parse(input: &mut &[u8]) -> PResult<Self> {
        let header =
            RtMsg::from_bytes(parse_header(input, RtMsg::SIZE)?).map_err(|_| cut())?;

        let mut msg = RouteMessage {
            header,
            ..Default::default()
        };

        for (attr_type, data) in parse_attrs(input) {
            match attr_type {
                attr_ids::RTA_DST => msg.destination = parse_ip_addr(data, header.rtm_family).ok(),
                attr_ids::RTA_OIF => msg.oif = attr_u32(data),
                attr_ids::RTA_GATEWAY => msg.gateway = parse_ip_addr(data, header.rtm_family).ok(),
                attr_ids::RTA_PRIORITY => msg.priority = attr_u32(data),
                attr_ids::RTA_TABLE => msg.table = attr_u32(data),
                _ => {}
            }
        }

        Ok(msg)
    }
}
