//! Strongly-typed neighbor message.

use std::net::IpAddr;

use crate::netlink::parse::{FromNetlink, PResult, cut, parse_attrs, parse_header, parse_ip_addr};
use crate::netlink::types::neigh::NdMsg;

/// Attribute IDs for NDA_* constants.
mod attr_ids {
    pub const NDA_DST: u16 = 1;
    pub const NDA_LLADDR: u16 = 2;
}

/// Neighbor message with destination and link-layer address parsed.
#[derive(Debug, Clone, Default)]
pub struct NeighborMessage {
    /// Fixed-size header.
    pub header: NdMsg,
    /// Destination address (NDA_DST).
    pub destination: Option<IpAddr>,
    /// Link-layer address (NDA_LLADDR).
    pub lladdr: Option<Vec<u8>>,
}

impl NeighborMessage {
    /// Get the address family.
    pub fn family(&self) -> u8 {
        self.header.ndm_family
    }

    /// Get the interface index.
    pub fn ifindex(&self) -> i32 {
        self.header.ndm_ifindex
    }

    /// The link-layer address as an Ethernet MAC, if it has that size.
    pub fn ether_addr(&self) -> Option<[u8; 6]> {
        self.lladdr.as_deref()?.try_into().ok()
    }
}

impl FromNetlink for NeighborMessage {
    fn parse(input: &mut &[u8]) -> PResult<Self> {
        let header =
            NdMsg::from_bytes(parse_header(input, NdMsg::SIZE)?).map_err(|_| cut())?;

        let mut msg = NeighborMessage {
            header,
            ..Default::default()
        };

        for (attr_type, data) in parse_attrs(input) {
            match attr_type {
                attr_ids::NDA_DST => msg.destination = parse_ip_addr(data, header.ndm_family).ok(),
                attr_ids::NDA_LLADDR => msg.lladdr = Some(data.to_vec()),
                _ => {}
            }
        }

        Ok(msg)
    }
}
