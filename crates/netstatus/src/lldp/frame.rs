//! LLDP frame decoding.

use std::fmt::Write as _;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use winnow::binary::be_u16;
use winnow::prelude::*;
use winnow::token::take;

use super::LldpNeighbor;
use crate::netlink::error::{Error, Result};
use crate::netlink::parse::{PResult, cut, format_mac_addr};

const ETHER_HEADER_LEN: usize = 14;
const ETHERTYPE_LLDP: u16 = 0x88cc;

/// Destination addresses LLDP frames are accepted on (nearest bridge,
/// nearest non-TPMR bridge, nearest customer bridge).
const LLDP_MULTICAST_ADDRS: [[u8; 6]; 3] = [
    [0x01, 0x80, 0xc2, 0x00, 0x00, 0x0e],
    [0x01, 0x80, 0xc2, 0x00, 0x00, 0x03],
    [0x01, 0x80, 0xc2, 0x00, 0x00, 0x00],
];

/// TLV types.
mod tlv {
    pub const END: u8 = 0;
    pub const CHASSIS_ID: u8 = 1;
    pub const PORT_ID: u8 = 2;
    pub const TTL: u8 = 3;
    pub const PORT_DESCRIPTION: u8 = 4;
    pub const SYSTEM_NAME: u8 = 5;
    pub const SYSTEM_CAPABILITIES: u8 = 7;
}

/// Chassis ID subtypes.
mod chassis_subtype {
    pub const CHASSIS_COMPONENT: u8 = 1;
    pub const INTERFACE_ALIAS: u8 = 2;
    pub const PORT_COMPONENT: u8 = 3;
    pub const MAC_ADDRESS: u8 = 4;
    pub const NETWORK_ADDRESS: u8 = 5;
    pub const INTERFACE_NAME: u8 = 6;
    pub const LOCALLY_ASSIGNED: u8 = 7;
}

/// Port ID subtypes.
mod port_subtype {
    pub const INTERFACE_ALIAS: u8 = 1;
    pub const PORT_COMPONENT: u8 = 2;
    pub const MAC_ADDRESS: u8 = 3;
    pub const NETWORK_ADDRESS: u8 = 4;
    pub const INTERFACE_NAME: u8 = 5;
    pub const LOCALLY_ASSIGNED: u8 = 7;
}

fn invalid(reason: &str) -> Error {
    Error::InvalidMessage(format!("LLDP: {}", reason))
}

/// Parse one TLV: 7-bit type and 9-bit length, then the payload.
fn parse_tlv<'a>(input: &mut &'a [u8]) -> PResult<(u8, &'a [u8])> {
    let header = be_u16.parse_next(input)?;
    let len = (header & 0x1ff) as usize;
    if input.len() < len {
        return Err(cut());
    }
    let data = take(len).parse_next(input)?;
    Ok(((header >> 9) as u8, data))
}

/// Decode a raw LLDP Ethernet frame.
pub fn decode_frame(frame: &[u8]) -> Result<LldpNeighbor> {
    if frame.len() < ETHER_HEADER_LEN {
        return Err(invalid("frame shorter than Ethernet header"));
    }
    let (ether, mut input) = frame.split_at(ETHER_HEADER_LEN);
    if !LLDP_MULTICAST_ADDRS.iter().any(|addr| ether[..6] == addr[..]) {
        return Err(invalid("unexpected destination address"));
    }
    if u16::from_be_bytes([ether[12], ether[13]]) != ETHERTYPE_LLDP {
        return Err(invalid("unexpected ethertype"));
    }

    let mut chassis_id: Option<&[u8]> = None;
    let mut port_id: Option<&[u8]> = None;
    let mut ttl = None;
    let mut system_name = None;
    let mut port_description = None;
    let mut capabilities = None;

    loop {
        if input.len() < 2 {
            return Err(invalid("TLV lacks header"));
        }
        let (tlv_type, data) =
            parse_tlv(&mut input).map_err(|_| invalid("TLV length exceeds frame"))?;

        match tlv_type {
            tlv::END => {
                if !data.is_empty() {
                    return Err(invalid("END TLV with payload"));
                }
                break;
            }
            tlv::CHASSIS_ID | tlv::PORT_ID => {
                if !(2..=256).contains(&data.len()) {
                    return Err(invalid("ID TLV with invalid length"));
                }
                let slot = if tlv_type == tlv::CHASSIS_ID {
                    &mut chassis_id
                } else {
                    &mut port_id
                };
                if slot.is_some() {
                    return Err(invalid("duplicate ID TLV"));
                }
                *slot = Some(data);
            }
            tlv::TTL => {
                let [hi, lo] = data else {
                    return Err(invalid("TTL TLV with invalid length"));
                };
                if ttl.is_some() {
                    return Err(invalid("duplicate TTL TLV"));
                }
                ttl = Some(u16::from_be_bytes([*hi, *lo]));
            }
            tlv::PORT_DESCRIPTION => parse_string(&mut port_description, data),
            tlv::SYSTEM_NAME => parse_string(&mut system_name, data),
            tlv::SYSTEM_CAPABILITIES => {
                let [a, b, c, d] = data else {
                    return Err(invalid("capabilities TLV with invalid length"));
                };
                capabilities = Some((u16::from_be_bytes([*a, *b]), u16::from_be_bytes([*c, *d])));
            }
            _ => {}
        }
    }

    let (Some(chassis_id), Some(port_id), Some(ttl)) = (chassis_id, port_id, ttl) else {
        return Err(invalid("mandatory TLV missing"));
    };

    Ok(LldpNeighbor {
        chassis_id: chassis_id_to_string(chassis_id),
        port_id: port_id_to_string(port_id),
        ttl,
        system_name,
        port_description,
        system_capabilities: capabilities.map(|(supported, _)| supported),
        enabled_capabilities: capabilities.map(|(_, enabled)| enabled),
    })
}

/// Store a string TLV. Duplicates, empty strings and strings with inner
/// NULs are ignored; trailing NULs are dropped.
fn parse_string(slot: &mut Option<String>, data: &[u8]) {
    if slot.is_some() {
        tracing::debug!("duplicate string TLV, ignoring");
        return;
    }
    let end = data.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    let data = &data[..end];
    if data.is_empty() || data.contains(&0) {
        return;
    }
    *slot = Some(escape(data));
}

fn chassis_id_to_string(id: &[u8]) -> String {
    use chassis_subtype::*;

    let rendered = match id[0] {
        CHASSIS_COMPONENT | INTERFACE_ALIAS | PORT_COMPONENT | INTERFACE_NAME
        | LOCALLY_ASSIGNED => Some(escape(&id[1..])),
        MAC_ADDRESS => mac_address(&id[1..]),
        NETWORK_ADDRESS => network_address(&id[1..]),
        _ => None,
    };
    rendered.unwrap_or_else(|| hex(id))
}

fn port_id_to_string(id: &[u8]) -> String {
    use port_subtype::*;

    let rendered = match id[0] {
        INTERFACE_ALIAS | PORT_COMPONENT | INTERFACE_NAME | LOCALLY_ASSIGNED => {
            Some(escape(&id[1..]))
        }
        MAC_ADDRESS => mac_address(&id[1..]),
        NETWORK_ADDRESS => network_address(&id[1..]),
        _ => None,
    };
    rendered.unwrap_or_else(|| hex(id))
}

fn mac_address(data: &[u8]) -> Option<String> {
    data.try_into().ok().map(|mac: &[u8; 6]| format_mac_addr(mac))
}

/// Address family number (IANA) followed by the address.
fn network_address(data: &[u8]) -> Option<String> {
    let addr = match data {
        [1, rest @ ..] => IpAddr::V4(Ipv4Addr::from(<[u8; 4]>::try_from(rest).ok()?)),
        [2, rest @ ..] => IpAddr::V6(Ipv6Addr::from(<[u8; 16]>::try_from(rest).ok()?)),
        _ => return None,
    };
    Some(addr.to_string())
}

fn hex(data: &[u8]) -> String {
    data.iter().fold(String::with_capacity(data.len() * 2), |mut s, b| {
        let _ = write!(s, "{:02x}", b);
        s
    })
}

/// C-style escaping of control characters, quotes, backslashes and bytes
/// outside printable ASCII.
fn escape(data: &[u8]) -> String {
    let mut s = String::with_capacity(data.len());
    for &b in data {
        match b {
            0x07 => s.push_str("\\a"),
            0x08 => s.push_str("\\b"),
            0x0c => s.push_str("\\f"),
            b'\n' => s.push_str("\\n"),
            b'\r' => s.push_str("\\r"),
            b'\t' => s.push_str("\\t"),
            0x0b => s.push_str("\\v"),
            b'\\' => s.push_str("\\\\"),
            b'"' => s.push_str("\\\""),
            b'\'' => s.push_str("\\'"),
            0x20..0x7f => s.push(b as char),
            _ => {
                let _ = write!(s, "\\x{:02x}", b);
            }
        }
    }
    s
}
