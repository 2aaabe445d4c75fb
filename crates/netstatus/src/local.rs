//! Local addresses and default gateways extracted from address and route
//! dumps.

use std::net::IpAddr;

use serde::Serialize;

use crate::netlink::family::AddressFamily;
use crate::netlink::message::{NlMsgType, split_message};
use crate::netlink::messages::{AddressMessage, RouteMessage};
use crate::netlink::parse::FromNetlink;
use crate::netlink::types::addr::scope;
use crate::netlink::types::route::RT_TABLE_MAIN;

/// An address or gateway bound to an interface.
///
/// Fields are declared in sort order: IPv4 before IPv6, then lowest
/// metric, lowest scope and lowest interface index first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct LocalAddress {
    /// Address family.
    pub family: AddressFamily,
    /// Route metric (0 for addresses).
    pub metric: u32,
    /// Scope (RT_SCOPE_*).
    pub scope: u8,
    /// Interface index.
    pub ifindex: u32,
    /// The address itself.
    pub address: IpAddr,
}

fn family_matches(family: Option<AddressFamily>, candidate: AddressFamily) -> bool {
    family.is_none_or(|f| f == candidate)
}

/// Collect the usable addresses from an `RTM_GETADDR` dump.
///
/// `ifindex` 0 means every interface. Deprecated addresses and addresses
/// with host or nowhere scope are left out. IPv4 entries use `IFA_LOCAL`,
/// IPv6 entries `IFA_ADDRESS`.
pub fn local_addresses<M: AsRef<[u8]>>(
    messages: &[M],
    ifindex: u32,
    family: Option<AddressFamily>,
) -> Vec<LocalAddress> {
    let mut list: Vec<LocalAddress> = messages
        .iter()
        .filter_map(|msg| {
            let (header, payload) = split_message(msg.as_ref()).ok()?;
            if header.nlmsg_type != NlMsgType::RTM_NEWADDR {
                return None;
            }
            let addr = match AddressMessage::from_bytes(payload) {
                Ok(addr) => addr,
                Err(e) => {
                    tracing::debug!("skipping undecodable address message: {}", e);
                    return None;
                }
            };

            if ifindex > 0 && addr.ifindex() != ifindex {
                return None;
            }
            let msg_family = AddressFamily::from_u8(addr.family())?;
            if !family_matches(family, msg_family) {
                return None;
            }
            if addr.is_deprecated() || matches!(addr.scope(), scope::HOST | scope::NOWHERE) {
                return None;
            }

            let address = match msg_family {
                AddressFamily::Inet => addr.local,
                AddressFamily::Inet6 => addr.address,
            }?;

            Some(LocalAddress {
                family: msg_family,
                metric: 0,
                scope: addr.scope(),
                ifindex: addr.ifindex(),
                address,
            })
        })
        .collect();

    list.sort();
    list
}

/// Collect the default gateways of the main routing table from an
/// `RTM_GETROUTE` dump.
///
/// Only routes with empty destination and source prefixes that carry both
/// an output interface and a gateway qualify.
pub fn local_gateways<M: AsRef<[u8]>>(
    messages: &[M],
    ifindex: u32,
    family: Option<AddressFamily>,
) -> Vec<LocalAddress> {
    let mut list: Vec<LocalAddress> = messages
        .iter()
        .filter_map(|msg| {
            let (header, payload) = split_message(msg.as_ref()).ok()?;
            if header.nlmsg_type != NlMsgType::RTM_NEWROUTE {
                return None;
            }
            let route = match RouteMessage::from_bytes(payload) {
                Ok(route) => route,
                Err(e) => {
                    tracing::debug!("skipping undecodable route message: {}", e);
                    return None;
                }
            };

            if !route.is_default() || route.table_id() != RT_TABLE_MAIN {
                return None;
            }
            let msg_family = AddressFamily::from_u8(route.family())?;
            if !family_matches(family, msg_family) {
                return None;
            }
            let oif = route.oif?;
            if ifindex > 0 && oif != ifindex {
                return None;
            }
            let gateway = route.gateway?;

            Some(LocalAddress {
                family: msg_family,
                metric: route.priority.unwrap_or(0),
                scope: route.header.rtm_scope,
                ifindex: oif,
                address: gateway,
            })
        })
        .collect();

    list.sort();
    list
}
