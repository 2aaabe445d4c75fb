//! Gateway link-layer address and vendor resolution.

use std::net::IpAddr;

use crate::hwdb::HardwareDatabase;
use crate::netlink::connection::RtnlDump;
use crate::netlink::error::{Error, Result};
use crate::netlink::family::AddressFamily;
use crate::netlink::message::{NlMsgError, NlMsgType, split_message};
use crate::netlink::messages::NeighborMessage;
use crate::netlink::parse::FromNetlink;
use crate::oui::{VendorLookup, ieee_oui};

/// Find the MAC address of `target` in a neighbor dump.
///
/// The first entry with the right family, interface (unless `ifindex` is
/// 0), destination and a 6-byte link-layer address wins. Error messages,
/// other message types and undecodable entries are skipped.
pub fn find_gateway_lladdr<M: AsRef<[u8]>>(
    messages: &[M],
    ifindex: u32,
    family: AddressFamily,
    target: &IpAddr,
) -> Option<[u8; 6]> {
    messages.iter().find_map(|msg| {
        let (header, payload) = split_message(msg.as_ref()).ok()?;

        if header.is_error() {
            if let Ok(err) = NlMsgError::from_bytes(payload)
                && !err.is_ack()
            {
                tracing::debug!("neighbor dump entry: {}", Error::from_errno(err.error));
            }
            return None;
        }
        if header.nlmsg_type != NlMsgType::RTM_NEWNEIGH {
            return None;
        }

        let neigh = NeighborMessage::from_bytes(payload).ok()?;
        if neigh.family() != family.as_u8() {
            return None;
        }
        if ifindex > 0 && neigh.ifindex() != ifindex as i32 {
            return None;
        }
        if neigh.destination.as_ref() != Some(target) {
            return None;
        }
        neigh.ether_addr()
    })
}

/// Resolve the vendor of the gateway `target` reachable over `ifindex`.
///
/// Without a hardware database no neighbor dump is issued. A gateway that
/// is not in the neighbor table yields [`VendorLookup::NoData`].
pub async fn describe_gateway<S, H>(
    source: &S,
    hwdb: Option<&H>,
    ifindex: u32,
    target: &IpAddr,
) -> Result<VendorLookup>
where
    S: RtnlDump + ?Sized,
    H: HardwareDatabase + ?Sized,
{
    if hwdb.is_none() {
        return Ok(VendorLookup::NotApplicable);
    }

    let family = AddressFamily::of(target);
    let messages = source.dump_neighbors(ifindex, Some(family)).await?;

    match find_gateway_lladdr(&messages, ifindex, family, target) {
        Some(mac) => Ok(ieee_oui(hwdb, Some(&mac))),
        None => {
            tracing::debug!(%target, ifindex, "gateway not in neighbor table");
            Ok(VendorLookup::NoData)
        }
    }
}
