//! Link table decoding and interface type names.

use serde::Serialize;

use crate::netlink::error::{Error, Result};
use crate::netlink::message::{NlMsgType, split_message};
use crate::netlink::messages::LinkMessage;
use crate::netlink::parse::FromNetlink;

/// ARPHRD_ETHER.
pub const ARPHRD_ETHER: u16 = 1;

/// One network interface as reported by a link dump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkRecord {
    /// Interface index (always positive).
    pub index: u32,
    /// Interface name.
    pub name: String,
    /// Device type (ARPHRD_*).
    pub iftype: u16,
    /// Hardware address, if the link has one.
    #[serde(skip)]
    pub hw_address: Option<Vec<u8>>,
    /// MTU.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mtu: Option<u32>,
}

impl LinkRecord {
    /// The hardware address as an Ethernet MAC, if it has that size.
    pub fn ether_addr(&self) -> Option<[u8; 6]> {
        self.hw_address.as_deref()?.try_into().ok()
    }
}

/// Decode the messages of an `RTM_GETLINK` dump into link records sorted by
/// index.
///
/// Messages of any other type are skipped. A `RTM_NEWLINK` message that
/// cannot be decoded, or that lacks a name or a valid index, fails the
/// whole decode.
pub fn decode_links<M: AsRef<[u8]>>(messages: &[M]) -> Result<Vec<LinkRecord>> {
    let mut links = Vec::with_capacity(messages.len());

    for msg in messages {
        let (header, payload) = split_message(msg.as_ref())?;
        if header.nlmsg_type != NlMsgType::RTM_NEWLINK {
            continue;
        }

        let link = LinkMessage::from_bytes(payload)?;
        let index = u32::try_from(link.ifindex())
            .ok()
            .filter(|&i| i > 0)
            .ok_or_else(|| {
                Error::InvalidMessage(format!("invalid interface index: {}", link.ifindex()))
            })?;
        let name = link.name.clone().ok_or(Error::MissingAttribute {
            message: "RTM_NEWLINK",
            attribute: "IFLA_IFNAME",
        })?;

        links.push(LinkRecord {
            index,
            name,
            iftype: link.iftype(),
            hw_address: link.address,
            mtu: link.mtu,
        });
    }

    links.sort_by(|a, b| a.index.cmp(&b.index));
    tracing::debug!(count = links.len(), "decoded link table");
    Ok(links)
}

/// Kernel device type names, lowercase as `networkctl` prints them.
const ARPHRD_NAMES: &[(u16, &str)] = &[
    (0, "netrom"),
    (1, "ether"),
    (2, "eether"),
    (3, "ax25"),
    (4, "pronet"),
    (5, "chaos"),
    (6, "ieee802"),
    (7, "arcnet"),
    (8, "appletlk"),
    (15, "dlci"),
    (19, "atm"),
    (23, "metricom"),
    (24, "ieee1394"),
    (27, "eui64"),
    (32, "infiniband"),
    (256, "slip"),
    (257, "cslip"),
    (258, "slip6"),
    (259, "cslip6"),
    (260, "rsrvd"),
    (264, "adapt"),
    (270, "rose"),
    (271, "x25"),
    (272, "hwx25"),
    (280, "can"),
    (512, "ppp"),
    (513, "hdlc"),
    (516, "lapb"),
    (517, "ddcmp"),
    (518, "rawhdlc"),
    (519, "rawip"),
    (768, "tunnel"),
    (769, "tunnel6"),
    (770, "frad"),
    (771, "skip"),
    (772, "loopback"),
    (773, "localtlk"),
    (774, "fddi"),
    (775, "bif"),
    (776, "sit"),
    (777, "ipddp"),
    (778, "ipgre"),
    (779, "pimreg"),
    (780, "hippi"),
    (781, "ash"),
    (782, "econet"),
    (783, "irda"),
    (784, "fcpp"),
    (785, "fcal"),
    (786, "fcpl"),
    (787, "fcfabric"),
    (800, "ieee802_tr"),
    (801, "ieee80211"),
    (802, "ieee80211_prism"),
    (803, "ieee80211_radiotap"),
    (804, "ieee802154"),
    (805, "ieee802154_monitor"),
    (820, "phonet"),
    (821, "phonet_pipe"),
    (822, "caif"),
    (823, "ip6gre"),
    (824, "netlink"),
    (825, "6lowpan"),
    (826, "vsockmon"),
    (0xfffe, "none"),
    (0xffff, "void"),
];

/// Name an interface type.
///
/// Ethernet devices that udev tags as `wlan` or `wwan` report that instead
/// of `ether`. Unknown device types have no name.
pub fn link_type_string(iftype: u16, devtype: Option<&str>) -> Option<String> {
    if iftype == ARPHRD_ETHER
        && let Some(devtype @ ("wlan" | "wwan")) = devtype
    {
        return Some(devtype.to_string());
    }

    ARPHRD_NAMES
        .iter()
        .find(|(code, _)| *code == iftype)
        .map(|(_, name)| name.to_string())
}

/// Find a link by numeric index or, failing that, by exact name.
pub fn find_link<'a>(links: &'a [LinkRecord], name: &str) -> Option<&'a LinkRecord> {
    if let Ok(index) = name.parse::<u32>()
        && let Some(link) = links.iter().find(|l| l.index == index)
    {
        return Some(link);
    }
    links.iter().find(|l| l.name == name)
}
