//! Netlink message fixtures for testing.
//!
//! Payload fixtures are hand-written byte vectors (host is assumed little
//! endian, as on every platform the crate targets); [`message`] wraps a
//! payload into a complete dump message. [`StaticDump`] serves canned
//! dumps through the [`RtnlDump`] seam.

use std::cell::Cell;

use super::connection::RtnlDump;
use super::error::{Error, Result};
use super::family::AddressFamily;
use super::message::{NLM_F_MULTI, NLMSG_HDRLEN, NlMsgHdr, NlMsgType, nlmsg_align};

/// Wrap a payload into a complete netlink message.
pub fn message(msg_type: u16, payload: &[u8]) -> Vec<u8> {
    let mut header = NlMsgHdr::new(msg_type, NLM_F_MULTI);
    header.nlmsg_len = (NLMSG_HDRLEN + payload.len()) as u32;
    header.nlmsg_seq = 1;
    let mut buf = header.as_bytes().to_vec();
    buf.extend_from_slice(payload);
    buf.resize(nlmsg_align(buf.len()), 0);
    buf
}

/// Wrap payloads of one type into a dump.
pub fn dump(msg_type: u16, payloads: &[Vec<u8>]) -> Vec<Vec<u8>> {
    payloads.iter().map(|p| message(msg_type, p)).collect()
}

/// An NLMSG_ERROR message carrying a negative `errno`.
pub fn error_message(errno: i32) -> Vec<u8> {
    let mut payload = errno.to_ne_bytes().to_vec();
    payload.extend_from_slice(NlMsgHdr::new(NlMsgType::RTM_GETNEIGH, 0).as_bytes());
    message(NlMsgType::ERROR, &payload)
}

fn push_attr(buf: &mut Vec<u8>, attr_type: u16, data: &[u8]) {
    let len = 4 + data.len();
    buf.extend_from_slice(&(len as u16).to_ne_bytes());
    buf.extend_from_slice(&attr_type.to_ne_bytes());
    buf.extend_from_slice(data);
    buf.resize(nlmsg_align(buf.len()), 0);
}

/// Link message for loopback interface.
/// Captured from: ip link show lo
pub fn link_loopback() -> Vec<u8> {
    vec![
        // ifinfomsg: family=0, pad=0, type=772 (ARPHRD_LOOPBACK), index=1, flags=0x49 (UP|LOOPBACK|RUNNING), change=0
        0x00, 0x00, // family, pad
        0x04, 0x03, // type = 772 (ARPHRD_LOOPBACK)
        0x01, 0x00, 0x00, 0x00, // index = 1
        0x49, 0x00, 0x00, 0x00, // flags = IFF_UP | IFF_LOOPBACK | IFF_RUNNING
        0x00, 0x00, 0x00, 0x00, // change = 0
        // IFLA_IFNAME = "lo"
        0x07, 0x00, // len = 7
        0x03, 0x00, // type = IFLA_IFNAME (3)
        b'l', b'o', 0x00, 0x00, // "lo\0" + padding
        // IFLA_MTU = 65536
        0x08, 0x00, // len = 8
        0x04, 0x00, // type = IFLA_MTU (4)
        0x00, 0x00, 0x01, 0x00, // mtu = 65536
        // IFLA_ADDRESS = 00:00:00:00:00:00
        0x0a, 0x00, // len = 10
        0x01, 0x00, // type = IFLA_ADDRESS (1)
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // all-zero hardware address
        0x00, 0x00, // padding
    ]
}

/// Link message for an Ethernet interface.
pub fn link_eth0() -> Vec<u8> {
    vec![
        // ifinfomsg: family=0, pad=0, type=1 (ARPHRD_ETHER), index=2, flags=0x1043 (UP|BROADCAST|RUNNING|MULTICAST), change=0
        0x00, 0x00, // family, pad
        0x01, 0x00, // type = 1 (ARPHRD_ETHER)
        0x02, 0x00, 0x00, 0x00, // index = 2
        0x43, 0x10, 0x00, 0x00, // flags
        0x00, 0x00, 0x00, 0x00, // change = 0
        // IFLA_IFNAME = "eth0"
        0x09, 0x00, // len = 9
        0x03, 0x00, // type = IFLA_IFNAME (3)
        b'e', b't', b'h', b'0', 0x00, 0x00, 0x00, 0x00, // "eth0\0" + padding
        // IFLA_MTU = 1500
        0x08, 0x00, // len = 8
        0x04, 0x00, // type = IFLA_MTU (4)
        0xdc, 0x05, 0x00, 0x00, // mtu = 1500
        // IFLA_ADDRESS = 00:1b:21:aa:bb:0c
        0x0a, 0x00, // len = 10
        0x01, 0x00, // type = IFLA_ADDRESS (1)
        0x00, 0x1b, 0x21, 0xaa, 0xbb, 0x0c, // MAC address
        0x00, 0x00, // padding
    ]
}

/// Link message with just an index, a device type and a name.
pub fn link(index: i32, iftype: u16, name: &str) -> Vec<u8> {
    let mut buf = vec![0x00, 0x00];
    buf.extend_from_slice(&iftype.to_ne_bytes());
    buf.extend_from_slice(&index.to_ne_bytes());
    buf.extend_from_slice(&[0; 8]); // flags, change
    let mut ifname = name.as_bytes().to_vec();
    ifname.push(0);
    push_attr(&mut buf, 3, &ifname); // IFLA_IFNAME
    buf
}

/// Address message for IPv4 loopback address 127.0.0.1/8.
pub fn addr_loopback_v4() -> Vec<u8> {
    vec![
        // ifaddrmsg: family=AF_INET, prefixlen=8, flags=0x80 (IFA_F_PERMANENT), scope=RT_SCOPE_HOST, index=1
        0x02, // family = AF_INET
        0x08, // prefixlen = 8
        0x80, // flags = IFA_F_PERMANENT
        0xfe, // scope = RT_SCOPE_HOST (254)
        0x01, 0x00, 0x00, 0x00, // index = 1
        // IFA_ADDRESS = 127.0.0.1
        0x08, 0x00, // len = 8
        0x01, 0x00, // type = IFA_ADDRESS (1)
        0x7f, 0x00, 0x00, 0x01, // 127.0.0.1
        // IFA_LOCAL = 127.0.0.1
        0x08, 0x00, // len = 8
        0x02, 0x00, // type = IFA_LOCAL (2)
        0x7f, 0x00, 0x00, 0x01, // 127.0.0.1
    ]
}

/// Address message for 192.168.1.10/24 on eth0.
pub fn addr_eth0_v4() -> Vec<u8> {
    vec![
        // ifaddrmsg: family=AF_INET, prefixlen=24, flags=0, scope=RT_SCOPE_UNIVERSE, index=2
        0x02, // family = AF_INET
        0x18, // prefixlen = 24
        0x00, // flags
        0x00, // scope = RT_SCOPE_UNIVERSE (0)
        0x02, 0x00, 0x00, 0x00, // index = 2
        // IFA_ADDRESS = 192.168.1.255 (peer/broadcast-ish, must be ignored for IPv4)
        0x08, 0x00, // len = 8
        0x01, 0x00, // type = IFA_ADDRESS (1)
        0xc0, 0xa8, 0x01, 0xff, // 192.168.1.255
        // IFA_LOCAL = 192.168.1.10
        0x08, 0x00, // len = 8
        0x02, 0x00, // type = IFA_LOCAL (2)
        0xc0, 0xa8, 0x01, 0x0a, // 192.168.1.10
    ]
}

/// Address message for fe80::21b:21ff:feaa:bb0c/64 on eth0.
pub fn addr_eth0_v6_link() -> Vec<u8> {
    vec![
        // ifaddrmsg: family=AF_INET6, prefixlen=64, flags=0x80 (IFA_F_PERMANENT), scope=RT_SCOPE_LINK, index=2
        0x0a, // family = AF_INET6
        0x40, // prefixlen = 64
        0x80, // flags = IFA_F_PERMANENT
        0xfd, // scope = RT_SCOPE_LINK (253)
        0x02, 0x00, 0x00, 0x00, // index = 2
        // IFA_ADDRESS = fe80::21b:21ff:feaa:bb0c
        0x14, 0x00, // len = 20
        0x01, 0x00, // type = IFA_ADDRESS (1)
        0xfe, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // fe80::
        0x02, 0x1b, 0x21, 0xff, 0xfe, 0xaa, 0xbb, 0x0c, // ::21b:21ff:feaa:bb0c
    ]
}

/// Deprecated IPv6 address 2001:db8::10/64 on eth0.
pub fn addr_eth0_v6_deprecated() -> Vec<u8> {
    vec![
        // ifaddrmsg: family=AF_INET6, prefixlen=64, flags=0x20 (IFA_F_DEPRECATED), scope=RT_SCOPE_UNIVERSE, index=2
        0x0a, // family = AF_INET6
        0x40, // prefixlen = 64
        0x20, // flags = IFA_F_DEPRECATED
        0x00, // scope = RT_SCOPE_UNIVERSE (0)
        0x02, 0x00, 0x00, 0x00, // index = 2
        // IFA_ADDRESS = 2001:db8::10
        0x14, 0x00, // len = 20
        0x01, 0x00, // type = IFA_ADDRESS (1)
        0x20, 0x01, 0x0d, 0xb8, 0x00, 0x00, 0x00, 0x00, // 2001:db8::
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x10, // ::10
    ]
}

/// Route message for default route via gateway.
pub fn route_default_v4() -> Vec<u8> {
    vec![
        // rtmsg: family=AF_INET, dst_len=0, src_len=0, tos=0, table=RT_TABLE_MAIN, protocol=RTPROT_STATIC, scope=RT_SCOPE_UNIVERSE, type=RTN_UNICAST
        0x02, // family = AF_INET
        0x00, // dst_len = 0 (default route)
        0x00, // src_len = 0
        0x00, // tos = 0
        0xfe, // table = RT_TABLE_MAIN (254)
        0x04, // protocol = RTPROT_STATIC (4)
        0x00, // scope = RT_SCOPE_UNIVERSE (0)
        0x01, // type = RTN_UNICAST (1)
        0x00, 0x00, 0x00, 0x00, // flags = 0
        // RTA_GATEWAY = 192.168.1.1
        0x08, 0x00, // len = 8
        0x05, 0x00, // type = RTA_GATEWAY (5)
        0xc0, 0xa8, 0x01, 0x01, // 192.168.1.1
        // RTA_OIF = 2
        0x08, 0x00, // len = 8
        0x04, 0x00, // type = RTA_OIF (4)
        0x02, 0x00, 0x00, 0x00, // oif = 2
    ]
}

/// Default route in the main table with explicit gateway, interface and
/// metric.
pub fn route_default(family: AddressFamily, gateway: &[u8], oif: u32, metric: u32) -> Vec<u8> {
    let mut buf = vec![
        family.as_u8(),
        0x00, // dst_len
        0x00, // src_len
        0x00, // tos
        0xfe, // table = RT_TABLE_MAIN
        0x03, // protocol = RTPROT_BOOT
        0x00, // scope = RT_SCOPE_UNIVERSE
        0x01, // type = RTN_UNICAST
        0x00, 0x00, 0x00, 0x00, // flags
    ];
    push_attr(&mut buf, 5, gateway); // RTA_GATEWAY
    push_attr(&mut buf, 4, &oif.to_ne_bytes()); // RTA_OIF
    push_attr(&mut buf, 6, &metric.to_ne_bytes()); // RTA_PRIORITY
    buf
}

/// Route message for the connected 192.168.1.0/24 subnet on eth0.
pub fn route_subnet_v4() -> Vec<u8> {
    vec![
        // rtmsg: family=AF_INET, dst_len=24, table=RT_TABLE_MAIN, protocol=RTPROT_KERNEL, scope=RT_SCOPE_LINK
        0x02, // family = AF_INET
        0x18, // dst_len = 24
        0x00, // src_len = 0
        0x00, // tos = 0
        0xfe, // table = RT_TABLE_MAIN (254)
        0x02, // protocol = RTPROT_KERNEL (2)
        0xfd, // scope = RT_SCOPE_LINK (253)
        0x01, // type = RTN_UNICAST (1)
        0x00, 0x00, 0x00, 0x00, // flags = 0
        // RTA_DST = 192.168.1.0
        0x08, 0x00, // len = 8
        0x01, 0x00, // type = RTA_DST (1)
        0xc0, 0xa8, 0x01, 0x00, // 192.168.1.0
        // RTA_OIF = 2
        0x08, 0x00, // len = 8
        0x04, 0x00, // type = RTA_OIF (4)
        0x02, 0x00, 0x00, 0x00, // oif = 2
    ]
}

/// Neighbor (ARP) message.
pub fn neighbor_arp() -> Vec<u8> {
    vec![
        // ndmsg: family=AF_INET, pad=0,0,0, ifindex=2, state=NUD_REACHABLE, flags=0, type=0
        0x02, // family = AF_INET
        0x00, 0x00, 0x00, // padding
        0x02, 0x00, 0x00, 0x00, // ifindex = 2
        0x02, 0x00, // state = NUD_REACHABLE (0x02)
        0x00, // flags = 0
        0x00, // type = 0
        // NDA_DST = 192.168.1.1
        0x08, 0x00, // len = 8
        0x01, 0x00, // type = NDA_DST (1)
        0xc0, 0xa8, 0x01, 0x01, // 192.168.1.1
        // NDA_LLADDR = aa:bb:cc:dd:ee:ff
        0x0a, 0x00, // len = 10
        0x02, 0x00, // type = NDA_LLADDR (2)
        0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff, // MAC address
        0x00, 0x00, // padding
    ]
}

/// Neighbor message with the given destination and optional link-layer
/// address.
pub fn neighbor(ifindex: i32, family: AddressFamily, dst: &[u8], lladdr: Option<&[u8]>) -> Vec<u8> {
    let mut buf = vec![family.as_u8(), 0x00, 0x00, 0x00];
    buf.extend_from_slice(&ifindex.to_ne_bytes());
    buf.extend_from_slice(&[0x02, 0x00, 0x00, 0x00]); // NUD_REACHABLE, flags, type
    push_attr(&mut buf, 1, dst); // NDA_DST
    if let Some(lladdr) = lladdr {
        push_attr(&mut buf, 2, lladdr); // NDA_LLADDR
    }
    buf
}

/// Canned dumps served through [`RtnlDump`].
#[derive(Default)]
pub struct StaticDump {
    pub links: Vec<Vec<u8>>,
    pub addresses: Vec<Vec<u8>>,
    pub routes: Vec<Vec<u8>>,
    pub neighbors: Vec<Vec<u8>>,
    /// Make address dumps fail with EPERM.
    pub fail_addresses: bool,
    /// Number of link dumps served.
    pub link_dumps: Cell<usize>,
}

impl StaticDump {
    /// A two-link system: lo and eth0 with addresses, a default route via
    /// 192.168.1.1 and its ARP entry.
    pub fn two_links() -> Self {
        Self {
            links: dump(NlMsgType::RTM_NEWLINK, &[link_eth0(), link_loopback()]),
            addresses: dump(
                NlMsgType::RTM_NEWADDR,
                &[
                    addr_loopback_v4(),
                    addr_eth0_v6_link(),
                    addr_eth0_v4(),
                    addr_eth0_v6_deprecated(),
                ],
            ),
            routes: dump(
                NlMsgType::RTM_NEWROUTE,
                &[route_subnet_v4(), route_default_v4()],
            ),
            neighbors: dump(NlMsgType::RTM_NEWNEIGH, &[neighbor_arp()]),
            ..Default::default()
        }
    }
}

impl RtnlDump for StaticDump {
    async fn dump_links(&self) -> Result<Vec<Vec<u8>>> {
        self.link_dumps.set(self.link_dumps.get() + 1);
        Ok(self.links.clone())
    }

    async fn dump_addresses(&self, _family: Option<AddressFamily>) -> Result<Vec<Vec<u8>>> {
        if self.fail_addresses {
            return Err(Error::from_errno(-1));
        }
        Ok(self.addresses.clone())
    }

    async fn dump_routes(&self, _family: Option<AddressFamily>) -> Result<Vec<Vec<u8>>> {
        Ok(self.routes.clone())
    }

    async fn dump_neighbors(
        &self,
        _ifindex: u32,
        _family: Option<AddressFamily>,
    ) -> Result<Vec<Vec<u8>>> {
        Ok(self.neighbors.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netlink::message::split_message;
    use crate::netlink::messages::{AddressMessage, LinkMessage, NeighborMessage, RouteMessage};
    use crate::netlink::parse::FromNetlink;
    use std::net::{IpAddr, Ipv4Addr};

    #[test]
    fn test_parse_link_loopback() {
        let msg = LinkMessage::from_bytes(&link_loopback()).unwrap();
        assert_eq!(msg.ifindex(), 1);
        assert_eq!(msg.iftype(), 772);
        assert_eq!(msg.name.as_deref(), Some("lo"));
        assert_eq!(msg.mtu, Some(65536));
        assert_eq!(msg.address.as_deref(), Some(&[0u8; 6][..]));
    }

    #[test]
    fn test_parse_link_eth0() {
        let msg = LinkMessage::from_bytes(&link_eth0()).unwrap();
        assert_eq!(msg.ifindex(), 2);
        assert_eq!(msg.iftype(), 1);
        assert_eq!(msg.name.as_deref(), Some("eth0"));
        assert_eq!(msg.mtu, Some(1500));
        assert_eq!(
            msg.address.as_deref(),
            Some(&[0x00, 0x1b, 0x21, 0xaa, 0xbb, 0x0c][..])
        );
    }

    #[test]
    fn test_parse_addr_eth0_v4() {
        let msg = AddressMessage::from_bytes(&addr_eth0_v4()).unwrap();
        assert_eq!(msg.ifindex(), 2);
        assert_eq!(msg.local, Some(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 10))));
        assert!(!msg.is_deprecated());
        assert!(
            AddressMessage::from_bytes(&addr_eth0_v6_deprecated())
                .unwrap()
                .is_deprecated()
        );
    }

    #[test]
    fn test_parse_route_default_v4() {
        let msg = RouteMessage::from_bytes(&route_default_v4()).unwrap();
        assert!(msg.is_default());
        assert_eq!(msg.table_id(), 254);
        assert_eq!(msg.oif, Some(2));
        assert_eq!(msg.gateway, Some(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 1))));
        assert_eq!(msg.priority, None);

        let msg = RouteMessage::from_bytes(&route_default(
            AddressFamily::Inet,
            &[10, 0, 0, 1],
            3,
            600,
        ))
        .unwrap();
        assert_eq!(msg.priority, Some(600));
        assert_eq!(msg.oif, Some(3));
    }

    #[test]
    fn test_parse_neighbor_arp() {
        let msg = NeighborMessage::from_bytes(&neighbor_arp()).unwrap();
        assert_eq!(msg.ifindex(), 2);
        assert_eq!(msg.family(), libc::AF_INET as u8);
        assert_eq!(
            msg.destination,
            Some(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 1)))
        );
        assert_eq!(msg.ether_addr(), Some([0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff]));
    }

    #[test]
    fn test_message_wrapping() {
        let msg = message(NlMsgType::RTM_NEWLINK, &link(5, 1, "veth0"));
        let (header, payload) = split_message(&msg).unwrap();
        assert_eq!(header.nlmsg_type, NlMsgType::RTM_NEWLINK);
        let link = LinkMessage::from_bytes(payload).unwrap();
        assert_eq!(link.ifindex(), 5);
        assert_eq!(link.name.as_deref(), Some("veth0"));

        let (header, _) = split_message(&error_message(-19)).unwrap();
        assert!(header.is_error());
    }
}
