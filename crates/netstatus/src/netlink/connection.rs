//! Netlink connection with dump request handling.

use std::future::Future;

use super::builder::{MessageBuilder, dump_request};
use super::error::{Error, Result};
use super::family::{AddressFamily, family_or_unspec};
use super::message::{MessageIter, NlMsgError, NlMsgType, nlmsg_align};
use super::socket::NetlinkSocket;
use super::types::addr::IfAddrMsg;
use super::types::link::IfInfoMsg;
use super::types::neigh::NdMsg;
use super::types::route::RtMsg;

/// Raw dump queries the status reporter runs against the kernel.
///
/// Every method returns the complete messages (header included) in the
/// order the kernel sent them. [`Connection`] is the real implementation;
/// tests substitute canned message lists.
pub trait RtnlDump {
    /// Dump all links (`RTM_GETLINK`).
    fn dump_links(&self) -> impl Future<Output = Result<Vec<Vec<u8>>>>;

    /// Dump addresses of one family or of all families (`RTM_GETADDR`).
    fn dump_addresses(
        &self,
        family: Option<AddressFamily>,
    ) -> impl Future<Output = Result<Vec<Vec<u8>>>>;

    /// Dump routes of one family or of all families (`RTM_GETROUTE`).
    fn dump_routes(
        &self,
        family: Option<AddressFamily>,
    ) -> impl Future<Output = Result<Vec<Vec<u8>>>>;

    /// Dump the neighbor table, optionally restricted to one interface
    /// (`RTM_GETNEIGH`, 0 means every interface).
    fn dump_neighbors(
        &self,
        ifindex: u32,
        family: Option<AddressFamily>,
    ) -> impl Future<Output = Result<Vec<Vec<u8>>>>;
}

/// Netlink route connection.
pub struct Connection {
    socket: NetlinkSocket,
}

impl Connection {
    /// Open a `NETLINK_ROUTE` connection.
    pub fn new() -> Result<Self> {
        Ok(Self {
            socket: NetlinkSocket::new()?,
        })
    }

    /// Send a dump request and collect all responses.
    pub async fn dump(&self, mut builder: MessageBuilder) -> Result<Vec<Vec<u8>>> {
        let seq = self.socket.next_seq();
        builder.set_seq(seq);
        builder.set_pid(self.socket.pid());

        let msg = builder.finish();
        self.socket.send(&msg).await?;

        let mut responses = Vec::new();

        loop {
            let data = self.socket.recv_msg().await?;
            let mut done = false;
            let mut offset = 0;

            for result in MessageIter::new(&data) {
                let (header, payload) = result?;
                let start = offset;
                offset += nlmsg_align(header.nlmsg_len as usize);

                // Replies to someone else's request
                if header.nlmsg_seq != seq {
                    continue;
                }

                if header.is_error() {
                    let err = NlMsgError::from_bytes(payload)?;
                    if !err.is_ack() {
                        return Err(Error::from_errno(err.error));
                    }
                }

                if header.is_done() {
                    done = true;
                    break;
                }

                let end = (start + header.nlmsg_len as usize).min(data.len());
                responses.push(data[start..end].to_vec());
            }

            if done {
                break;
            }
        }

        tracing::trace!(messages = responses.len(), "dump complete");
        Ok(responses)
    }
}

impl RtnlDump for Connection {
    async fn dump_links(&self) -> Result<Vec<Vec<u8>>> {
        let mut builder = dump_request(NlMsgType::RTM_GETLINK);
        builder.append(&IfInfoMsg::new());
        self.dump(builder).await
    }

    async fn dump_addresses(&self, family: Option<AddressFamily>) -> Result<Vec<Vec<u8>>> {
        let mut builder = dump_request(NlMsgType::RTM_GETADDR);
        builder.append(&IfAddrMsg::new().with_family(family_or_unspec(family)));
        self.dump(builder).await
    }

    async fn dump_routes(&self, family: Option<AddressFamily>) -> Result<Vec<Vec<u8>>> {
        let mut builder = dump_request(NlMsgType::RTM_GETROUTE);
        builder.append(&RtMsg::new().with_family(family_or_unspec(family)));
        self.dump(builder).await
    }

    async fn dump_neighbors(
        &self,
        ifindex: u32,
        family: Option<AddressFamily>,
    ) -> Result<Vec<Vec<u8>>> {
        let mut builder = dump_request(NlMsgType::RTM_GETNEIGH);
        builder.append(
            &NdMsg::new()
                .with_family(family_or_unspec(family))
                .with_ifindex(ifindex as i32),
        );
        self.dump(builder).await
    }
}
