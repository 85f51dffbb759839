//! A reference [`ifctl_core::LinkTransport`] backed by a UDP socket: one
//! bound datagram socket per registered interface, framing
//! `[link_sockaddr][payload]` exactly per §6 and setting the `BCAST` flag
//! on broadcast sends/receives (§11.3 of the full specification).
//!
//! The receive half runs on its own task (a UDP socket's inbound side has
//! no natural "push this frame into the controller" call site otherwise)
//! and forwards raw datagrams over an unbounded channel; the daemon's
//! single event loop (§5, §9 "single task drains all events") is the only
//! place `Controller::on_frame` is ever called.

use ifctl_core::LinkTransport;
use ifctl_proto::LinkAddr;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum UdpTransportError {
    #[error("failed to bind udp socket: {0}")]
    Bind(#[source] std::io::Error),
}

/// One inbound datagram, already framed with its sender's [`LinkAddr`]
/// header exactly as the ingress dispatcher expects (§6).
pub struct InboundFrame {
    pub if_num: usize,
    pub frame: Vec<u8>,
}

/// The send half of a UDP-backed interface. Implements [`LinkTransport`]
/// with `try_send_to`/`try_send` (non-blocking, matching the "recovery is
/// always local" rule — a transport that cannot send logs and drops, §7).
pub struct UdpTransport {
    if_num: usize,
    socket: Arc<UdpSocket>,
    broadcast_addr: SocketAddr,
}

impl UdpTransport {
    /// Bind `bind_addr`, spawn the receive task, and return the send half
    /// alongside a channel of inbound frames tagged with `if_num`.
    pub async fn bind(if_num: usize, bind_addr: SocketAddr, broadcast_addr: SocketAddr) -> Result<(Self, mpsc::UnboundedReceiver<InboundFrame>), UdpTransportError> {
        let socket = UdpSocket::bind(bind_addr).await.map_err(UdpTransportError::Bind)?;
        socket.set_broadcast(true).map_err(UdpTransportError::Bind)?;
        let socket = Arc::new(socket);
        let (tx, rx) = mpsc::unbounded_channel();

        let recv_socket = socket.clone();
        tokio::spawn(async move {
            let mut buf = vec![0u8; 65535];
            loop {
                let (len, from) = match recv_socket.recv_from(&mut buf).await {
                    Ok(v) => v,
                    Err(err) => {
                        warn!(%err, if_num, "udp recv error");
                        continue;
                    }
                };
                let is_bcast = from == broadcast_addr;
                let link_addr = if is_bcast { LinkAddr::broadcast(encode_sockaddr(from)) } else { LinkAddr::new(encode_sockaddr(from)) };
                let mut frame = link_addr.encode();
                frame.extend_from_slice(&buf[..len]);
                if tx.send(InboundFrame { if_num, frame }).is_err() {
                    debug!(if_num, "inbound channel closed, stopping udp receive task");
                    return;
                }
            }
        });

        Ok((UdpTransport { if_num, socket, broadcast_addr }, rx))
    }

    /// Decode the trailing bytes of a [`LinkAddr`] (produced by
    /// [`encode_sockaddr`]) back into a socket address for `try_send_to`.
    fn target_addr(&self, link_addr_bytes: &[u8]) -> Option<SocketAddr> { decode_sockaddr(link_addr_bytes) }
}

impl LinkTransport for UdpTransport {
    fn send(&mut self, frame: &[u8]) {
        let Some((link_addr, consumed)) = LinkAddr::decode(frame) else {
            warn!(if_num = self.if_num, "refusing to send frame with malformed link address header");
            return;
        };
        let payload = &frame[consumed..];
        let target = if link_addr.is_broadcast() { Some(self.broadcast_addr) } else { self.target_addr(link_addr.bytes()) };
        let Some(target) = target else {
            warn!(if_num = self.if_num, "no destination address for outbound frame");
            return;
        };
        if let Err(err) = self.socket.try_send_to(payload, target) {
            debug!(if_num = self.if_num, %err, "udp send failed");
        }
    }
}

/// Encode a [`SocketAddr`] as raw bytes suitable for a [`LinkAddr`]:
/// 4-byte IPv4 address + 2-byte port for v4, 16-byte address + 2-byte
/// port for v6 (padded by `LinkAddr::new`/`broadcast` to a multiple of 4).
fn encode_sockaddr(addr: SocketAddr) -> Vec<u8> {
    match addr {
        SocketAddr::V4(v4) => {
            let mut out = v4.ip().octets().to_vec();
            out.extend_from_slice(&v4.port().to_be_bytes());
            out
        }
        SocketAddr::V6(v6) => {
            let mut out = v6.ip().octets().to_vec();
            out.extend_from_slice(&v6.port().to_be_bytes());
            out
        }
    }
}

fn decode_sockaddr(bytes: &[u8]) -> Option<SocketAddr> {
    if bytes.len() >= 6 && bytes.len() < 18 {
        let mut octets = [0u8; 4];
        octets.copy_from_slice(&bytes[0..4]);
        let port = u16::from_be_bytes([bytes[4], bytes[5]]);
        Some(SocketAddr::from((octets, port)))
    } else if bytes.len() >= 18 {
        let mut octets = [0u8; 16];
        octets.copy_from_slice(&bytes[0..16]);
        let port = u16::from_be_bytes([bytes[16], bytes[17]]);
        Some(SocketAddr::from((octets, port)))
    } else {
        None
    }
}
