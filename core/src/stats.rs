//! `peer_stats` snapshot type (§4.10, §11.1).

use crate::peer::{Peer, PeerState};
use ifctl_proto::LinkAddr;

/// One peer's snapshot, as returned by `Controller::peer_stats`. The
/// replay-statistics triple is pulled verbatim from the session's replay
/// protector; `user` is the CryptoAuth username the session authenticated
/// under (§11.1), absent for sessions that never exchanged a username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerStats {
    pub addr: LinkAddr,
    pub state: PeerState,
    pub time_of_last_msg: u64,
    pub bytes_in: u64,
    pub bytes_out: u64,
    pub is_incoming: bool,
    pub user: Option<String>,
    pub duplicates: u32,
    pub lost_packets: u32,
    pub received_out_of_range: u32,
}

impl PeerStats {
    pub fn from_peer(peer: &Peer) -> Self {
        let replay = peer.session.replay_stats();
        PeerStats {
            addr: peer.link_addr.clone(),
            state: peer.state,
            time_of_last_msg: peer.time_of_last_valid_msg,
            bytes_in: peer.bytes_in,
            bytes_out: peer.bytes_out,
            is_incoming: peer.is_incoming,
            user: peer.session.username(),
            duplicates: replay.duplicates,
            lost_packets: replay.lost_packets,
            received_out_of_range: replay.received_out_of_range,
        }
    }
}
