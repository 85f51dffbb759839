//! A single neighbor: identity, liveness bookkeeping, traffic counters, and
//! the session it wraps (§3 `Peer`).

use crate::peer_table::PeerHandle;
use crate::session::{CryptoSession, SessionState};
use crate::switch::SwitchPath;
use ifctl_proto::{DerivedIp, LinkAddr, PublicKey};

/// Liveness/handshake state (§3 `state`). The first five variants mirror
/// the session's handshake progress one-to-one (invariant 2: `ESTABLISHED`
/// only if the session reports `ESTABLISHED`); `Unresponsive` is a
/// liveness-layer state the session knows nothing about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerState {
    Unauthenticated,
    New,
    Handshake1,
    Handshake2,
    Handshake3,
    Established,
    Unresponsive,
}

impl PeerState {
    pub fn from_session(state: SessionState) -> Self {
        match state {
            SessionState::New => PeerState::New,
            SessionState::Handshake1 => PeerState::Handshake1,
            SessionState::Handshake2 => PeerState::Handshake2,
            SessionState::Handshake3 => PeerState::Handshake3,
            SessionState::Established => PeerState::Established,
        }
    }

    pub fn is_established(&self) -> bool { matches!(self, PeerState::Established) }
}

pub struct Peer {
    pub handle: PeerHandle,
    pub link_addr: LinkAddr,
    pub remote_pubkey: Option<PublicKey>,
    pub derived_ip: Option<DerivedIp>,
    pub switch_path: SwitchPath,
    pub protocol_version: u32,
    pub time_of_last_valid_msg: u64,
    pub time_of_last_ping: u64,
    pub ping_count: u64,
    pub is_incoming: bool,
    pub state: PeerState,
    pub bytes_in: u64,
    pub bytes_out: u64,
    pub session: Box<dyn CryptoSession>,
}

impl Peer {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        handle: PeerHandle,
        link_addr: LinkAddr,
        switch_path: SwitchPath,
        session: Box<dyn CryptoSession>,
        is_incoming: bool,
        now: u64,
    ) -> Self {
        let remote_pubkey = session.remote_pubkey();
        let derived_ip = remote_pubkey.map(|k| k.derive_ip());
        Peer {
            handle,
            link_addr,
            remote_pubkey,
            derived_ip,
            switch_path,
            protocol_version: 0,
            time_of_last_valid_msg: now,
            time_of_last_ping: 0,
            ping_count: 0,
            is_incoming,
            state: PeerState::from_session(session.state()),
            bytes_in: 0,
            bytes_out: 0,
            session,
        }
    }

    /// Recompute `state`/`remote_pubkey`/`derived_ip` from the session's
    /// current report (§4.5 step 2).
    pub fn refresh_from_session(&mut self) {
        self.state = PeerState::from_session(self.session.state());
        if let Some(key) = self.session.remote_pubkey() {
            self.remote_pubkey = Some(key);
            self.derived_ip = Some(key.derive_ip());
        }
    }
}
