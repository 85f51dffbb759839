//! The cryptographic session layer is an external collaborator (§1): it
//! performs the authenticated handshake and frame encryption. This module
//! defines only the interface the interface controller consumes.

use ifctl_proto::PublicKey;
use thiserror::Error;

/// Handshake progress as reported by the session, mirroring
/// `CryptoAuth_State` in the original (§3 `state` field, session half).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    New,
    Handshake1,
    Handshake2,
    Handshake3,
    Established,
}

impl SessionState {
    pub fn is_established(&self) -> bool { matches!(self, SessionState::Established) }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("authentication failed")]
    AuthenticationFailed,
    #[error("malformed ciphertext")]
    Malformed,
    /// Transient delivery failure (§4.6, §7): the session could not
    /// deliver the frame right now but the peer is not necessarily dead.
    #[error("undeliverable")]
    Undeliverable,
}

/// Cumulative replay-protector counters, surfaced verbatim in
/// [`crate::stats::PeerStats`] (§4.10, §11.1).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub duplicates: u32,
    pub lost_packets: u32,
    pub received_out_of_range: u32,
}

/// The result of a successful decrypt (§4.5 step 2): the plaintext plus
/// whatever the session now knows about the peer's identity and
/// handshake progress.
pub struct DecryptOutcome {
    pub plaintext: Vec<u8>,
    pub state: SessionState,
    pub remote_pubkey: Option<PublicKey>,
}

/// An authenticated, encrypted channel to one peer. Owned exclusively by
/// the [`crate::peer::Peer`] it belongs to.
pub trait CryptoSession {
    fn state(&self) -> SessionState;
    fn remote_pubkey(&self) -> Option<PublicKey>;
    /// The username this session authenticated under, if any (§11.1).
    fn username(&self) -> Option<String>;
    /// Replace the password used to authenticate the remote side (§4.3:
    /// beacon password rotation updates an existing session in place).
    fn set_auth(&mut self, password: &[u8]);
    fn decrypt(&mut self, ciphertext: &[u8]) -> Result<DecryptOutcome, SessionError>;
    fn encrypt(&mut self, plaintext: &[u8]) -> Result<Vec<u8>, SessionError>;
    fn replay_stats(&self) -> ReplayStats;
}

/// Creates [`CryptoSession`]s and owns the process-wide accepted-credential
/// table (§3: the beacon password is "installed as an accepted credential
/// in the session layer under the username 'Local Peers'").
pub trait SessionFactory {
    fn new_initiator(&mut self, remote_pubkey: PublicKey, password: &[u8]) -> Box<dyn CryptoSession>;
    fn new_responder(&mut self) -> Box<dyn CryptoSession>;
    fn install_local_peers_credential(&mut self, password: &[u8]);
}
