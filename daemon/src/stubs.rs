//! Minimal stand-ins for the collaborators the specification names as
//! external (§1): a real deployment links in an actual `CryptoSession`,
//! `Switch`, and `SwitchPinger` implementation (and a transport for the
//! event bus, e.g. a process boundary to a pathfinder). These exist only
//! so `ifctl-daemon` links and its event loop is exercisable end-to-end;
//! none of them does anything resembling real cryptography or routing.

use ifctl_core::{CryptoSession, DecryptOutcome, EventBus, PeerHandle, ReplayStats, SessionError, SessionFactory, SessionState, Switch, SwitchError, SwitchPath, SwitchPinger};
use ifctl_proto::{PathfinderEvent, PublicKey};
use tracing::info;

/// A session that "authenticates" instantly and never encrypts anything.
/// Exists purely so the controller has something to call; a real
/// deployment replaces this with an actual CurveCP/Noise-style session.
pub struct PassthroughSession {
    remote_pubkey: Option<PublicKey>,
}

impl PassthroughSession {
    pub fn initiator(remote_pubkey: PublicKey) -> Self { PassthroughSession { remote_pubkey: Some(remote_pubkey) } }
    pub fn responder() -> Self { PassthroughSession { remote_pubkey: None } }
}

impl CryptoSession for PassthroughSession {
    fn state(&self) -> SessionState {
        if self.remote_pubkey.is_some() { SessionState::Established } else { SessionState::New }
    }
    fn remote_pubkey(&self) -> Option<PublicKey> { self.remote_pubkey }
    fn username(&self) -> Option<String> { None }
    fn set_auth(&mut self, _password: &[u8]) {}
    fn decrypt(&mut self, ciphertext: &[u8]) -> Result<DecryptOutcome, SessionError> {
        Ok(DecryptOutcome { plaintext: ciphertext.to_vec(), state: self.state(), remote_pubkey: self.remote_pubkey })
    }
    fn encrypt(&mut self, plaintext: &[u8]) -> Result<Vec<u8>, SessionError> { Ok(plaintext.to_vec()) }
    fn replay_stats(&self) -> ReplayStats { ReplayStats::default() }
}

#[derive(Default)]
pub struct PassthroughSessionFactory;

impl SessionFactory for PassthroughSessionFactory {
    fn new_initiator(&mut self, remote_pubkey: PublicKey, _password: &[u8]) -> Box<dyn CryptoSession> { Box::new(PassthroughSession::initiator(remote_pubkey)) }
    fn new_responder(&mut self) -> Box<dyn CryptoSession> { Box::new(PassthroughSession::responder()) }
    fn install_local_peers_credential(&mut self, _password: &[u8]) {}
}

/// Hands out ever-increasing path labels and forwards nowhere; a real
/// deployment replaces this with the mesh's actual switch core.
#[derive(Default)]
pub struct CountingSwitch {
    next: u64,
}

impl Switch for CountingSwitch {
    fn alloc_path(&mut self) -> Result<SwitchPath, SwitchError> {
        self.next += 1;
        Ok(SwitchPath(self.next))
    }
    fn release_path(&mut self, _path: SwitchPath) {}
    fn swap_attachments(&mut self, _a: SwitchPath, _b: SwitchPath) {}
    fn forward(&mut self, path: SwitchPath, frame: Vec<u8>) {
        info!(?path, len = frame.len(), "forwarded frame (no real switch fabric wired)");
    }
}

/// Never actually resolves an outstanding ping; a real deployment wires
/// in the switch's own ping/pong implementation.
#[derive(Default)]
pub struct NullPinger;

impl SwitchPinger for NullPinger {
    fn ping(&mut self, path: SwitchPath, handle: PeerHandle, timeout_ms: u64) {
        info!(?path, ?handle, timeout_ms, "switch ping requested (no pinger wired)");
    }
}

/// Logs every lifecycle event instead of publishing it to a pathfinder.
#[derive(Default)]
pub struct LoggingEventBus;

impl EventBus for LoggingEventBus {
    fn publish(&mut self, event: PathfinderEvent) {
        info!(?event, "pathfinder event");
    }
}
