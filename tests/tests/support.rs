//! Shared fakes for the end-to-end scenario tests. These model the
//! collaborators the specification names as external (§1) just well
//! enough to drive the controller through its public API; none of them
//! does anything resembling real cryptography or routing.
//!
//! Each test binary under `tests/` only uses a subset of what's defined
//! here, since every `tests/*.rs` file is compiled as its own crate.
#![allow(dead_code)]

use ifctl_core::{CryptoSession, DecryptOutcome, EventBus, PeerHandle, ReplayStats, SessionError, SessionFactory, SessionState, Switch, SwitchError, SwitchPath, SwitchPinger};
use ifctl_proto::{PathfinderEvent, PublicKey};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

/// A session whose state and identity are fixed at construction, exactly
/// like the module-level `MockSession`/`StepSession` fakes used by the
/// core crate's own unit tests — the handshake itself is out of scope
/// here, only its observable effect on the controller.
pub struct StepSession {
    pub state: SessionState,
    pub pubkey: Option<PublicKey>,
    pub last_auth: Rc<RefCell<Vec<u8>>>,
}

impl StepSession {
    pub fn new(state: SessionState, pubkey: Option<PublicKey>) -> Self {
        StepSession { state, pubkey, last_auth: Rc::new(RefCell::new(Vec::new())) }
    }
}

impl CryptoSession for StepSession {
    fn state(&self) -> SessionState { self.state }
    fn remote_pubkey(&self) -> Option<PublicKey> { self.pubkey }
    fn username(&self) -> Option<String> { None }
    fn set_auth(&mut self, password: &[u8]) { *self.last_auth.borrow_mut() = password.to_vec(); }
    fn decrypt(&mut self, ciphertext: &[u8]) -> Result<DecryptOutcome, SessionError> {
        Ok(DecryptOutcome { plaintext: ciphertext.to_vec(), state: self.state, remote_pubkey: self.pubkey })
    }
    fn encrypt(&mut self, plaintext: &[u8]) -> Result<Vec<u8>, SessionError> { Ok(plaintext.to_vec()) }
    fn replay_stats(&self) -> ReplayStats { ReplayStats::default() }
}

/// Hands out [`StepSession`]s: initiator sessions (bootstrapped or
/// beacon-discovered) come up `Established` immediately; responder
/// sessions (unsolicited inbound traffic) come up in whatever state the
/// test configures, with whatever identity the test configures.
pub struct ScriptedFactory {
    pub initiator_state: SessionState,
    pub responder_state: SessionState,
    pub responder_pubkey: Option<PublicKey>,
    pub installed_credential: Rc<RefCell<Vec<u8>>>,
}

impl Default for ScriptedFactory {
    fn default() -> Self {
        ScriptedFactory {
            initiator_state: SessionState::Established,
            responder_state: SessionState::New,
            responder_pubkey: None,
            installed_credential: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl SessionFactory for ScriptedFactory {
    fn new_initiator(&mut self, remote_pubkey: PublicKey, _password: &[u8]) -> Box<dyn CryptoSession> {
        Box::new(StepSession::new(self.initiator_state, Some(remote_pubkey)))
    }
    fn new_responder(&mut self) -> Box<dyn CryptoSession> {
        Box::new(StepSession::new(self.responder_state, self.responder_pubkey))
    }
    fn install_local_peers_credential(&mut self, password: &[u8]) {
        *self.installed_credential.borrow_mut() = password.to_vec();
    }
}

/// A session whose reported state can be flipped by the test after
/// construction, for scenarios that need a handshake to complete on a
/// later frame than the one that created the peer (e.g. triggering the
/// de-dup-on-promotion path, which only fires on the transition into
/// `Established`, not on a peer created already-`Established`).
pub struct AdvancingSession {
    state: Rc<Cell<SessionState>>,
    pubkey: Option<PublicKey>,
}

impl CryptoSession for AdvancingSession {
    fn state(&self) -> SessionState { self.state.get() }
    fn remote_pubkey(&self) -> Option<PublicKey> { self.pubkey }
    fn username(&self) -> Option<String> { None }
    fn set_auth(&mut self, _password: &[u8]) {}
    fn decrypt(&mut self, ciphertext: &[u8]) -> Result<DecryptOutcome, SessionError> {
        Ok(DecryptOutcome { plaintext: ciphertext.to_vec(), state: self.state.get(), remote_pubkey: self.pubkey })
    }
    fn encrypt(&mut self, plaintext: &[u8]) -> Result<Vec<u8>, SessionError> { Ok(plaintext.to_vec()) }
    fn replay_stats(&self) -> ReplayStats { ReplayStats::default() }
}

/// Hands out [`AdvancingSession`]s for responders, one pre-registered
/// `(state handle, pubkey)` pair per expected unknown-sender peer, in
/// creation order. The test keeps its own clone of each state handle to
/// flip it once the simulated handshake should complete.
#[derive(Default)]
pub struct AdvancingFactory {
    queue: RefCell<VecDeque<(Rc<Cell<SessionState>>, PublicKey)>>,
}

impl AdvancingFactory {
    pub fn new() -> Self { Self::default() }

    /// Register the next responder session this factory will create,
    /// returning the shared state handle the test uses to advance it.
    pub fn push_responder(&self, initial: SessionState, pubkey: PublicKey) -> Rc<Cell<SessionState>> {
        let handle = Rc::new(Cell::new(initial));
        self.queue.borrow_mut().push_back((handle.clone(), pubkey));
        handle
    }
}

impl SessionFactory for AdvancingFactory {
    fn new_initiator(&mut self, remote_pubkey: PublicKey, _password: &[u8]) -> Box<dyn CryptoSession> {
        Box::new(StepSession::new(SessionState::Established, Some(remote_pubkey)))
    }
    fn new_responder(&mut self) -> Box<dyn CryptoSession> {
        let (state, pubkey) = self.queue.borrow_mut().pop_front().expect("test under-registered responder sessions");
        Box::new(AdvancingSession { state, pubkey: Some(pubkey) })
    }
    fn install_local_peers_credential(&mut self, _password: &[u8]) {}
}

#[derive(Default)]
struct SwitchState {
    next: u64,
    forwarded: Vec<(SwitchPath, Vec<u8>)>,
    released: Vec<SwitchPath>,
    swapped: Vec<(SwitchPath, SwitchPath)>,
}

/// Allocates ever-increasing path labels and records every call, visible
/// to the test through the cloned [`Rc`] handed back by `new()` since the
/// `Box<dyn Switch>` itself is consumed by the controller.
#[derive(Clone)]
pub struct RecordingSwitch {
    state: Rc<RefCell<SwitchState>>,
}

impl RecordingSwitch {
    pub fn new() -> Self { RecordingSwitch { state: Rc::new(RefCell::new(SwitchState::default())) } }
    pub fn forwarded(&self) -> Vec<(SwitchPath, Vec<u8>)> { self.state.borrow().forwarded.clone() }
    pub fn released(&self) -> Vec<SwitchPath> { self.state.borrow().released.clone() }
    pub fn swapped(&self) -> Vec<(SwitchPath, SwitchPath)> { self.state.borrow().swapped.clone() }
}

impl Switch for RecordingSwitch {
    fn alloc_path(&mut self) -> Result<SwitchPath, SwitchError> {
        let mut s = self.state.borrow_mut();
        s.next += 1;
        Ok(SwitchPath(s.next))
    }
    fn release_path(&mut self, path: SwitchPath) { self.state.borrow_mut().released.push(path) }
    fn swap_attachments(&mut self, a: SwitchPath, b: SwitchPath) { self.state.borrow_mut().swapped.push((a, b)) }
    fn forward(&mut self, path: SwitchPath, frame: Vec<u8>) { self.state.borrow_mut().forwarded.push((path, frame)) }
}

#[derive(Clone, Default)]
pub struct RecordingPinger {
    pings: Rc<RefCell<Vec<(SwitchPath, PeerHandle)>>>,
}

impl RecordingPinger {
    pub fn new() -> Self { Self::default() }
    pub fn pings(&self) -> Vec<(SwitchPath, PeerHandle)> { self.pings.borrow().clone() }
}

impl SwitchPinger for RecordingPinger {
    fn ping(&mut self, path: SwitchPath, handle: PeerHandle, _timeout_ms: u64) { self.pings.borrow_mut().push((path, handle)) }
}

#[derive(Clone, Default)]
pub struct RecordingBus {
    events: Rc<RefCell<Vec<PathfinderEvent>>>,
}

impl RecordingBus {
    pub fn new() -> Self { Self::default() }
    pub fn events(&self) -> Vec<PathfinderEvent> { self.events.borrow().clone() }
}

impl EventBus for RecordingBus {
    fn publish(&mut self, event: PathfinderEvent) { self.events.borrow_mut().push(event) }
}

#[derive(Clone, Default)]
pub struct RecordingTransport {
    sent: Rc<RefCell<Vec<Vec<u8>>>>,
}

impl RecordingTransport {
    pub fn new() -> Self { Self::default() }
    pub fn sent(&self) -> Vec<Vec<u8>> { self.sent.borrow().clone() }
}

impl ifctl_core::LinkTransport for RecordingTransport {
    fn send(&mut self, frame: &[u8]) { self.sent.borrow_mut().push(frame.to_vec()) }
}

/// A key known to derive a valid (`0xFC`-prefixed) mesh address, reused
/// across scenario tests the same way the core crate's own beacon tests
/// do (see `proto::pubkey` tests for how this constant was found). Peer
/// identity in these tests comes from the link address, not the pubkey,
/// so every scenario that needs a key that passes validation reuses this
/// single fixture rather than hunting for more valid keys.
pub fn valid_key() -> PublicKey {
    let mut bytes = [0u8; 32];
    bytes[31] = 152;
    PublicKey::from_bytes(bytes)
}
