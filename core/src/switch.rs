//! The switch core and the ping engine are external collaborators (§1):
//! the switch owns routing labels and forwards decrypted frames, the
//! pinger sends and matches ping/pong at the switch layer. Only their
//! interfaces are modeled here.

use crate::peer_table::PeerHandle;
use thiserror::Error;

/// An opaque routing label allocated by the switch for one peer (§3
/// `switch_path`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SwitchPath(pub u64);

#[derive(Debug, Error)]
pub enum SwitchError {
    #[error("switch has no space for a new path")]
    OutOfSpace,
}

/// The routing/switching fabric. Owns paths and forwards decrypted
/// frames; does not know about link addresses, beacons, or sessions.
pub trait Switch {
    fn alloc_path(&mut self) -> Result<SwitchPath, SwitchError>;
    fn release_path(&mut self, path: SwitchPath);
    /// Atomically swap two peers' switch-side attachments (§4.9
    /// de-duplication: "ask the switch to atomically swap the two
    /// switch-side attachments").
    fn swap_attachments(&mut self, a: SwitchPath, b: SwitchPath);
    /// Deliver a decrypted frame from a peer into the fabric (§4.5 step 5).
    fn forward(&mut self, path: SwitchPath, frame: Vec<u8>);
}

/// Outcome of an outstanding switch-level ping (§4.7 "Ping response
/// callback"). Delivered asynchronously by the pinger via
/// `Controller::handle_ping_response` once it resolves or times out.
#[derive(Debug, Clone, Copy)]
pub enum PingOutcome {
    Ok { version: u32, responding_path: SwitchPath },
    Timeout,
}

/// Sends and matches ping/pong frames at the switch layer (§4.7).
pub trait SwitchPinger {
    fn ping(&mut self, path: SwitchPath, handle: PeerHandle, timeout_ms: u64);
}
