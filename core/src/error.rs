use thiserror::Error;

/// Errors surfaced by the switch-outbound path (§4.6, §7).
#[derive(Debug, Error)]
pub enum EgressError {
    /// The session could not deliver this frame, and the peer has also
    /// been past the unresponsive threshold — escalated per §4.6 step 4.
    #[error("peer unresponsive and undeliverable")]
    Undeliverable,
    #[error("no such peer")]
    NoSuchPeer,
}

/// A controller-internal invariant breach (§7): "the controller never
/// panics except on internal invariant breaches ... treated as programmer
/// errors." In debug builds these `debug_assert!`; in release builds the
/// controller logs and removes the offending entry rather than crash a
/// production mesh daemon over a bookkeeping bug it can route around
/// (Open Question resolution, see DESIGN.md).
#[derive(Debug, Error)]
pub enum InvariantError {
    #[error("handle {0:?} does not map to the peer that reported it")]
    HandleIdentityMismatch(crate::peer_table::PeerHandle),
}
