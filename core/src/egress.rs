//! Routes switch-outbound frames through a peer's session and onto the
//! wire (§4.6).

use crate::error::EgressError;
use crate::interface::InterfaceBinding;
use crate::peer_table::PeerHandle;
use ifctl_proto::LinkAddr;

/// Send `plaintext` to the peer at `handle` on `iface` (§4.6). Called by
/// the switch whenever it has a frame destined for this peer.
pub fn send(iface: &mut InterfaceBinding, config_unresponsive_after_ms: u64, now: u64, handle: PeerHandle, plaintext: &[u8]) -> Result<(), EgressError> {
    let Some(peer) = iface.peer_table.lookup_by_handle_mut(handle) else { return Err(EgressError::NoSuchPeer) };
    peer.bytes_out += plaintext.len() as u64;

    let stale = now.saturating_sub(peer.time_of_last_valid_msg) > config_unresponsive_after_ms;
    // The caller (the switch) owns `plaintext` and may hold it in a retry
    // queue regardless of what happens here; we only ever read it (§4.6
    // step 2's "clone" is implicit in that we never consume the caller's
    // buffer in the first place).
    let encrypted = match peer.session.encrypt(plaintext) {
        Ok(bytes) => bytes,
        // Map UNDELIVERABLE to success (transient) unless we are also past
        // the unresponsive threshold, in which case it escalates (§4.6
        // step 4, §7).
        Err(_) => return if stale { Err(EgressError::Undeliverable) } else { Ok(()) },
    };

    let link_addr: LinkAddr = peer.link_addr.clone();
    let mut frame = link_addr.encode();
    frame.extend_from_slice(&encrypted);
    iface.transport.send(&frame);
    Ok(())
}
