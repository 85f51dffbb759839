//! De-duplication on promotion to ESTABLISHED (§3 invariant 3, §4.9).

use crate::eventbus::EventBus;
use crate::eventfanout;
use crate::interface::InterfaceBinding;
use crate::peer_table::PeerHandle;
use crate::switch::Switch;
use ifctl_proto::PublicKey;
use tracing::info;

/// If another peer on `iface` shares `promoted`'s `remote_pubkey`, swap
/// their switch attachments so the promoted peer inherits the old peer's
/// routing label (preserving forwarding continuity for the rest of the
/// system, which still references that label) and release the old peer.
///
/// Resolution of the Open Question in §9: the old peer, after the swap,
/// nominally holds the promoted peer's *former* label; since the old peer
/// is about to be destroyed anyway, that label is simply released rather
/// than reassigned (see DESIGN.md).
pub fn on_established(iface: &mut InterfaceBinding, switch: &mut dyn Switch, event_bus: &mut dyn EventBus, promoted: PeerHandle) {
    let promoted_pubkey = match iface.peer_table.lookup_by_handle(promoted).and_then(|p| p.remote_pubkey) {
        Some(key) => key,
        None => return,
    };

    let duplicate = iface
        .peer_table
        .iter()
        .find(|p| p.handle != promoted && p.remote_pubkey == Some(promoted_pubkey))
        .map(|p| p.handle);

    let Some(old_handle) = duplicate else { return };
    merge(iface, switch, event_bus, promoted, old_handle, promoted_pubkey);
}

fn merge(
    iface: &mut InterfaceBinding,
    switch: &mut dyn Switch,
    event_bus: &mut dyn EventBus,
    promoted: PeerHandle,
    old_handle: PeerHandle,
    pubkey: PublicKey,
) {
    let old_path = iface.peer_table.lookup_by_handle(old_handle).expect("duplicate just found").switch_path;
    let new_path = iface.peer_table.lookup_by_handle(promoted).expect("promoted just found").switch_path;

    switch.swap_attachments(old_path, new_path);
    iface.peer_table.lookup_by_handle_mut(promoted).expect("promoted just found").switch_path = old_path;

    let old_peer = iface.peer_table.remove_by_handle(old_handle).expect("duplicate just found");
    switch.release_path(new_path);
    info!(?pubkey, old_addr = ?old_peer.link_addr, "de-duplicated peer on promotion to ESTABLISHED");
    eventfanout::emit_peer_gone(event_bus, &old_peer);
}
