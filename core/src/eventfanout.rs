//! Publishes PEER/PEER_GONE to the event bus and answers pathfinder
//! queries (§4.8).

use crate::eventbus::EventBus;
use crate::interface::InterfaceBinding;
use crate::peer::Peer;
use ifctl_proto::{EventTag, PathfinderEvent, PfChanNode, ALL_PATHFINDERS};

fn node_for(peer: &Peer) -> Option<PfChanNode> {
    let pubkey = peer.remote_pubkey?;
    let ip6 = peer.derived_ip?;
    Some(PfChanNode { ip6, pubkey, path: peer.switch_path.0, metric: ifctl_proto::event::METRIC_UNSET, version: peer.protocol_version })
}

/// Emit `CORE_PEER` for `peer` to all pathfinders (§6). Silently does
/// nothing if the peer has not yet learned a pubkey/derived address —
/// callers are expected to only call this once a peer has reached (or is
/// returning to) `ESTABLISHED`.
pub fn emit_peer(event_bus: &mut dyn EventBus, peer: &Peer) {
    if let Some(node) = node_for(peer) {
        event_bus.publish(PathfinderEvent::peer(ALL_PATHFINDERS, node));
    }
}

/// Emit `CORE_PEER_GONE` for `peer` to all pathfinders (§6).
pub fn emit_peer_gone(event_bus: &mut dyn EventBus, peer: &Peer) {
    if let Some(node) = node_for(peer) {
        event_bus.publish(PathfinderEvent::peer_gone(ALL_PATHFINDERS, node));
    }
}

/// Handle an inbound `PATHFINDER_PEERS` query: reply with one `CORE_PEER`
/// per ESTABLISHED peer on this interface, addressed to `pathfinder_id`
/// (§4.8, §6).
pub fn handle_pathfinder_query(event_bus: &mut dyn EventBus, iface: &InterfaceBinding, pathfinder_id: u32) {
    for peer in iface.peer_table.iter() {
        if peer.state.is_established() {
            if let Some(node) = node_for(peer) {
                event_bus.publish(PathfinderEvent { tag: EventTag::CorePeer, pathfinder_id, node });
            }
        }
    }
}
