//! Encodes and decodes broadcast neighbor advertisements, honoring each
//! interface's accept/send policy (§4.3).

use crate::config::Config;
use crate::eventbus::EventBus;
use crate::eventfanout;
use crate::interface::InterfaceBinding;
use crate::peer::Peer;
use crate::session::SessionFactory;
use crate::switch::Switch;
use ifctl_proto::{version_compatible, BeaconRecord, LinkAddr};
use tracing::{debug, trace};

/// Build the wire frame for one outgoing beacon: `[link_sockaddr(BCAST)][beacon_record]` (§4.3, §6).
pub fn encode_frame(own: &BeaconRecord) -> Vec<u8> {
    let mut frame = LinkAddr::broadcast(Vec::new()).encode();
    frame.extend_from_slice(&own.encode());
    frame
}

/// Send one beacon on `iface` if it is in `SEND` mode (§4.3). No-op
/// otherwise; called both on the periodic beacon timer and immediately
/// when an interface's beacon state transitions into `SEND` (§4.2, §4.10).
pub fn send(iface: &mut InterfaceBinding, own: &BeaconRecord) {
    if !iface.beacon_state.sends() {
        return;
    }
    let frame = encode_frame(own);
    iface.transport.send(&frame);
}

/// Handle a beacon frame received on `iface` from `sender_addr` (the link
/// address the beacon's own `link_sockaddr` header carried, with the
/// `BCAST` flag — already stripped and decoded by the ingress dispatcher).
/// `payload` is the remainder of the datagram after that header (§4.3).
#[allow(clippy::too_many_arguments)]
pub fn receive(
    iface: &mut InterfaceBinding,
    switch: &mut dyn Switch,
    session_factory: &mut dyn SessionFactory,
    event_bus: &mut dyn EventBus,
    own_pubkey: ifctl_proto::PublicKey,
    config: &Config,
    now: u64,
    sender_addr: LinkAddr,
    payload: &[u8],
) {
    if !iface.beacon_state.accepts_incoming() {
        trace!(iface = %iface.name, "beacon rejected: accept disabled");
        return;
    }
    if payload.len() < ifctl_proto::beacon::BEACON_SIZE {
        trace!(iface = %iface.name, len = payload.len(), "runt beacon payload");
        return;
    }
    let record = match BeaconRecord::decode(payload) {
        Some(r) => r,
        None => return,
    };

    let derived_ip = record.pubkey.derive_ip();
    if !derived_ip.is_valid() {
        debug!(pubkey = ?record.pubkey, "beacon pubkey does not derive a valid mesh address");
        return;
    }
    if record.pubkey == own_pubkey {
        return;
    }
    if !version_compatible(record.version) {
        debug!(version = record.version, "beacon advertises an incompatible protocol version");
        return;
    }

    if let Some(peer) = iface.peer_table.lookup_by_addr_mut(&sender_addr) {
        // Password rotation: the peer already exists at this link address;
        // update its session credential in place rather than creating a
        // second peer (§8 scenario 2).
        peer.session.set_auth(&record.password);
        return;
    }

    let path = match switch.alloc_path() {
        Ok(p) => p,
        Err(_) => {
            debug!(iface = %iface.name, "switch out of space for beacon-discovered peer");
            return;
        }
    };
    let session = session_factory.new_initiator(record.pubkey, &record.password);

    // Back-date so the next liveness scan pings this peer immediately
    // instead of waiting out a full ping_after_ms window (§4.3).
    let backdated = now.saturating_sub(config.ping_after_ms + 1);
    let handle = iface.peer_table.insert(sender_addr.clone(), |h| {
        let mut peer = Peer::new(h, sender_addr.clone(), path, session, true, backdated);
        peer.refresh_from_session();
        peer
    });

    let peer = iface.peer_table.lookup_by_handle(handle).expect("just inserted");
    eventfanout::emit_peer(event_bus, peer);
}
