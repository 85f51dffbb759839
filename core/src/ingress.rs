//! Classifies incoming frames — beacon, known peer, or unknown peer —
//! and drives the session → switch uplink for decrypted traffic (§4.4,
//! §4.5).

use crate::beacon_protocol;
use crate::config::Config;
use crate::eventbus::EventBus;
use crate::eventfanout;
use crate::dedup;
use crate::interface::InterfaceBinding;
use crate::peer::{Peer, PeerState};
use crate::peer_table::PeerHandle;
use crate::session::SessionFactory;
use crate::switch::{Switch, SwitchPinger};
use ifctl_proto::{LinkAddr, PublicKey};
use tracing::{debug, trace};

/// Entry point for a raw datagram delivered by a transport on `iface`
/// (§4.4). Dispatches to the beacon protocol, an existing peer's session,
/// or creates a new responder peer for an unrecognized link address.
#[allow(clippy::too_many_arguments)]
pub fn dispatch(
    iface: &mut InterfaceBinding,
    switch: &mut dyn Switch,
    pinger: &mut dyn SwitchPinger,
    session_factory: &mut dyn SessionFactory,
    event_bus: &mut dyn EventBus,
    own_pubkey: PublicKey,
    config: &Config,
    now: u64,
    raw: &[u8],
) {
    let Some((link_addr, consumed)) = LinkAddr::decode(raw) else {
        trace!(iface = %iface.name, "dropping runt or misaligned ingress frame");
        return;
    };
    let payload = &raw[consumed..];

    if link_addr.is_broadcast() {
        beacon_protocol::receive(iface, switch, session_factory, event_bus, own_pubkey, config, now, link_addr, payload);
        return;
    }

    if let Some(handle) = iface.peer_table.lookup_by_addr(&link_addr).map(|p| p.handle) {
        decrypt_and_uplink(iface, switch, pinger, event_bus, config, now, handle, payload);
        return;
    }

    let path = match switch.alloc_path() {
        Ok(p) => p,
        Err(_) => {
            debug!(iface = %iface.name, "switch out of space for unrecognized ingress peer");
            return;
        }
    };
    let session = session_factory.new_responder();
    let handle = iface.peer_table.insert(link_addr.clone(), |h| Peer::new(h, link_addr.clone(), path, session, true, now));

    // Garbage-ingress filter (§4.4): if the first frame from an unknown
    // link address doesn't even decrypt, this was noise, not a peer.
    if !decrypt_and_uplink(iface, switch, pinger, event_bus, config, now, handle, payload) {
        if let Some(peer) = iface.peer_table.remove_by_handle(handle) {
            switch.release_path(peer.switch_path);
        }
    }
}

/// Decrypt one ciphertext frame for `handle` and run the §4.5 uplink
/// steps. Returns `false` if decryption itself failed (used by the
/// caller to decide whether to tear down a freshly created peer).
fn decrypt_and_uplink(
    iface: &mut InterfaceBinding,
    switch: &mut dyn Switch,
    pinger: &mut dyn SwitchPinger,
    event_bus: &mut dyn EventBus,
    config: &Config,
    now: u64,
    handle: PeerHandle,
    ciphertext: &[u8],
) -> bool {
    let Some(peer) = iface.peer_table.lookup_by_handle_mut(handle) else { return false };
    let outcome = match peer.session.decrypt(ciphertext) {
        Ok(o) => o,
        Err(_) => return false,
    };
    peer.bytes_in += outcome.plaintext.len() as u64;

    let state_before = peer.state;
    if !state_before.is_established() && state_before != PeerState::Unresponsive {
        handshaking_uplink(iface, switch, pinger, event_bus, config, now, handle, &outcome.plaintext);
    } else if state_before == PeerState::Unresponsive {
        // Session is established underneath (liveness-only demotion); a
        // valid frame resumes the peer without back-dating its timestamp
        // (§4.5 step 3 — a switch ping has not round-tripped yet).
        let peer = iface.peer_table.lookup_by_handle_mut(handle).expect("looked up above");
        peer.state = PeerState::Established;
        forward(iface, switch, handle, outcome.plaintext);
    } else {
        let peer = iface.peer_table.lookup_by_handle_mut(handle).expect("looked up above");
        peer.time_of_last_valid_msg = now;
        forward(iface, switch, handle, outcome.plaintext);
    }
    true
}

#[allow(clippy::too_many_arguments)]
fn handshaking_uplink(
    iface: &mut InterfaceBinding,
    switch: &mut dyn Switch,
    pinger: &mut dyn SwitchPinger,
    event_bus: &mut dyn EventBus,
    config: &Config,
    now: u64,
    handle: PeerHandle,
    plaintext: &[u8],
) {
    let peer = iface.peer_table.lookup_by_handle_mut(handle).expect("looked up by caller");
    peer.refresh_from_session();

    if peer.state.is_established() {
        dedup::on_established(iface, switch, event_bus, handle);
        if let Some(peer) = iface.peer_table.lookup_by_handle(handle) {
            eventfanout::emit_peer(event_bus, peer);
            forward(iface, switch, handle, plaintext.to_vec());
        }
        return;
    }

    // Still handshaking: only forward opportunistic pings for frames
    // explicitly addressed to this router (switch header byte 7 == 1,
    // §4.5 step 2 / §9 "preserve it literally").
    let addressed_to_router = plaintext.len() >= 8 && plaintext[7] == 1;
    if !addressed_to_router {
        return;
    }
    let peer = iface.peer_table.lookup_by_handle_mut(handle).expect("looked up above");
    if (peer.ping_count + 1) % config.opportunistic_ping_modulus != 0 {
        pinger.ping(peer.switch_path, handle, config.ping_timeout_ms);
        peer.ping_count += 1;
    }
    let _ = now;
}

fn forward(iface: &mut InterfaceBinding, switch: &mut dyn Switch, handle: PeerHandle, plaintext: Vec<u8>) {
    let Some(peer) = iface.peer_table.lookup_by_handle(handle) else { return };
    if plaintext.len() % 4 != 0 {
        debug_assert!(false, "decrypted frame is not 4-byte aligned");
        return;
    }
    switch.forward(peer.switch_path, plaintext);
}
