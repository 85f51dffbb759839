//! The periodic scan driving ping, unresponsive marking, and forget-drop
//! (§4.7).

use crate::config::Config;
use crate::eventbus::EventBus;
use crate::eventfanout;
use crate::interface::InterfaceBinding;
use crate::peer::PeerState;
use crate::peer_table::PeerHandle;
use crate::switch::{Switch, SwitchPinger};
use rand::Rng;
use tracing::info;

/// Run one "ping one peer" pass over `iface` (§4.7). Called every
/// `ping_scan_interval_ms` for every interface; sends at most one ping
/// and/or forgets any number of stale incoming peers it passes over while
/// scanning for a ping candidate.
pub fn tick(iface: &mut InterfaceBinding, switch: &mut dyn Switch, pinger: &mut dyn SwitchPinger, event_bus: &mut dyn EventBus, config: &Config, now: u64) {
    let handles = iface.peer_table.handles();
    if handles.is_empty() {
        return;
    }
    let start = rand::thread_rng().gen_range(0..handles.len());

    for offset in 0..handles.len() {
        let handle = handles[(start + offset) % handles.len()];
        if act_on_candidate(iface, switch, pinger, event_bus, config, now, handle) {
            return;
        }
    }
}

/// Returns `true` once a ping has actually been sent (ending the scan for
/// this tick); forgetting a stale incoming peer does not count as acting,
/// so the scan continues to the next candidate in that case.
fn act_on_candidate(
    iface: &mut InterfaceBinding,
    switch: &mut dyn Switch,
    pinger: &mut dyn SwitchPinger,
    event_bus: &mut dyn EventBus,
    config: &Config,
    now: u64,
    handle: PeerHandle,
) -> bool {
    let Some(peer) = iface.peer_table.lookup_by_handle(handle) else { return false };

    let is_candidate = now >= peer.time_of_last_valid_msg.saturating_add(config.ping_after_ms)
        && now >= peer.time_of_last_ping.saturating_add(config.ping_after_ms);
    if !is_candidate {
        return false;
    }

    if peer.is_incoming && now > peer.time_of_last_valid_msg.saturating_add(config.forget_after_ms) {
        forget(iface, switch, event_bus, handle);
        return false;
    }

    let unresponsive = now > peer.time_of_last_valid_msg.saturating_add(config.unresponsive_after_ms);
    if unresponsive {
        let peer = iface.peer_table.lookup_by_handle_mut(handle).expect("looked up above");
        let was_established = peer.state.is_established();
        peer.state = PeerState::Unresponsive;
        let ping_count = peer.ping_count;
        if was_established {
            let peer = iface.peer_table.lookup_by_handle(handle).expect("looked up above");
            eventfanout::emit_peer_gone(event_bus, peer);
        }

        // Down-peer ping throttle (§4.7, §9): ping an unresponsive peer
        // only every `down_peer_ping_modulus`th scan that picks it as a
        // candidate; a skipped pass still counts as acted-on for this
        // tick's "one ping per interface" budget, and still bumps
        // `ping_count` so the throttle actually advances.
        let skip = ping_count % config.down_peer_ping_modulus != 0;
        if skip {
            bump_ping_count(iface, handle);
            return true;
        }
    }

    send_ping(iface, pinger, config, handle);
    true
}

fn bump_ping_count(iface: &mut InterfaceBinding, handle: PeerHandle) {
    if let Some(peer) = iface.peer_table.lookup_by_handle_mut(handle) {
        peer.ping_count += 1;
    }
}

fn send_ping(iface: &mut InterfaceBinding, pinger: &mut dyn SwitchPinger, config: &Config, handle: PeerHandle) {
    let Some(peer) = iface.peer_table.lookup_by_handle(handle) else { return };
    pinger.ping(peer.switch_path, handle, config.ping_timeout_ms);
    if let Some(peer) = iface.peer_table.lookup_by_handle_mut(handle) {
        peer.ping_count += 1;
    }
}

fn forget(iface: &mut InterfaceBinding, switch: &mut dyn Switch, event_bus: &mut dyn EventBus, handle: PeerHandle) {
    if let Some(peer) = iface.peer_table.remove_by_handle(handle) {
        info!(addr = ?peer.link_addr, "forgetting incoming peer with no traffic since forget_after_ms");
        switch.release_path(peer.switch_path);
        eventfanout::emit_peer_gone(event_bus, &peer);
    }
}

/// The ping-response callback (§4.7 "Ping response callback"), invoked by
/// the switch-pinger once an outstanding ping resolves or times out.
pub fn handle_ping_response(iface: &mut InterfaceBinding, event_bus: &mut dyn EventBus, now: u64, handle: PeerHandle, outcome: PingOutcome) {
    let Some(peer) = iface.peer_table.lookup_by_handle_mut(handle) else { return };
    match outcome {
        PingOutcome::Timeout => {}
        PingOutcome::Ok { version, responding_path } => {
            peer.protocol_version = version;
            peer.time_of_last_ping = now;
            if !ifctl_proto::version_compatible(version) {
                tracing::debug!(?version, "pong advertises an incompatible protocol version");
            }
            if responding_path != peer.switch_path {
                // Identity drift (§7): logged, no corrective action.
                tracing::debug!(expected = ?peer.switch_path, got = ?responding_path, "pong label mismatch");
            }
            if peer.state.is_established() {
                let peer = iface.peer_table.lookup_by_handle(handle).expect("looked up above");
                eventfanout::emit_peer(event_bus, peer);
            }
        }
    }
}

pub use crate::switch::PingOutcome;
