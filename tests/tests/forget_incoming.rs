//! §8 scenario 4 plus property P6: an incoming peer with no traffic since
//! `forget_after_ms` is dropped entirely, but a peer this node bootstrapped
//! itself (outgoing) is never auto-forgotten no matter how stale.

mod support;

use ifctl_core::{Config, Controller, MockClock};
use ifctl_proto::{BeaconRecord, EventTag, LinkAddr, PublicKey};
use support::{valid_key, RecordingBus, RecordingPinger, RecordingSwitch, RecordingTransport, ScriptedFactory};

#[test]
fn incoming_peer_is_forgotten_after_forget_after_ms() {
    let own_pubkey = PublicKey::from_bytes([0xAAu8; 32]);
    let bus = RecordingBus::new();
    let switch = RecordingSwitch::new();
    let clock = MockClock::new();
    let mut controller = Controller::new(
        Config::default(),
        own_pubkey,
        Box::new(switch.clone()),
        Box::new(RecordingPinger::new()),
        Box::new(ScriptedFactory::default()),
        Box::new(bus.clone()),
        Box::new(clock.clone()),
    );
    let if_handle = controller.new_iface("eth0", Box::new(RecordingTransport::new()));
    controller.beacon_state(if_handle.0, ifctl_core::BeaconState::Accept).unwrap();

    let sender = LinkAddr::broadcast(vec![7, 7, 7, 7]);
    let record = BeaconRecord::new(ifctl_proto::CURRENT_PROTOCOL, [1u8; 20], valid_key());
    let mut frame = sender.encode();
    frame.extend_from_slice(&record.encode());
    controller.on_frame(if_handle.0, &frame);
    assert_eq!(controller.peer_stats().len(), 1);

    let config = Config::default();
    clock.advance(config.forget_after_ms + config.ping_after_ms + 2);
    controller.on_ping_scan_tick();

    assert!(controller.peer_stats().is_empty(), "stale incoming peer must be dropped");
    assert_eq!(switch.released().len(), 1);
    let gone: Vec<_> = bus.events().into_iter().filter(|e| e.tag == EventTag::CorePeerGone).collect();
    assert_eq!(gone.len(), 1);
}

#[test]
fn outgoing_peer_is_never_auto_forgotten() {
    let own_pubkey = PublicKey::from_bytes([0xAAu8; 32]);
    let clock = MockClock::new();
    let mut controller = Controller::new(
        Config::default(),
        own_pubkey,
        Box::new(RecordingSwitch::new()),
        Box::new(RecordingPinger::new()),
        Box::new(ScriptedFactory::default()),
        Box::new(RecordingBus::new()),
        Box::new(clock.clone()),
    );
    let if_handle = controller.new_iface("eth0", Box::new(RecordingTransport::new()));
    controller.bootstrap_peer(if_handle.0, valid_key(), LinkAddr::new(vec![1, 2, 3, 4]), b"password").unwrap();

    let config = Config::default();
    clock.advance(config.forget_after_ms * 4);
    for _ in 0..8 {
        controller.on_ping_scan_tick();
    }

    assert_eq!(controller.peer_stats().len(), 1, "a locally bootstrapped peer must never be auto-forgotten");
}
