//! §8 scenario 1: a beacon from an unknown neighbor creates a peer and
//! publishes a `PEER` event, driven entirely through `Controller::on_frame`.

mod support;

use ifctl_core::{Config, Controller, SystemClock};
use ifctl_proto::{BeaconRecord, EventTag, LinkAddr, PublicKey};
use support::{valid_key, RecordingBus, RecordingPinger, RecordingSwitch, RecordingTransport, ScriptedFactory};

#[test]
fn beacon_from_unknown_neighbor_creates_a_peer_and_emits_peer() {
    let own_pubkey = PublicKey::from_bytes([0xAAu8; 32]);
    let bus = RecordingBus::new();
    let mut controller = Controller::new(
        Config::default(),
        own_pubkey,
        Box::new(RecordingSwitch::new()),
        Box::new(RecordingPinger::new()),
        Box::new(ScriptedFactory::default()),
        Box::new(bus.clone()),
        Box::new(SystemClock::new()),
    );

    let if_handle = controller.new_iface("eth0", Box::new(RecordingTransport::new()));
    controller.beacon_state(if_handle.0, ifctl_core::BeaconState::Accept).unwrap();

    let sender = LinkAddr::broadcast(vec![7, 7, 7, 7]);
    let record = BeaconRecord::new(ifctl_proto::CURRENT_PROTOCOL, [1u8; 20], valid_key());
    let mut frame = sender.encode();
    frame.extend_from_slice(&record.encode());

    controller.on_frame(if_handle.0, &frame);

    let stats = controller.peer_stats();
    assert_eq!(stats.len(), 1);
    assert!(stats[0].is_incoming);

    let events = bus.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].tag, EventTag::CorePeer);
}

#[test]
fn beacon_rejected_when_accept_is_off() {
    let own_pubkey = PublicKey::from_bytes([0xAAu8; 32]);
    let mut controller = Controller::new(
        Config::default(),
        own_pubkey,
        Box::new(RecordingSwitch::new()),
        Box::new(RecordingPinger::new()),
        Box::new(ScriptedFactory::default()),
        Box::new(RecordingBus::new()),
        Box::new(SystemClock::new()),
    );
    let if_handle = controller.new_iface("eth0", Box::new(RecordingTransport::new()));
    // beacon_state defaults to Off; never switched to Accept.

    let sender = LinkAddr::broadcast(vec![7, 7, 7, 7]);
    let record = BeaconRecord::new(ifctl_proto::CURRENT_PROTOCOL, [1u8; 20], valid_key());
    let mut frame = sender.encode();
    frame.extend_from_slice(&record.encode());

    controller.on_frame(if_handle.0, &frame);

    assert!(controller.peer_stats().is_empty());
}
