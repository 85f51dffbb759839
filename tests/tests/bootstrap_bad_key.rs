//! §8 scenario 6: bootstrapping with a key that doesn't derive a valid
//! mesh address, or that matches this node's own key, is rejected before
//! any peer or path is allocated.

mod support;

use ifctl_core::{Config, Controller, SystemClock};
use ifctl_proto::{BootstrapStatus, LinkAddr, PublicKey};
use support::{valid_key, RecordingBus, RecordingPinger, RecordingSwitch, RecordingTransport, ScriptedFactory};

fn new_controller(own_pubkey: PublicKey) -> (Controller, RecordingSwitch) {
    let switch = RecordingSwitch::new();
    let controller = Controller::new(
        Config::default(),
        own_pubkey,
        Box::new(switch.clone()),
        Box::new(RecordingPinger::new()),
        Box::new(ScriptedFactory::default()),
        Box::new(RecordingBus::new()),
        Box::new(SystemClock::new()),
    );
    (controller, switch)
}

#[test]
fn bootstrapping_a_key_with_no_valid_derived_address_is_rejected() {
    let own_pubkey = PublicKey::from_bytes([0xAAu8; 32]);
    let (mut controller, switch) = new_controller(own_pubkey);
    let if_handle = controller.new_iface("eth0", Box::new(RecordingTransport::new()));

    let bad_key = PublicKey::from_bytes([0x11u8; 32]); // does not derive an 0xFC address
    let result = controller.bootstrap_peer(if_handle.0, bad_key, LinkAddr::new(vec![1, 2, 3, 4]), b"password");

    assert!(matches!(result, Err(BootstrapStatus::BadKey)));
    assert!(controller.peer_stats().is_empty());
    assert!(switch.forwarded().is_empty());
}

#[test]
fn bootstrapping_ones_own_key_is_rejected() {
    let own_pubkey = valid_key();
    let (mut controller, _switch) = new_controller(own_pubkey);
    let if_handle = controller.new_iface("eth0", Box::new(RecordingTransport::new()));

    let result = controller.bootstrap_peer(if_handle.0, own_pubkey, LinkAddr::new(vec![1, 2, 3, 4]), b"password");

    assert!(matches!(result, Err(BootstrapStatus::BadKey)));
}

#[test]
fn bootstrapping_an_unknown_interface_is_rejected() {
    let own_pubkey = PublicKey::from_bytes([0xAAu8; 32]);
    let (mut controller, _switch) = new_controller(own_pubkey);

    let result = controller.bootstrap_peer(0, valid_key(), LinkAddr::new(vec![1, 2, 3, 4]), b"password");

    assert!(matches!(result, Err(BootstrapStatus::BadIfnum)));
}

#[test]
fn bootstrapping_a_valid_key_succeeds_and_pings_immediately() {
    let own_pubkey = PublicKey::from_bytes([0xAAu8; 32]);
    let pinger = RecordingPinger::new();
    let mut controller = Controller::new(
        Config::default(),
        own_pubkey,
        Box::new(RecordingSwitch::new()),
        Box::new(pinger.clone()),
        Box::new(ScriptedFactory::default()),
        Box::new(RecordingBus::new()),
        Box::new(SystemClock::new()),
    );
    let if_handle = controller.new_iface("eth0", Box::new(RecordingTransport::new()));

    let result = controller.bootstrap_peer(if_handle.0, valid_key(), LinkAddr::new(vec![1, 2, 3, 4]), b"password");

    assert!(result.is_ok());
    assert_eq!(controller.peer_stats().len(), 1);
    assert_eq!(pinger.pings().len(), 1, "bootstrap sends an immediate ping rather than waiting for the scan");
}
