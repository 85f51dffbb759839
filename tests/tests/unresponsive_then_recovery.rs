//! §8 scenario 3: a peer that has gone quiet past `unresponsive_after_ms`
//! is marked unresponsive (one `PEER_GONE`), then a later valid frame from
//! it resumes the peer without back-dating its timestamp.

mod support;

use ifctl_core::{Config, Controller, MockClock};
use ifctl_proto::{EventTag, LinkAddr, PublicKey};
use support::{valid_key, RecordingBus, RecordingPinger, RecordingSwitch, RecordingTransport, ScriptedFactory};

#[test]
fn unresponsive_peer_emits_one_peer_gone_then_resumes_on_traffic() {
    let own_pubkey = PublicKey::from_bytes([0xAAu8; 32]);
    let bus = RecordingBus::new();
    let clock = MockClock::new();
    let mut factory = ScriptedFactory::default();
    factory.initiator_state = ifctl_core::SessionState::Established;
    let mut controller = Controller::new(
        Config::default(),
        own_pubkey,
        Box::new(RecordingSwitch::new()),
        Box::new(RecordingPinger::new()),
        Box::new(factory),
        Box::new(bus.clone()),
        Box::new(clock.clone()),
    );
    let if_handle = controller.new_iface("eth0", Box::new(RecordingTransport::new()));

    let link_addr = LinkAddr::new(vec![1, 2, 3, 4]);
    let handle = controller.bootstrap_peer(if_handle.0, valid_key(), link_addr.clone(), b"password").unwrap();
    assert_eq!(bus.events().len(), 0, "bootstrap alone does not publish a lifecycle event");

    let config = Config::default();
    clock.advance(config.unresponsive_after_ms + 1);
    controller.on_ping_scan_tick();

    let stats = controller.peer_stats();
    assert_eq!(stats.len(), 1, "unresponsive peers stay in the table, pinged until forgotten");
    let events = bus.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].tag, EventTag::CorePeerGone);

    // A fresh inbound frame resumes the peer (§4.5 step 3): decrypted by
    // the same session, which is still Established underneath.
    let mut frame = link_addr.encode();
    frame.extend_from_slice(&[0u8; 8]);
    controller.on_frame(if_handle.0, &frame);

    let resumed = controller.peer_stats().into_iter().find(|s| s.addr == link_addr).unwrap();
    assert_eq!(resumed.state, ifctl_core::PeerState::Established);

    let _ = handle;
}
