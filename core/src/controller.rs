//! Top-level lifecycle: owns every interface, the shared configuration,
//! and the external collaborators, and drives the whole peer lifecycle
//! state machine (§4.10).

use crate::beacon_protocol;
use crate::clock::Clock;
use crate::config::Config;
use crate::egress;
use crate::error::EgressError;
use crate::eventbus::EventBus;
use crate::eventfanout;
use crate::ingress;
use crate::interface::{BeaconState, InterfaceBinding};
use crate::liveness::{self, PingOutcome};
use crate::peer::Peer;
use crate::peer_table::PeerHandle;
use crate::session::SessionFactory;
use crate::stats::PeerStats;
use crate::switch::{Switch, SwitchPinger};
use crate::transport::LinkTransport;
use ifctl_proto::{BeaconRecord, BeaconStateStatus, BootstrapStatus, DisconnectStatus, PublicKey};
use rand::RngCore;
use tracing::{info, instrument};

/// A handle to a registered interface, returned by [`Controller::new_iface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterfaceHandle(pub usize);

/// The peer lifecycle state machine plus its multiplexing of link-level
/// transports (§1, §4.10). Owns every interface, peer, and session
/// transitively; there is exactly one `Controller` per mesh node.
pub struct Controller {
    config: Config,
    own_pubkey: PublicKey,
    beacon_password: [u8; 20],
    interfaces: Vec<InterfaceBinding>,
    switch: Box<dyn Switch>,
    pinger: Box<dyn SwitchPinger>,
    session_factory: Box<dyn SessionFactory>,
    event_bus: Box<dyn EventBus>,
    clock: Box<dyn Clock>,
}

impl Controller {
    /// Construct a controller. Generates a fresh beacon password from a
    /// secure RNG and installs it in the session layer under the
    /// "Local Peers" username (§3).
    pub fn new(
        config: Config,
        own_pubkey: PublicKey,
        switch: Box<dyn Switch>,
        pinger: Box<dyn SwitchPinger>,
        mut session_factory: Box<dyn SessionFactory>,
        event_bus: Box<dyn EventBus>,
        clock: Box<dyn Clock>,
    ) -> Self {
        let mut beacon_password = [0u8; 20];
        rand::thread_rng().fill_bytes(&mut beacon_password);
        session_factory.install_local_peers_credential(&beacon_password);
        Controller { config, own_pubkey, beacon_password, interfaces: Vec::new(), switch, pinger, session_factory, event_bus, clock }
    }

    pub fn config(&self) -> &Config { &self.config }

    /// Number of interfaces registered so far, handy for computing the
    /// `if_num` a not-yet-registered interface will receive.
    pub fn interface_count(&self) -> usize { self.interfaces.len() }

    /// Register a new link-level transport (§4.2).
    #[instrument(skip(self, transport))]
    pub fn new_iface(&mut self, name: impl Into<String>, transport: Box<dyn LinkTransport>) -> InterfaceHandle {
        let if_num = self.interfaces.len();
        let name = name.into();
        info!(if_num, %name, "registering interface");
        self.interfaces.push(InterfaceBinding::new(name, if_num, transport));
        InterfaceHandle(if_num)
    }

    /// Update an interface's beacon policy (§4.2, §4.10). Transitioning
    /// into `SEND` fires an immediate beacon rather than waiting for the
    /// next `beacon_interval_ms` tick.
    pub fn beacon_state(&mut self, if_num: usize, new_state: BeaconState) -> Result<(), BeaconStateStatus> {
        let iface = self.interfaces.get_mut(if_num).ok_or(BeaconStateStatus::NoSuchIface)?;
        iface.beacon_state = new_state;
        if new_state.sends() {
            beacon_protocol::send(iface, &self.self_beacon_record());
        }
        Ok(())
    }

    fn self_beacon_record(&self) -> BeaconRecord { BeaconRecord::new(ifctl_proto::CURRENT_PROTOCOL, self.beacon_password, self.own_pubkey) }

    /// Locally initiate a session to a known neighbor instead of waiting
    /// to discover it via a beacon (§4.10).
    #[instrument(skip(self, password))]
    pub fn bootstrap_peer(
        &mut self,
        if_num: usize,
        remote_pubkey: PublicKey,
        link_addr: ifctl_proto::LinkAddr,
        password: &[u8],
    ) -> Result<PeerHandle, BootstrapStatus> {
        if remote_pubkey == self.own_pubkey {
            return Err(BootstrapStatus::BadKey);
        }
        if !remote_pubkey.derive_ip().is_valid() {
            return Err(BootstrapStatus::BadKey);
        }
        let iface = self.interfaces.get_mut(if_num).ok_or(BootstrapStatus::BadIfnum)?;
        if iface.peer_table.lookup_by_addr(&link_addr).is_some() {
            return Err(BootstrapStatus::Internal);
        }

        let path = self.switch.alloc_path().map_err(|_| BootstrapStatus::OutOfSpace)?;
        let session = self.session_factory.new_initiator(remote_pubkey, password);
        let now = self.clock.now_ms();
        let handle = iface.peer_table.insert(link_addr.clone(), |h| {
            let mut peer = Peer::new(h, link_addr.clone(), path, session, false, now);
            peer.refresh_from_session();
            peer
        });

        let peer = iface.peer_table.lookup_by_handle(handle).expect("just inserted");
        self.pinger.ping(peer.switch_path, handle, self.config.ping_timeout_ms);
        Ok(handle)
    }

    /// Destroy the first peer (on any interface) whose `remote_pubkey`
    /// matches (§4.10).
    pub fn disconnect_peer(&mut self, remote_pubkey: PublicKey) -> Result<(), DisconnectStatus> {
        for iface in &mut self.interfaces {
            let target = iface.peer_table.iter().find(|p| p.remote_pubkey == Some(remote_pubkey)).map(|p| p.handle);
            if let Some(handle) = target {
                if let Some(peer) = iface.peer_table.remove_by_handle(handle) {
                    self.switch.release_path(peer.switch_path);
                    eventfanout::emit_peer_gone(self.event_bus.as_mut(), &peer);
                }
                return Ok(());
            }
        }
        Err(DisconnectStatus::NotFound)
    }

    /// Snapshot every peer's stats across every interface (§4.10).
    pub fn peer_stats(&self) -> Vec<PeerStats> { self.interfaces.iter().flat_map(|iface| iface.peer_table.iter().map(PeerStats::from_peer)).collect() }

    /// Feed one raw inbound datagram from `if_num`'s transport (§4.4).
    pub fn on_frame(&mut self, if_num: usize, raw: &[u8]) {
        let now = self.clock.now_ms();
        let Controller { interfaces, switch, pinger, session_factory, event_bus, own_pubkey, config, .. } = self;
        let Some(iface) = interfaces.get_mut(if_num) else { return };
        ingress::dispatch(iface, switch.as_mut(), pinger.as_mut(), session_factory.as_mut(), event_bus.as_mut(), *own_pubkey, config, now, raw);
    }

    /// The switch calls this to deliver a plaintext frame to a peer
    /// (§4.6).
    pub fn send_to_peer(&mut self, if_num: usize, handle: PeerHandle, plaintext: &[u8]) -> Result<(), EgressError> {
        let now = self.clock.now_ms();
        let Controller { interfaces, config, .. } = self;
        let iface = interfaces.get_mut(if_num).ok_or(EgressError::NoSuchPeer)?;
        egress::send(iface, config.unresponsive_after_ms, now, handle, plaintext)
    }

    /// Driven by the `ping_scan` timer (§4.7, §5): 1024ms by default.
    pub fn on_ping_scan_tick(&mut self) {
        let now = self.clock.now_ms();
        let Controller { interfaces, switch, pinger, event_bus, config, .. } = self;
        for iface in interfaces.iter_mut() {
            liveness::tick(iface, switch.as_mut(), pinger.as_mut(), event_bus.as_mut(), config, now);
        }
    }

    /// Driven by the `beacon_tick` timer (§4.3, §5): fires every
    /// `beacon_interval_ms`, re-armed at the end of the handler.
    pub fn on_beacon_tick(&mut self) {
        let record = self.self_beacon_record();
        for iface in &mut self.interfaces {
            beacon_protocol::send(iface, &record);
        }
    }

    /// The switch-pinger's response callback (§4.7).
    pub fn handle_ping_response(&mut self, if_num: usize, handle: PeerHandle, outcome: PingOutcome) {
        let now = self.clock.now_ms();
        let Controller { interfaces, event_bus, .. } = self;
        let Some(iface) = interfaces.get_mut(if_num) else { return };
        liveness::handle_ping_response(iface, event_bus.as_mut(), now, handle, outcome);
    }

    /// Answer a `PATHFINDER_PEERS` query (§4.8, §6).
    pub fn handle_pathfinder_query(&mut self, pathfinder_id: u32) {
        let Controller { interfaces, event_bus, .. } = self;
        for iface in interfaces.iter() {
            eventfanout::handle_pathfinder_query(event_bus.as_mut(), iface, pathfinder_id);
        }
    }
}
