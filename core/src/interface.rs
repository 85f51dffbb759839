//! One registered link-level transport: a name, a dense index, beacon
//! policy, and the peer table it owns exclusively (§3 `InterfaceBinding`,
//! §4.2).

use crate::peer_table::PeerTable;
use crate::transport::LinkTransport;

/// Per-interface beacon policy (§3 `beacon_state`). `Send` implies
/// `Accept` for incoming beacons (§4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeaconState {
    Off,
    Accept,
    Send,
}

impl BeaconState {
    pub fn accepts_incoming(&self) -> bool { matches!(self, BeaconState::Accept | BeaconState::Send) }
    pub fn sends(&self) -> bool { matches!(self, BeaconState::Send) }
}

/// A registered interface. Disposal (`InterfaceBinding::peer_table` being
/// dropped) releases every peer it owns, matching the scoped-release
/// contract of §4.2 and §5 ("Releasing an interface's scope releases all
/// its peers"); in safe Rust that's simply `PeerTable`'s own `Drop`
/// falling out of ordinary ownership, so no explicit hook is needed here.
pub struct InterfaceBinding {
    pub name: String,
    pub if_num: usize,
    pub beacon_state: BeaconState,
    pub peer_table: PeerTable,
    pub transport: Box<dyn LinkTransport>,
}

impl InterfaceBinding {
    pub fn new(name: impl Into<String>, if_num: usize, transport: Box<dyn LinkTransport>) -> Self {
        InterfaceBinding { name: name.into(), if_num, beacon_state: BeaconState::Off, peer_table: PeerTable::new(), transport }
    }
}
