//! Wire types shared between the interface controller core and its
//! concrete transports: public keys, derived addresses, the beacon
//! record, and the event-bus messages published to pathfinders.

pub mod beacon;
pub mod event;
pub mod link_addr;
pub mod pubkey;
pub mod status;

pub use beacon::BeaconRecord;
pub use event::{EventTag, PathfinderEvent, PfChanNode, ALL_PATHFINDERS};
pub use link_addr::LinkAddr;
pub use pubkey::{DerivedIp, PublicKey};
pub use status::{BeaconStateStatus, BootstrapStatus, DisconnectStatus};

/// Current protocol version understood by this build. Beacons and pings
/// advertise a version; the controller drops anything it considers
/// incompatible with this value (see [`version_compatible`]).
pub const CURRENT_PROTOCOL: u32 = 1;

/// Two protocol versions are compatible if they share the same major
/// number. There is only one major version defined today, so this is
/// presently an equality check, but is named so a future major bump has
/// somewhere to live.
pub fn version_compatible(remote: u32) -> bool { remote == CURRENT_PROTOCOL }
