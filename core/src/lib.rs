//! The peer lifecycle state machine and link-level transport multiplexer
//! for a mesh overlay's interface controller.
//!
//! This crate implements the *core*, as scoped by the specification: the
//! peer table keyed by link address, the beacon protocol, the
//! liveness/aging loop, and the bidirectional bridge between an
//! authenticated session layer and an external switch. The cryptographic
//! session layer, the switch core, the ping engine, the event bus, and
//! link-level transports are named as external collaborators and modeled
//! here only as traits ([`session::CryptoSession`], [`switch::Switch`],
//! [`switch::SwitchPinger`], [`eventbus::EventBus`], [`transport::LinkTransport`]).

pub mod beacon_protocol;
pub mod clock;
pub mod config;
pub mod controller;
pub mod dedup;
pub mod egress;
pub mod error;
pub mod eventbus;
pub mod eventfanout;
pub mod ingress;
pub mod interface;
pub mod liveness;
pub mod peer;
pub mod peer_table;
pub mod session;
pub mod stats;
pub mod switch;
pub mod transport;

pub use clock::{Clock, MockClock, SystemClock};
pub use config::Config;
pub use controller::{Controller, InterfaceHandle};
pub use error::{EgressError, InvariantError};
pub use eventbus::EventBus;
pub use interface::BeaconState;
pub use peer::{Peer, PeerState};
pub use peer_table::{PeerHandle, PeerTable};
pub use session::{CryptoSession, DecryptOutcome, ReplayStats, SessionError, SessionFactory, SessionState};
pub use stats::PeerStats;
pub use switch::{PingOutcome, Switch, SwitchError, SwitchPath, SwitchPinger};
pub use transport::LinkTransport;
