use crate::pubkey::{DerivedIp, PublicKey};
use serde::{Deserialize, Serialize};

/// `pathfinder_id` value meaning "all pathfinders" (§4.8).
pub const ALL_PATHFINDERS: u32 = 0xFFFF_FFFF;

/// Sentinel `metric_be` published with every peer-lifecycle event; the
/// interface controller does not compute routing metrics (§1 Non-goals).
pub const METRIC_UNSET: u32 = 0xFFFF_FFFF;

/// The tag carried in the first word of an event-bus message (§6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventTag {
    CorePeer,
    CorePeerGone,
    PathfinderPeers,
}

/// `PFChan_Node`: the peer summary carried in every lifecycle event (§6).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PfChanNode {
    pub ip6: DerivedIp,
    pub pubkey: PublicKey,
    pub path: u64,
    pub metric: u32,
    pub version: u32,
}

/// A full event-bus message: `[event_tag][pathfinder_id][PFChan_Node]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathfinderEvent {
    pub tag: EventTag,
    pub pathfinder_id: u32,
    pub node: PfChanNode,
}

impl PathfinderEvent {
    pub fn peer(pathfinder_id: u32, node: PfChanNode) -> Self { PathfinderEvent { tag: EventTag::CorePeer, pathfinder_id, node } }

    pub fn peer_gone(pathfinder_id: u32, node: PfChanNode) -> Self { PathfinderEvent { tag: EventTag::CorePeerGone, pathfinder_id, node } }
}
