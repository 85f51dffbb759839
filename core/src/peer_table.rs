//! Per-interface mapping from link address to peer record, with stable
//! generational handles (§3 `InterfaceBinding.peer_table`, §4.1).

use crate::peer::Peer;
use ifctl_proto::LinkAddr;
use std::collections::HashMap;

/// A stable reference to a peer, valid for the lifetime of the peer
/// within its interface (§3 `handle`). Reuse of the index slot is
/// permitted once a peer is removed, but the generation counter ensures a
/// stale handle never aliases the new occupant (§4.1 "reuse is permitted
/// but must not alias a live entry").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PeerHandle {
    index: u32,
    generation: u32,
}

impl PeerHandle {
    #[cfg(test)]
    pub fn for_test(index: u32, generation: u32) -> Self { PeerHandle { index, generation } }
}

enum Slot {
    Occupied { generation: u32, peer: Peer },
    Vacant { generation: u32 },
}

/// Owns every [`Peer`] for one interface. Operations per §4.1.
#[derive(Default)]
pub struct PeerTable {
    slots: Vec<Slot>,
    free: Vec<u32>,
    by_addr: HashMap<LinkAddr, PeerHandle>,
}

impl PeerTable {
    pub fn new() -> Self { PeerTable { slots: Vec::new(), free: Vec::new(), by_addr: HashMap::new() } }

    /// Insert a new peer at `link_addr`. `make_peer` receives the handle
    /// the peer will be known by, so the peer can carry its own handle
    /// (§3 `handle` field) without a second lookup.
    ///
    /// Invariant 1 (§3): callers must ensure `link_addr` is not already
    /// present; this is enforced by the ingress/beacon call sites, which
    /// always check `lookup_by_addr` first.
    pub fn insert(&mut self, link_addr: LinkAddr, make_peer: impl FnOnce(PeerHandle) -> Peer) -> PeerHandle {
        debug_assert!(!self.by_addr.contains_key(&link_addr), "link_addr already present in peer table");

        let handle = if let Some(index) = self.free.pop() {
            let generation = match &self.slots[index as usize] {
                Slot::Vacant { generation } => *generation,
                Slot::Occupied { .. } => unreachable!("free list pointed at an occupied slot"),
            };
            PeerHandle { index, generation }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot::Vacant { generation: 0 });
            PeerHandle { index, generation: 0 }
        };

        let peer = make_peer(handle);
        self.slots[handle.index as usize] = Slot::Occupied { generation: handle.generation, peer };
        self.by_addr.insert(link_addr, handle);
        handle
    }

    pub fn lookup_by_addr(&self, link_addr: &LinkAddr) -> Option<&Peer> {
        let handle = self.by_addr.get(link_addr)?;
        self.lookup_by_handle(*handle)
    }

    pub fn lookup_by_addr_mut(&mut self, link_addr: &LinkAddr) -> Option<&mut Peer> {
        let handle = *self.by_addr.get(link_addr)?;
        self.lookup_by_handle_mut(handle)
    }

    pub fn lookup_by_handle(&self, handle: PeerHandle) -> Option<&Peer> {
        match self.slots.get(handle.index as usize)? {
            Slot::Occupied { generation, peer } if *generation == handle.generation => Some(peer),
            _ => None,
        }
    }

    pub fn lookup_by_handle_mut(&mut self, handle: PeerHandle) -> Option<&mut Peer> {
        match self.slots.get_mut(handle.index as usize)? {
            Slot::Occupied { generation, peer } if *generation == handle.generation => Some(peer),
            _ => None,
        }
    }

    /// Remove and return the peer at `handle`, if it is still present
    /// (§4.1 "discoverable by handle iff present in the peer table").
    pub fn remove_by_handle(&mut self, handle: PeerHandle) -> Option<Peer> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        let peer = match slot {
            Slot::Occupied { generation, .. } if *generation == handle.generation => {
                let next_generation = generation.wrapping_add(1);
                let occupied = std::mem::replace(slot, Slot::Vacant { generation: next_generation });
                match occupied {
                    Slot::Occupied { peer, .. } => peer,
                    Slot::Vacant { .. } => unreachable!(),
                }
            }
            _ => return None,
        };
        self.free.push(handle.index);
        self.by_addr.remove(&peer.link_addr);
        Some(peer)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Peer> {
        self.slots.iter().filter_map(|slot| match slot {
            Slot::Occupied { peer, .. } => Some(peer),
            Slot::Vacant { .. } => None,
        })
    }

    pub fn handles(&self) -> Vec<PeerHandle> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| match slot {
                Slot::Occupied { generation, .. } => Some(PeerHandle { index: index as u32, generation: *generation }),
                Slot::Vacant { .. } => None,
            })
            .collect()
    }

    pub fn count(&self) -> usize { self.by_addr.len() }
}
