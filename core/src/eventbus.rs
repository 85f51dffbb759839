//! The event bus carries peer-lifecycle notifications to pathfinders
//! (§1, §4.8, §6). It is an external collaborator; this module only
//! models the publish interface the event fanout uses.

use ifctl_proto::PathfinderEvent;

pub trait EventBus {
    fn publish(&mut self, event: PathfinderEvent);
}
