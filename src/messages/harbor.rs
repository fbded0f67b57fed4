use bevy::prelude::*;

use crate::economy::{DeliveryHandle, HarborId, Soldier, Unit, Ware};
use crate::map_point::MapPoint;
use crate::scheduler::TimerHandle;

/// Player command: begin collecting material for a colonization expedition.
#[derive(Message, Debug, Clone, Copy)]
pub struct StartExpedition {
    pub harbor: Entity,
}

/// Player command: abort the colonization expedition and return materials.
#[derive(Message, Debug, Clone, Copy)]
pub struct StopExpedition {
    pub harbor: Entity,
}

/// Player command: begin staffing an exploration expedition.
#[derive(Message, Debug, Clone, Copy)]
pub struct StartExploration {
    pub harbor: Entity,
}

/// Player command: abort the exploration expedition and release its scouts.
#[derive(Message, Debug, Clone, Copy)]
pub struct StopExploration {
    pub harbor: Entity,
}

/// Tear the harbor down, flushing every queue without leaking entities.
#[derive(Message, Debug, Clone, Copy)]
pub struct DestroyHarbor {
    pub harbor: Entity,
}

/// The road network changed; queued units must re-examine their routes.
#[derive(Message, Debug, Clone, Copy)]
pub struct RoadTopologyChanged;

/// A replenishment timer fired for the given harbor.
#[derive(Message, Debug, Clone, Copy)]
pub struct ReplenishmentDue {
    pub harbor: HarborId,
    pub handle: TimerHandle,
}

/// An in-transit delivery was lost under way and may need re-ordering.
#[derive(Message, Debug, Clone, Copy)]
pub struct DeliveryLost {
    pub harbor: HarborId,
    pub handle: DeliveryHandle,
}

/// A queued ware was destroyed with its harbor.
#[derive(Message, Debug, Clone)]
pub struct CargoLost {
    pub ware: Ware,
}

/// A queued unit was released to wander from the given position.
#[derive(Message, Debug, Clone)]
pub struct UnitReleased {
    pub unit: Unit,
    pub pos: MapPoint,
}

/// A staged soldier had their sea attack aborted and was released.
#[derive(Message, Debug, Clone)]
pub struct SoldierReleased {
    pub soldier: Soldier,
    pub pos: MapPoint,
}

/// A ware left the harbor over the road network instead of by sea.
#[derive(Message, Debug, Clone)]
pub struct WareDepartedByRoad {
    pub ware: Ware,
}

/// A queued unit left the harbor over the road network instead of by sea.
#[derive(Message, Debug, Clone)]
pub struct UnitDepartedByRoad {
    pub unit: Unit,
    pub dest: MapPoint,
}
