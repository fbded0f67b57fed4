use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::constants::{HARBOR_COST_BOARDS, HARBOR_COST_STONES, NUM_EXPEDITION_SCOUTS};
use crate::economy::{
    Good, HarborId, HarborRecord, Inventory, PlayerId, Soldier, Unit, UnitId, Ware, WareId,
};
use crate::map_point::{MapPoint, SeaId};
use crate::scheduler::TimerHandle;

/// Material and crew gathered for a colonization expedition.
///
/// Counts never exceed the harbor building cost; when `active` is false the
/// counts are logically zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpeditionState {
    pub active: bool,
    pub boards: u32,
    pub stones: u32,
    pub builder: bool,
}

impl ExpeditionState {
    /// Active and fully stocked with boards, stones and a builder.
    pub fn is_ready(&self) -> bool {
        self.active
            && self.boards == HARBOR_COST_BOARDS
            && self.stones == HARBOR_COST_STONES
            && self.builder
    }

    pub fn missing_boards(&self) -> u32 {
        HARBOR_COST_BOARDS - self.boards
    }

    pub fn missing_stones(&self) -> u32 {
        HARBOR_COST_STONES - self.stones
    }
}

/// Scouts gathered for an exploration expedition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplorationState {
    pub active: bool,
    pub scouts: u32,
}

impl ExplorationState {
    pub fn is_ready(&self) -> bool {
        self.active && self.scouts == NUM_EXPEDITION_SCOUTS
    }
}

/// A ware waiting for a ship, owned exclusively by the harbor until handed
/// to a ship or returned to inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CargoWaitEntry {
    pub ware: Ware,
    pub dest: MapPoint,
}

/// A unit waiting for a ship; same ownership rule as cargo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitWaitEntry {
    pub unit: Unit,
    pub dest: MapPoint,
}

/// A soldier staged for amphibious assault on the given landing point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoldierWaitEntry {
    pub soldier: Soldier,
    pub dest: MapPoint,
}

/// A reachable sibling harbor plus travel cost. Derived on demand, never
/// persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShipConnection {
    pub dest: HarborId,
    pub way_cost: u32,
}

/// Programming-error class: the harbor's bookkeeping and the economy's
/// disagree. Must not occur under correct operation; systems log it and
/// carry on rather than panic across the harbor boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConsistencyError {
    #[error("delivered ware carried a handle the economy does not track")]
    UnknownDelivery,
    #[error("delivered {0} was not counted as inbound by the harbor")]
    UntrackedInbound(Good),
    #[error("cancelled ware {0:?} is not queued at this harbor")]
    UnknownCargo(WareId),
    #[error("cancelled unit {0:?} is not queued at this harbor")]
    UnknownUnit(UnitId),
    #[error("cancelled soldier {0:?} is not staged at this harbor")]
    UnknownSoldier(UnitId),
}

/// Coastal logistics hub bridging the road network and sea transport.
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Harbor {
    pub id: HarborId,
    pub pos: MapPoint,
    pub owner: PlayerId,
    /// Adjacent sea zones, one per neighbor direction; `SeaId::NONE` where
    /// the neighbor is land.
    pub sea_ids: [SeaId; 6],
    pub inventory: Inventory,
    pub expedition: ExpeditionState,
    pub exploration: ExplorationState,
    pub cargo_queue: Vec<CargoWaitEntry>,
    pub unit_queue: Vec<UnitWaitEntry>,
    pub soldier_queue: Vec<SoldierWaitEntry>,
    /// Expedition wares ordered and still under way, per good.
    pub inbound: BTreeMap<Good, u32>,
    /// Handle of the armed replenishment timer; re-armed (not re-fired) on
    /// load, so it is restored from the snapshot's remaining delay instead
    /// of being serialized directly.
    #[serde(skip)]
    pub replenish_timer: Option<TimerHandle>,
    /// Two-phase shutdown flag; checked by every public entry point.
    pub destroying: bool,
}

impl Harbor {
    pub fn new(id: HarborId, pos: MapPoint, owner: PlayerId, sea_ids: [SeaId; 6]) -> Self {
        Self {
            id,
            pos,
            owner,
            sea_ids,
            inventory: Inventory::default(),
            expedition: ExpeditionState::default(),
            exploration: ExplorationState::default(),
            cargo_queue: Vec::new(),
            unit_queue: Vec::new(),
            soldier_queue: Vec::new(),
            inbound: BTreeMap::new(),
            replenish_timer: None,
            destroying: false,
        }
    }

    /// Registry entry for this harbor.
    pub fn record(&self) -> HarborRecord {
        HarborRecord {
            id: self.id,
            pos: self.pos,
            sea_ids: self.sea_ids,
        }
    }

    pub fn inbound_count(&self, good: Good) -> u32 {
        self.inbound.get(&good).copied().unwrap_or(0)
    }

    pub(crate) fn inbound_add(&mut self, good: Good) {
        *self.inbound.entry(good).or_default() += 1;
    }

    pub(crate) fn inbound_remove(&mut self, good: Good) -> bool {
        match self.inbound.get_mut(&good) {
            Some(n) if *n > 0 => {
                *n -= 1;
                true
            }
            _ => false,
        }
    }
}

/// Lookup from harbor id to its entity, maintained by the harbor plugin.
#[derive(Resource, Debug, Default)]
pub struct HarborIndex {
    entities: BTreeMap<HarborId, Entity>,
}

impl HarborIndex {
    pub fn insert(&mut self, id: HarborId, entity: Entity) {
        self.entities.insert(id, entity);
    }

    pub fn remove(&mut self, id: HarborId) {
        self.entities.remove(&id);
    }

    pub fn get(&self, id: HarborId) -> Option<Entity> {
        self.entities.get(&id).copied()
    }
}
