use serde::{Deserialize, Serialize};

use crate::economy::goods::Good;
use crate::economy::jobs::Job;
use crate::map_point::MapPoint;

/// Opaque identifier for a ware instance.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct WareId(pub u32);

/// Opaque identifier for a mobile actor.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct UnitId(pub u32);

/// Handle of an in-transit delivery created by `PlayerEconomy::request_good`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct DeliveryHandle(pub u32);

/// A single ware instance travelling through the logistics network.
///
/// `goal` is the building position the ware is routed towards; `None` means
/// the ware has no destination and will be stored wherever it lands.
/// `delivery` is set when the ware answers an explicit request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ware {
    pub id: WareId,
    pub good: Good,
    pub goal: Option<MapPoint>,
    pub delivery: Option<DeliveryHandle>,
}

impl Ware {
    pub fn new(id: WareId, good: Good, goal: Option<MapPoint>) -> Self {
        Self {
            id,
            good,
            goal,
            delivery: None,
        }
    }

    pub fn delivered_by(mut self, handle: DeliveryHandle) -> Self {
        self.delivery = Some(handle);
        self
    }
}

/// A mobile actor (worker) travelling through the logistics network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub job: Job,
    pub goal: Option<MapPoint>,
}

impl Unit {
    pub fn new(id: UnitId, job: Job, goal: Option<MapPoint>) -> Self {
        Self { id, job, goal }
    }
}

/// A soldier committed to an amphibious assault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Soldier {
    pub id: UnitId,
    pub rank: Job,
}

impl Soldier {
    pub fn new(id: UnitId, rank: Job) -> Self {
        debug_assert!(rank.is_soldier());
        Self { id, rank }
    }
}
