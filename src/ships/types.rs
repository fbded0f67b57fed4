use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::economy::{HarborId, PlayerId, Soldier, Unit, Ware};
use crate::map_point::MapPoint;

/// Work a ship picked up at a harbor. Everything aboard is owned by the
/// ship until unloaded or lost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ShipTask {
    /// Carry units and cargo to the harbor at `dest`.
    Transport {
        from: HarborId,
        dest: MapPoint,
        units: Vec<Unit>,
        cargo: Vec<Ware>,
    },
    /// Carry a fully stocked colonization expedition to a new site.
    Expedition { from: HarborId },
    /// Carry scouts along the coastline.
    Exploration { from: HarborId, scouts: u32 },
    /// Land soldiers at the given point.
    SeaAttack {
        from: HarborId,
        dest: MapPoint,
        soldiers: Vec<Soldier>,
    },
}

/// A leg currently being sailed towards a harbor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipRoute {
    pub dest: HarborId,
    /// Remaining travel cost; the ship arrives when it reaches zero.
    pub eta: u32,
}

/// A transport ship. Idle ships wait to be dispatched to whichever harbor
/// scores the highest need.
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ship {
    pub owner: PlayerId,
    pub pos: MapPoint,
    pub task: Option<ShipTask>,
    pub route: Option<ShipRoute>,
}

impl Ship {
    pub fn idle(owner: PlayerId, pos: MapPoint) -> Self {
        Self {
            owner,
            pos,
            task: None,
            route: None,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.task.is_none() && self.route.is_none()
    }
}
