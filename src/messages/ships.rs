use bevy::prelude::*;

use crate::economy::HarborId;

/// A ship reached the harbor it was ordered to; the harbor now makes
/// exactly one dispatch decision.
#[derive(Message, Debug, Clone, Copy)]
pub struct ShipArrived {
    pub ship: Entity,
    pub harbor: HarborId,
}

/// A ship was destroyed before arriving at its ordered harbor.
#[derive(Message, Debug, Clone, Copy)]
pub struct ShipLost {
    pub ship: Entity,
}
