use bevy::prelude::*;

pub mod goods;
pub mod inventory;
pub mod jobs;
pub mod player;
pub mod units;

pub use goods::Good;
pub use inventory::{DualCount, Inventory};
pub use jobs::{Job, SOLDIER_JOBS};
pub use player::{
    Delivery, Economy, HarborId, HarborRecord, PlayerEconomy, PlayerId, RequestKind,
    StandingRequest, Warehouse,
};
pub use units::{DeliveryHandle, Soldier, Unit, UnitId, Ware, WareId};

/// Plugin providing the shared economy state.
///
/// The economy has no systems of its own; it is mutated synchronously by
/// whichever harbor or fleet system owns the event being processed.
pub struct EconomyPlugin;

impl Plugin for EconomyPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Economy>();
    }
}
