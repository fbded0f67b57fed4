pub mod harbor;
pub mod ships;

pub use harbor::{
    CargoLost, DeliveryLost, DestroyHarbor, ReplenishmentDue, RoadTopologyChanged,
    SoldierReleased, StartExpedition, StartExploration, StopExpedition, StopExploration,
    UnitDepartedByRoad, UnitReleased, WareDepartedByRoad,
};
pub use ships::{ShipArrived, ShipLost};
