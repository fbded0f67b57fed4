use bevy::prelude::*;

use crate::economy::Economy;
use crate::messages::{
    CargoLost, DeliveryLost, DestroyHarbor, ReplenishmentDue, RoadTopologyChanged,
    SoldierReleased, StartExpedition, StartExploration, StopExpedition, StopExploration,
    UnitReleased, WareDepartedByRoad,
};
use crate::routing::RoutingTable;
use crate::scheduler::Scheduler;
use crate::ships::{travel_cost, Ship, ShipRoute, ShipTask};
use crate::SimSet;

pub mod arrival;
pub mod destroy;
pub mod expedition;
pub mod queues;
pub mod scoring;
pub mod types;

#[cfg(test)]
mod tests;

pub use destroy::TeardownReport;
pub use queues::{CargoOutcome, RouteChange, UnitOutcome};
pub use types::{
    CargoWaitEntry, ConsistencyError, ExpeditionState, ExplorationState, Harbor, HarborIndex,
    ShipConnection, SoldierWaitEntry, UnitWaitEntry,
};

/// Plugin for coastal harbors: expedition lifecycles, wait queues, ship
/// arrivals and teardown.
pub struct HarborPlugin;

impl Plugin for HarborPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HarborIndex>()
            .init_resource::<RoutingTable>()
            .add_message::<StartExpedition>()
            .add_message::<StopExpedition>()
            .add_message::<StartExploration>()
            .add_message::<StopExploration>()
            .add_message::<DestroyHarbor>()
            .add_message::<RoadTopologyChanged>()
            .add_message::<DeliveryLost>()
            .add_message::<CargoLost>()
            .add_message::<UnitReleased>()
            .add_message::<SoldierReleased>()
            .add_message::<WareDepartedByRoad>()
            .add_message::<crate::messages::UnitDepartedByRoad>()
            // Owned by the scheduler and fleet plugins; registering twice
            // is harmless and keeps this plugin usable on its own
            .add_message::<ReplenishmentDue>()
            .add_message::<crate::messages::ShipArrived>()
            .add_systems(
                Update,
                (
                    register_new_harbors,
                    process_expedition_commands,
                    process_replenishment,
                    process_delivery_lost,
                    process_topology_changes,
                    process_ship_arrivals,
                    process_destroy_commands,
                )
                    .chain()
                    .in_set(SimSet::Harbors),
            );
    }
}

/// Register freshly spawned harbors with the index and the owner's economy.
fn register_new_harbors(
    new: Query<(Entity, &Harbor), Added<Harbor>>,
    mut index: ResMut<HarborIndex>,
    mut economy: ResMut<Economy>,
) {
    for (entity, harbor) in new.iter() {
        index.insert(harbor.id, entity);
        let player = economy.player_mut(harbor.owner);
        // Harbors restored from a snapshot are already in the registry
        if !player.is_harbor_registered(harbor.id) && !harbor.destroying {
            player.register_harbor(harbor.record());
            info!("harbor {:?} registered at {:?}", harbor.id, harbor.pos);
        }
    }
}

/// Apply player commands for both expedition kinds.
fn process_expedition_commands(
    mut start_exp: MessageReader<StartExpedition>,
    mut stop_exp: MessageReader<StopExpedition>,
    mut start_explo: MessageReader<StartExploration>,
    mut stop_explo: MessageReader<StopExploration>,
    mut harbors: Query<&mut Harbor>,
    mut economy: ResMut<Economy>,
    mut scheduler: ResMut<Scheduler>,
) {
    for msg in start_exp.read() {
        if let Ok(mut harbor) = harbors.get_mut(msg.harbor) {
            let player = economy.player_mut(harbor.owner);
            harbor.start_expedition(player, &mut scheduler);
        }
    }
    for msg in stop_exp.read() {
        if let Ok(mut harbor) = harbors.get_mut(msg.harbor) {
            let player = economy.player_mut(harbor.owner);
            harbor.stop_expedition(player, &mut scheduler);
        }
    }
    for msg in start_explo.read() {
        if let Ok(mut harbor) = harbors.get_mut(msg.harbor) {
            let player = economy.player_mut(harbor.owner);
            harbor.start_exploration(player);
        }
    }
    for msg in stop_explo.read() {
        if let Ok(mut harbor) = harbors.get_mut(msg.harbor) {
            let player = economy.player_mut(harbor.owner);
            harbor.stop_exploration(player);
        }
    }
}

/// Route fired replenishment timers to their harbors. Stale handles (the
/// harbor re-armed or cancelled in the meantime) are dropped.
fn process_replenishment(
    mut messages: MessageReader<ReplenishmentDue>,
    index: Res<HarborIndex>,
    mut harbors: Query<&mut Harbor>,
    mut economy: ResMut<Economy>,
    mut scheduler: ResMut<Scheduler>,
) {
    for msg in messages.read() {
        let Some(mut harbor) = index.get(msg.harbor).and_then(|e| harbors.get_mut(e).ok())
        else {
            continue;
        };
        if harbor.replenish_timer != Some(msg.handle) {
            continue;
        }
        let player = economy.player_mut(harbor.owner);
        harbor.replenishment_due(player, &mut scheduler);
    }
}

/// Settle lost deliveries: the good leaves the player totals and the
/// ordering harbor re-orders if it still wants it.
fn process_delivery_lost(
    mut messages: MessageReader<DeliveryLost>,
    index: Res<HarborIndex>,
    mut harbors: Query<&mut Harbor>,
    mut economy: ResMut<Economy>,
    mut scheduler: ResMut<Scheduler>,
) {
    for msg in messages.read() {
        let Some(mut harbor) = index.get(msg.harbor).and_then(|e| harbors.get_mut(e).ok())
        else {
            continue;
        };
        let player = economy.player_mut(harbor.owner);
        let Some(good) = player.fail_delivery(msg.handle) else {
            error!("lost delivery {:?} was not tracked", msg.handle);
            continue;
        };
        player.decrease_global_good(good, 1);
        harbor.delivery_lost(good, player, &mut scheduler);
    }
}

/// After the road network changed, every harbor re-examines its queued
/// units' routes.
fn process_topology_changes(
    mut messages: MessageReader<RoadTopologyChanged>,
    mut harbors: Query<&mut Harbor>,
    routing: Res<RoutingTable>,
    mut departed: MessageWriter<crate::messages::UnitDepartedByRoad>,
) {
    if messages.read().next().is_none() {
        return;
    }
    for mut harbor in harbors.iter_mut() {
        for change in harbor.reexamine_unit_routes(&routing) {
            match change {
                RouteChange::DepartedByRoad(unit) => {
                    let dest = unit.goal.unwrap_or(harbor.pos);
                    departed.write(crate::messages::UnitDepartedByRoad { unit, dest });
                }
                RouteChange::StoredLocally(id) => {
                    debug!("unit {:?} stranded, stored at {:?}", id, harbor.id);
                }
            }
        }
    }
}

/// One dispatch decision per arriving ship: unload a finished transport
/// leg, then ask the harbor for new work.
fn process_ship_arrivals(
    mut messages: MessageReader<crate::messages::ShipArrived>,
    index: Res<HarborIndex>,
    mut harbors: Query<&mut Harbor>,
    mut ships: Query<&mut Ship>,
    mut economy: ResMut<Economy>,
    routing: Res<RoutingTable>,
    mut ware_departed: MessageWriter<WareDepartedByRoad>,
    mut unit_departed: MessageWriter<crate::messages::UnitDepartedByRoad>,
) {
    for msg in messages.read() {
        let Ok(mut ship) = ships.get_mut(msg.ship) else {
            continue;
        };
        let Some(mut harbor) = index.get(msg.harbor).and_then(|e| harbors.get_mut(e).ok())
        else {
            // The destination died under way. Whatever was bound for it is
            // lost with it; the ship returns to the idle pool.
            let player = economy.player_mut(ship.owner);
            if let Some(task) = ship.task.take() {
                crate::ships::write_off_manifest(&task, player);
            }
            ship.route = None;
            warn!("ship {:?} found no harbor at its destination", msg.ship);
            continue;
        };

        let player = economy.player_mut(harbor.owner);
        player.note_ship_arrived(harbor.id);
        ship.pos = harbor.pos;
        ship.route = None;

        // Unload a transport leg that ends here
        let leg_ends_here =
            matches!(&ship.task, Some(ShipTask::Transport { dest, .. }) if *dest == harbor.pos);
        if leg_ends_here
            && let Some(ShipTask::Transport { units, cargo, .. }) = ship.task.take()
        {
            for unit in units {
                if let UnitOutcome::DepartedByRoad(unit) =
                    harbor.disembark_unit(unit, player, &routing)
                {
                    let dest = unit.goal.unwrap_or(harbor.pos);
                    unit_departed.write(crate::messages::UnitDepartedByRoad { unit, dest });
                }
            }
            for ware in cargo {
                match harbor.add_cargo(ware, player, &routing) {
                    Ok(CargoOutcome::DepartedByRoad(ware)) => {
                        ware_departed.write(WareDepartedByRoad { ware });
                    }
                    Ok(_) => {}
                    Err(err) => error!("unloading at {:?}: {}", harbor.id, err),
                }
            }
        }

        match harbor.handle_ship_arrival(player) {
            Some(ShipTask::Transport {
                from,
                dest,
                units,
                cargo,
            }) => {
                // Destination validity was checked during loading
                if let Some(record) = player.harbor_at(dest) {
                    ship.route = Some(ShipRoute {
                        dest: record.id,
                        eta: travel_cost(harbor.pos, record.pos),
                    });
                }
                ship.task = Some(ShipTask::Transport {
                    from,
                    dest,
                    units,
                    cargo,
                });
            }
            Some(task) => {
                // Expeditions and sea attacks leave the logistics loop here
                ship.task = Some(task);
            }
            None => {}
        }
    }
}

/// Tear harbors down in order, announcing everything released or lost,
/// then despawn them.
fn process_destroy_commands(
    mut messages: MessageReader<DestroyHarbor>,
    mut commands: Commands,
    mut harbors: Query<&mut Harbor>,
    mut index: ResMut<HarborIndex>,
    mut economy: ResMut<Economy>,
    mut scheduler: ResMut<Scheduler>,
    mut cargo_lost: MessageWriter<CargoLost>,
    mut unit_released: MessageWriter<UnitReleased>,
    mut soldier_released: MessageWriter<SoldierReleased>,
) {
    for msg in messages.read() {
        let Ok(mut harbor) = harbors.get_mut(msg.harbor) else {
            continue;
        };
        let player = economy.player_mut(harbor.owner);
        let report = harbor.tear_down(player, &mut scheduler);

        for ware in report.lost_cargo {
            cargo_lost.write(CargoLost { ware });
        }
        for unit in report.released_units {
            unit_released.write(UnitReleased {
                unit,
                pos: harbor.pos,
            });
        }
        for soldier in report.released_soldiers {
            soldier_released.write(SoldierReleased {
                soldier,
                pos: harbor.pos,
            });
        }

        commands.entity(msg.harbor).despawn();
        index.remove(harbor.id);
        info!("harbor {:?} torn down", harbor.id);
    }
}
