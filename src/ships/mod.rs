use bevy::prelude::*;

use crate::constants::{HARBOR_COST_BOARDS, HARBOR_COST_STONES, LOADING_OVERHEAD, WAY_COST_FACTOR};
use crate::economy::{Economy, Good, HarborId, Job, PlayerEconomy};
use crate::harbor::{Harbor, HarborIndex};
use crate::map_point::MapPoint;
use crate::messages::{ShipArrived, ShipLost};
use crate::SimSet;

pub mod types;

pub use types::{Ship, ShipRoute, ShipTask};

/// Plugin for the transport fleet: dispatching idle ships to needy harbors
/// and sailing them there.
pub struct ShipsPlugin;

impl Plugin for ShipsPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<ShipArrived>()
            .add_message::<ShipLost>()
            .add_systems(
                Update,
                (handle_ship_lost, dispatch_idle_ships, tick_ship_travel)
                    .chain()
                    .in_set(SimSet::Ships),
            );
    }
}

/// Travel cost between two points, including the fixed loading overhead.
pub fn travel_cost(from: MapPoint, to: MapPoint) -> u32 {
    WAY_COST_FACTOR * from.distance(to) + LOADING_OVERHEAD
}

/// Send every idle ship to the open ship order it can serve most urgently.
/// Ships already under way count against each harbor's need, so two idle
/// ships never answer the same single order.
fn dispatch_idle_ships(
    mut economy: ResMut<Economy>,
    index: Res<HarborIndex>,
    harbors: Query<&Harbor>,
    mut ships: Query<(Entity, &mut Ship)>,
) {
    let mut idle: Vec<(Entity, Mut<Ship>)> = ships
        .iter_mut()
        .filter(|(_, ship)| ship.is_idle())
        .collect();
    // Entity order keeps dispatch identical on every peer
    idle.sort_by_key(|(entity, _)| *entity);

    for (_, ship) in &mut idle {
        let Some(player) = economy.player(ship.owner) else {
            continue;
        };

        let mut best: Option<(HarborId, u32, u32)> = None;
        for id in player.harbors_awaiting_ships() {
            let Some(harbor) = index.get(id).and_then(|e| harbors.get(e).ok()) else {
                continue;
            };
            let points = harbor.urgency_score(player.ships_en_route_to(id));
            if points == 0 {
                continue;
            }
            let cost = travel_cost(ship.pos, harbor.pos);
            let better = match best {
                None => true,
                Some((_, best_points, best_cost)) => {
                    points > best_points || (points == best_points && cost < best_cost)
                }
            };
            if better {
                best = Some((id, points, cost));
            }
        }

        if let Some((dest, _, cost)) = best {
            ship.route = Some(ShipRoute { dest, eta: cost });
            economy.player_mut(ship.owner).note_ship_dispatched(dest);
        }
    }
}

/// Advance every travelling ship by one tick, announcing arrivals. The
/// arrival handler clears the route; an unconsumed announcement repeats
/// next tick until someone settles the ship.
fn tick_ship_travel(
    mut ships: Query<(Entity, &mut Ship)>,
    mut arrived: MessageWriter<ShipArrived>,
) {
    for (entity, mut ship) in ships.iter_mut() {
        let Some(route) = &mut ship.route else {
            continue;
        };
        if route.eta > 0 {
            route.eta -= 1;
        }
        if route.eta == 0 {
            arrived.write(ShipArrived {
                ship: entity,
                harbor: route.dest,
            });
        }
    }
}

/// Everything aboard for this task leaves the player totals. Used when the
/// ship goes down and when its destination no longer exists.
pub(crate) fn write_off_manifest(task: &ShipTask, player: &mut PlayerEconomy) {
    match task {
        ShipTask::Transport { units, cargo, .. } => {
            for unit in units {
                player.decrease_global_unit(unit.job, 1);
            }
            for ware in cargo {
                player.decrease_global_good(ware.good, 1);
            }
        }
        ShipTask::Expedition { .. } => {
            player.decrease_global_good(Good::Boards, HARBOR_COST_BOARDS);
            player.decrease_global_good(Good::Stones, HARBOR_COST_STONES);
            player.decrease_global_unit(Job::Builder, 1);
        }
        ShipTask::Exploration { scouts, .. } => {
            player.decrease_global_unit(Job::Scout, *scouts);
        }
        ShipTask::SeaAttack { soldiers, .. } => {
            for soldier in soldiers {
                player.decrease_global_unit(soldier.rank, 1);
            }
        }
    }
}

/// A ship went down. Everything aboard is gone; the harbor it was heading
/// for gets a chance to order a replacement.
fn handle_ship_lost(
    mut messages: MessageReader<ShipLost>,
    mut commands: Commands,
    mut economy: ResMut<Economy>,
    index: Res<HarborIndex>,
    harbors: Query<&Harbor>,
    ships: Query<&Ship>,
) {
    for msg in messages.read() {
        let Ok(ship) = ships.get(msg.ship) else {
            continue;
        };

        let player = economy.player_mut(ship.owner);
        if let Some(task) = &ship.task {
            write_off_manifest(task, player);
        }

        if let Some(route) = ship.route {
            player.note_ship_lost(route.dest);
            if let Some(harbor) = index.get(route.dest).and_then(|e| harbors.get(e).ok()) {
                harbor.request_ships(economy.player_mut(ship.owner));
            }
        }

        commands.entity(msg.ship).despawn();
        info!("ship {:?} lost at sea", msg.ship);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::economy::{PlayerId, Unit, UnitId, Ware, WareId};

    #[test]
    fn travel_cost_scales_with_distance() {
        let a = MapPoint::new(0, 0);
        let b = MapPoint::new(3, 1);
        assert_eq!(travel_cost(a, b), 2 * 3 + 10);
        assert_eq!(travel_cost(a, a), 10);
    }

    #[test]
    fn freshly_spawned_ship_is_idle() {
        let ship = Ship::idle(PlayerId(0), MapPoint::new(2, 2));
        assert!(ship.is_idle());
        assert!(ship.task.is_none());
    }

    #[test]
    fn written_off_manifest_leaves_the_player_totals() {
        let mut player = PlayerEconomy::default();
        player.return_good_to_inventory(Good::Fish, 2);
        player.return_unit_to_inventory(Job::Helper, 1);

        let task = ShipTask::Transport {
            from: HarborId(1),
            dest: MapPoint::new(5, 5),
            units: vec![Unit::new(UnitId(1), Job::Helper, None)],
            cargo: vec![Ware::new(WareId(1), Good::Fish, None)],
        };
        write_off_manifest(&task, &mut player);

        assert_eq!(player.global_good(Good::Fish), 1);
        assert_eq!(player.global_unit(Job::Helper), 0);
    }
}
