use super::*;
use crate::constants::{
    HARBOR_COST_BOARDS, HARBOR_COST_STONES, NUM_EXPEDITION_SCOUTS, ORDER_WARES_INTERVAL,
    SHIP_CAPACITY,
};
use crate::economy::{
    Good, HarborId, Job, PlayerEconomy, PlayerId, Soldier, Unit, UnitId, Ware, WareId, Warehouse,
};
use crate::map_point::{MapPoint, SeaId};
use crate::routing::{NextHop, RoutingTable};
use crate::scheduler::Scheduler;
use crate::ships::ShipTask;

const SEA: SeaId = SeaId(1);

fn coastal_sea_ids() -> [SeaId; 6] {
    [
        SEA,
        SeaId::NONE,
        SeaId::NONE,
        SeaId::NONE,
        SeaId::NONE,
        SeaId::NONE,
    ]
}

fn harbor() -> Harbor {
    Harbor::new(HarborId(1), MapPoint::new(10, 10), PlayerId(0), coastal_sea_ids())
}

fn registered_harbor(player: &mut PlayerEconomy) -> Harbor {
    let h = harbor();
    player.register_harbor(h.record());
    h
}

fn player_with_warehouse(goods: &[(Good, u32)], units: &[(Job, u32)]) -> PlayerEconomy {
    let mut player = PlayerEconomy::default();
    let mut wh = Warehouse::default();
    for (good, n) in goods {
        wh.goods.insert(*good, *n);
    }
    for (job, n) in units {
        wh.units.insert(*job, *n);
    }
    player.warehouses.push(wh);
    player
}

fn ware(id: u32, good: Good) -> Ware {
    Ware::new(WareId(id), good, None)
}

fn unit(id: u32, job: Job, goal: MapPoint) -> Unit {
    Unit {
        id: UnitId(id),
        job,
        goal: Some(goal),
    }
}

fn soldier(id: u32) -> Soldier {
    Soldier {
        id: UnitId(id),
        rank: Job::Private,
    }
}

// ======================================================================
// Expedition lifecycle
// ======================================================================

#[test]
fn start_pulls_local_stock_and_orders_the_rest() {
    let mut player = PlayerEconomy::default();
    let mut scheduler = Scheduler::default();
    let mut h = registered_harbor(&mut player);
    h.inventory.add_good(Good::Boards, 3);
    h.inventory.add_good(Good::Stones, 4);
    h.inventory.add_unit(Job::Builder, 1);
    let mut wh = Warehouse::default();
    wh.goods.insert(Good::Boards, 10);
    player.warehouses.push(wh);

    h.start_expedition(&mut player, &mut scheduler);

    assert!(h.expedition.active);
    assert_eq!(h.expedition.boards, 3);
    assert_eq!(h.expedition.stones, HARBOR_COST_STONES);
    assert!(h.expedition.builder);
    assert_eq!(h.inventory.good(Good::Boards), 0);
    assert_eq!(h.inventory.unit(Job::Builder), 0);
    // Exactly the three missing boards are ordered
    assert_eq!(player.deliveries_for(h.id).count(), 3);
    assert_eq!(h.inbound_count(Good::Boards), 3);
}

#[test]
fn ordered_boards_complete_the_expedition() {
    let mut player = player_with_warehouse(&[(Good::Boards, 10)], &[]);
    let mut scheduler = Scheduler::default();
    let routing = RoutingTable::default();
    let mut h = registered_harbor(&mut player);
    h.inventory.add_good(Good::Boards, 3);
    h.inventory.add_good(Good::Stones, 4);
    h.inventory.add_unit(Job::Builder, 1);

    h.start_expedition(&mut player, &mut scheduler);
    assert!(!h.is_expedition_ready());

    let handles: Vec<_> = player.deliveries_for(h.id).map(|d| d.handle).collect();
    assert_eq!(handles.len(), 3);
    for (i, handle) in handles.into_iter().enumerate() {
        let delivered = ware(i as u32, Good::Boards).delivered_by(handle);
        let outcome = h.add_cargo(delivered, &mut player, &routing).unwrap();
        assert_eq!(outcome, CargoOutcome::ConsumedByExpedition);
    }

    assert!(h.is_expedition_ready());
    assert_eq!(h.needed_ship_count(), 1);
    // Readiness placed a ship order
    assert_eq!(player.ships_to_harbor(h.id), 1);
}

#[test]
fn start_is_idempotent() {
    let mut player = PlayerEconomy::default();
    let mut scheduler = Scheduler::default();
    let mut h = registered_harbor(&mut player);
    h.inventory.add_good(Good::Boards, 2);

    h.start_expedition(&mut player, &mut scheduler);
    let snapshot = h.clone();
    h.start_expedition(&mut player, &mut scheduler);

    assert_eq!(h, snapshot);
}

#[test]
fn stop_restores_everything_gathered() {
    let mut player = PlayerEconomy::default();
    let mut scheduler = Scheduler::default();
    let mut h = registered_harbor(&mut player);
    h.inventory.add_good(Good::Boards, 6);
    h.inventory.add_good(Good::Stones, 2);
    h.inventory.add_unit(Job::Builder, 1);
    let before = h.inventory.clone();

    h.start_expedition(&mut player, &mut scheduler);
    h.stop_expedition(&mut player, &mut scheduler);

    assert_eq!(h.inventory, before);
    assert_eq!(h.expedition, ExpeditionState::default());
    assert_eq!(h.replenish_timer, None);
}

#[test]
fn stop_cancels_the_open_builder_request() {
    let mut player = PlayerEconomy::default();
    let mut scheduler = Scheduler::default();
    let mut h = registered_harbor(&mut player);

    h.start_expedition(&mut player, &mut scheduler);
    assert_eq!(player.standing_requests_for(h.id).count(), 1);

    h.stop_expedition(&mut player, &mut scheduler);
    assert_eq!(player.standing_requests_for(h.id).count(), 0);
}

#[test]
fn readiness_is_monotonic_while_material_arrives() {
    let mut player = player_with_warehouse(&[(Good::Boards, 10), (Good::Stones, 10)], &[]);
    let mut scheduler = Scheduler::default();
    let routing = RoutingTable::default();
    let mut h = registered_harbor(&mut player);
    h.inventory.add_unit(Job::Builder, 1);

    h.start_expedition(&mut player, &mut scheduler);

    let handles: Vec<_> = player.deliveries_for(h.id).map(|d| (d.handle, d.good)).collect();
    assert_eq!(
        handles.len() as u32,
        HARBOR_COST_BOARDS + HARBOR_COST_STONES
    );
    let mut was_ready = false;
    for (i, (handle, good)) in handles.into_iter().enumerate() {
        let delivered = ware(i as u32, good).delivered_by(handle);
        h.add_cargo(delivered, &mut player, &routing).unwrap();
        if was_ready {
            assert!(h.is_expedition_ready());
        }
        was_ready = h.is_expedition_ready();
    }
    assert!(h.is_expedition_ready());
}

#[test]
fn builder_conversion_needs_hammer_and_spare_helper() {
    let mut player = PlayerEconomy::default();
    let mut scheduler = Scheduler::default();
    let mut h = registered_harbor(&mut player);
    h.inventory.add_good(Good::Hammer, 1);
    h.inventory.add_unit(Job::Helper, 2);

    h.start_expedition(&mut player, &mut scheduler);

    assert!(h.expedition.builder);
    assert_eq!(h.inventory.good(Good::Hammer), 0);
    assert_eq!(h.inventory.unit(Job::Helper), 1);
    assert_eq!(player.standing_requests_for(h.id).count(), 0);
}

#[test]
fn conversion_is_suppressed_when_a_sibling_has_a_builder() {
    let mut player = player_with_warehouse(&[], &[(Job::Builder, 1)]);
    let mut scheduler = Scheduler::default();
    let mut h = registered_harbor(&mut player);
    h.inventory.add_good(Good::Hammer, 1);
    h.inventory.add_unit(Job::Helper, 2);

    h.start_expedition(&mut player, &mut scheduler);

    assert!(!h.expedition.builder);
    assert_eq!(h.inventory.good(Good::Hammer), 1);
    assert_eq!(h.inventory.unit(Job::Helper), 2);
    assert_eq!(player.standing_requests_for(h.id).count(), 1);
}

#[test]
fn lone_helper_is_never_converted() {
    let mut player = PlayerEconomy::default();
    let mut scheduler = Scheduler::default();
    let mut h = registered_harbor(&mut player);
    h.inventory.add_good(Good::Hammer, 1);
    h.inventory.add_unit(Job::Helper, 1);

    h.start_expedition(&mut player, &mut scheduler);

    assert!(!h.expedition.builder);
    assert_eq!(h.inventory.unit(Job::Helper), 1);
}

#[test]
fn arriving_builder_is_absorbed_by_the_waiting_expedition() {
    let mut player = PlayerEconomy::default();
    let mut scheduler = Scheduler::default();
    let mut h = registered_harbor(&mut player);
    h.inventory.add_good(Good::Boards, 6);
    h.inventory.add_good(Good::Stones, 4);
    h.start_expedition(&mut player, &mut scheduler);
    assert!(!h.is_expedition_ready());

    let outcome = h.receive_unit(unit(1, Job::Builder, h.pos), &mut player);

    assert_eq!(outcome, UnitOutcome::JoinedExpedition);
    assert!(h.is_expedition_ready());
    assert_eq!(h.inventory.unit(Job::Builder), 0);
    assert_eq!(player.standing_requests_for(h.id).count(), 0);
}

// ======================================================================
// Replenishment timer
// ======================================================================

#[test]
fn timer_is_armed_while_material_is_missing() {
    let mut player = PlayerEconomy::default();
    let mut scheduler = Scheduler::default();
    let mut h = registered_harbor(&mut player);

    h.start_expedition(&mut player, &mut scheduler);

    let handle = h.replenish_timer.expect("timer should be armed");
    assert_eq!(scheduler.remaining(handle), Some(ORDER_WARES_INTERVAL));
}

#[test]
fn fired_timer_reorders_and_rearms() {
    // Warehouse is empty at start, stocked later; the timer retries
    let mut player = PlayerEconomy::default();
    player.warehouses.push(Warehouse::default());
    let mut scheduler = Scheduler::default();
    let mut h = registered_harbor(&mut player);

    h.start_expedition(&mut player, &mut scheduler);
    assert_eq!(player.deliveries_for(h.id).count(), 0);

    player.warehouses[0].goods.insert(Good::Boards, 2);
    h.replenishment_due(&mut player, &mut scheduler);

    assert_eq!(player.deliveries_for(h.id).count(), 2);
    assert_eq!(h.inbound_count(Good::Boards), 2);
    // Stones are still missing, so the timer is armed again
    assert!(h.replenish_timer.is_some());
}

#[test]
fn lost_delivery_is_reordered() {
    let mut player = player_with_warehouse(&[(Good::Stones, 10)], &[]);
    let mut scheduler = Scheduler::default();
    let mut h = registered_harbor(&mut player);
    h.inventory.add_good(Good::Boards, 6);
    h.inventory.add_unit(Job::Builder, 1);

    h.start_expedition(&mut player, &mut scheduler);
    assert_eq!(h.inbound_count(Good::Stones), 4);

    let handle = player.deliveries_for(h.id).next().unwrap().handle;
    let good = player.fail_delivery(handle).unwrap();
    h.delivery_lost(good, &mut player, &mut scheduler);

    // The replacement was ordered right away
    assert_eq!(h.inbound_count(Good::Stones), 4);
    assert_eq!(player.deliveries_for(h.id).count(), 4);
}

// ======================================================================
// Exploration lifecycle
// ======================================================================

#[test]
fn exploration_recruits_and_requests_missing_scouts() {
    let mut player = PlayerEconomy::default();
    let mut h = registered_harbor(&mut player);
    h.inventory.add_unit(Job::Scout, 1);
    h.inventory.add_good(Good::Bow, 1);
    h.inventory.add_unit(Job::Helper, 1);

    h.start_exploration(&mut player);

    // One present, one recruited from bow plus helper, one requested
    assert_eq!(h.exploration.scouts, 2);
    assert_eq!(h.inventory.good(Good::Bow), 0);
    assert_eq!(h.inventory.unit(Job::Helper), 0);
    assert_eq!(player.standing_requests_for(h.id).count(), 1);
    // The committed scouts stay visible in the building
    assert_eq!(h.inventory.unit(Job::Scout), 0);
    assert_eq!(h.inventory.visual_unit(Job::Scout), 2);
}

#[test]
fn arriving_scout_completes_the_exploration() {
    let mut player = PlayerEconomy::default();
    let mut h = registered_harbor(&mut player);
    h.inventory.add_unit(Job::Scout, NUM_EXPEDITION_SCOUTS - 1);

    h.start_exploration(&mut player);
    assert!(!h.is_exploration_ready());

    let outcome = h.receive_unit(unit(7, Job::Scout, h.pos), &mut player);

    assert_eq!(outcome, UnitOutcome::JoinedExploration);
    assert!(h.is_exploration_ready());
    assert_eq!(player.ships_to_harbor(h.id), 1);
}

#[test]
fn stop_exploration_releases_scouts_and_requests() {
    let mut player = PlayerEconomy::default();
    let mut h = registered_harbor(&mut player);
    h.inventory.add_unit(Job::Scout, 2);

    h.start_exploration(&mut player);
    h.stop_exploration(&mut player);

    assert_eq!(h.inventory.unit(Job::Scout), 2);
    assert_eq!(h.exploration, ExplorationState::default());
    assert_eq!(player.standing_requests_for(h.id).count(), 0);
}

// ======================================================================
// Queues and routing
// ======================================================================

#[test]
fn cargo_with_a_sea_route_waits_for_a_ship() {
    let mut player = PlayerEconomy::default();
    let mut routing = RoutingTable::default();
    let mut h = registered_harbor(&mut player);
    let goal = MapPoint::new(40, 40);
    let next = MapPoint::new(20, 10);
    routing.set_hop(h.pos, goal, NextHop::Sea(next));

    let mut w = ware(1, Good::Fish);
    w.goal = Some(goal);
    let outcome = h.add_cargo(w, &mut player, &routing).unwrap();

    assert_eq!(outcome, CargoOutcome::QueuedForShip);
    assert_eq!(h.cargo_queue.len(), 1);
    assert_eq!(h.cargo_queue[0].dest, next);
    assert_eq!(h.inventory.good(Good::Fish), 0);
    assert_eq!(h.inventory.visual_good(Good::Fish), 1);
    assert_eq!(player.ships_to_harbor(h.id), 1);
}

#[test]
fn cargo_with_a_road_route_walks_on() {
    let mut player = PlayerEconomy::default();
    let mut routing = RoutingTable::default();
    let mut h = registered_harbor(&mut player);
    let goal = MapPoint::new(12, 10);
    routing.set_hop(h.pos, goal, NextHop::Road);

    let mut w = ware(1, Good::Fish);
    w.goal = Some(goal);
    let outcome = h.add_cargo(w, &mut player, &routing).unwrap();

    assert!(matches!(outcome, CargoOutcome::DepartedByRoad(_)));
    assert!(h.cargo_queue.is_empty());
}

#[test]
fn unreachable_cargo_is_stored() {
    let mut player = PlayerEconomy::default();
    let routing = RoutingTable::default();
    let mut h = registered_harbor(&mut player);

    let mut w = ware(1, Good::Fish);
    w.goal = Some(MapPoint::new(50, 50));
    let outcome = h.add_cargo(w, &mut player, &routing).unwrap();

    assert_eq!(outcome, CargoOutcome::Stored);
    assert_eq!(h.inventory.good(Good::Fish), 1);
}

#[test]
fn cancel_cargo_restores_the_real_count() {
    let mut player = PlayerEconomy::default();
    let mut routing = RoutingTable::default();
    let mut h = registered_harbor(&mut player);
    let goal = MapPoint::new(40, 40);
    routing.set_hop(h.pos, goal, NextHop::Sea(MapPoint::new(20, 10)));
    let mut w = ware(9, Good::Fish);
    w.goal = Some(goal);
    h.add_cargo(w, &mut player, &routing).unwrap();

    let back = h.cancel_cargo(WareId(9)).unwrap();

    assert_eq!(back.good, Good::Fish);
    assert!(h.cargo_queue.is_empty());
    assert_eq!(h.inventory.good(Good::Fish), 1);
    assert_eq!(h.inventory.visual_good(Good::Fish), 1);
}

#[test]
fn cancelling_unknown_entries_is_a_consistency_error() {
    let mut h = harbor();
    assert_eq!(
        h.cancel_cargo(WareId(1)),
        Err(ConsistencyError::UnknownCargo(WareId(1)))
    );
    assert_eq!(
        h.cancel_unit(UnitId(2)),
        Err(ConsistencyError::UnknownUnit(UnitId(2)))
    );
    assert_eq!(
        h.cancel_soldier(UnitId(3)),
        Err(ConsistencyError::UnknownSoldier(UnitId(3)))
    );
}

#[test]
fn topology_change_reroutes_queued_units() {
    let mut player = PlayerEconomy::default();
    let mut routing = RoutingTable::default();
    let mut h = registered_harbor(&mut player);
    let goal_a = MapPoint::new(40, 40);
    let goal_b = MapPoint::new(50, 50);
    let goal_c = MapPoint::new(60, 60);
    h.add_unit(unit(1, Job::Helper, goal_a), MapPoint::new(20, 10), &mut player);
    h.add_unit(unit(2, Job::Carrier, goal_b), MapPoint::new(20, 10), &mut player);
    h.add_unit(unit(3, Job::Helper, goal_c), MapPoint::new(20, 10), &mut player);

    // A road opened to a, the sea leg to b moved, c became unreachable
    routing.set_hop(h.pos, goal_a, NextHop::Road);
    routing.set_hop(h.pos, goal_b, NextHop::Sea(MapPoint::new(30, 10)));
    let changes = h.reexamine_unit_routes(&routing);

    assert_eq!(changes.len(), 2);
    assert!(matches!(&changes[0], RouteChange::DepartedByRoad(u) if u.id == UnitId(1)));
    assert!(matches!(changes[1], RouteChange::StoredLocally(UnitId(3))));
    assert_eq!(h.unit_queue.len(), 1);
    assert_eq!(h.unit_queue[0].dest, MapPoint::new(30, 10));
    // The stranded helper became an inhabitant
    assert_eq!(h.inventory.unit(Job::Helper), 1);
}

#[test]
fn disembarked_unit_with_a_road_route_walks_on() {
    let mut player = PlayerEconomy::default();
    let mut routing = RoutingTable::default();
    let mut h = registered_harbor(&mut player);
    let goal = MapPoint::new(12, 10);
    routing.set_hop(h.pos, goal, NextHop::Road);

    let outcome = h.disembark_unit(unit(1, Job::Helper, goal), &mut player, &routing);

    assert!(matches!(outcome, UnitOutcome::DepartedByRoad(u) if u.id == UnitId(1)));
    // Still in transit, not an inhabitant here
    assert_eq!(h.inventory.unit(Job::Helper), 0);
    assert_eq!(h.inventory.visual_unit(Job::Helper), 0);
}

#[test]
fn disembarked_unit_with_a_sea_route_waits_for_the_next_leg() {
    let mut player = PlayerEconomy::default();
    let mut routing = RoutingTable::default();
    let mut h = registered_harbor(&mut player);
    let goal = MapPoint::new(40, 40);
    let next = MapPoint::new(20, 10);
    routing.set_hop(h.pos, goal, NextHop::Sea(next));

    let outcome = h.disembark_unit(unit(1, Job::Helper, goal), &mut player, &routing);

    assert_eq!(outcome, UnitOutcome::QueuedForShip);
    assert_eq!(h.unit_queue.len(), 1);
    assert_eq!(h.unit_queue[0].dest, next);
    assert_eq!(h.inventory.unit(Job::Helper), 0);
    assert_eq!(h.inventory.visual_unit(Job::Helper), 1);
    assert_eq!(player.ships_to_harbor(h.id), 1);
}

#[test]
fn disembarked_unit_with_no_route_settles_here() {
    let mut player = PlayerEconomy::default();
    let routing = RoutingTable::default();
    let mut h = registered_harbor(&mut player);

    let outcome = h.disembark_unit(unit(1, Job::Helper, MapPoint::new(50, 50)), &mut player, &routing);

    assert_eq!(outcome, UnitOutcome::Stored);
    assert_eq!(h.inventory.unit(Job::Helper), 1);
}

// ======================================================================
// Ship demand and arrival dispatch
// ======================================================================

#[test]
fn needed_ships_dedup_by_destination() {
    let mut player = PlayerEconomy::default();
    let mut h = registered_harbor(&mut player);
    let dest_a = MapPoint::new(20, 10);
    let dest_b = MapPoint::new(30, 10);

    h.add_unit(unit(1, Job::Helper, dest_a), dest_a, &mut player);
    h.add_unit(unit(2, Job::Helper, dest_a), dest_a, &mut player);
    h.cargo_queue.push(CargoWaitEntry {
        ware: ware(1, Good::Fish),
        dest: dest_a,
    });
    h.cargo_queue.push(CargoWaitEntry {
        ware: ware(2, Good::Fish),
        dest: dest_b,
    });
    h.add_soldier(soldier(3), dest_a, &mut player);

    // dest_a shared by units and cargo counts once, dest_b once, and the
    // attack on dest_a counts separately
    assert_eq!(h.needed_ship_count(), 3);
}

#[test]
fn request_ships_is_idempotent() {
    let mut player = PlayerEconomy::default();
    let mut h = registered_harbor(&mut player);
    h.add_unit(unit(1, Job::Helper, MapPoint::new(20, 10)), MapPoint::new(20, 10), &mut player);

    let committed = player.ships_to_harbor(h.id);
    h.request_ships(&mut player);
    h.request_ships(&mut player);

    assert_eq!(player.ships_to_harbor(h.id), committed.max(1));
    assert_eq!(player.ships_to_harbor(h.id), 1);
}

#[test]
fn urgency_offsets_account_for_ships_already_coming() {
    let mut player = PlayerEconomy::default();
    let mut scheduler = Scheduler::default();
    let mut h = registered_harbor(&mut player);
    h.inventory.add_good(Good::Boards, 6);
    h.inventory.add_good(Good::Stones, 4);
    h.inventory.add_unit(Job::Builder, 1);
    h.start_expedition(&mut player, &mut scheduler);
    assert!(h.is_expedition_ready());

    assert_eq!(h.urgency_score(0), 100);
    // One ship already coming serves the expedition
    assert_eq!(h.urgency_score(1), 0);

    h.add_unit(unit(1, Job::Helper, MapPoint::new(20, 10)), MapPoint::new(20, 10), &mut player);
    h.add_unit(unit(2, Job::Helper, MapPoint::new(20, 10)), MapPoint::new(20, 10), &mut player);
    assert_eq!(h.urgency_score(0), 110);
    assert_eq!(h.urgency_score(1), 10);
    assert_eq!(h.urgency_score(2), 0);

    h.add_soldier(soldier(3), MapPoint::new(20, 10), &mut player);
    assert_eq!(h.urgency_score(0), 120);
    assert_eq!(h.urgency_score(2), 10);
}

#[test]
fn arrival_priority_soldiers_first() {
    let mut player = PlayerEconomy::default();
    let mut scheduler = Scheduler::default();
    let mut h = registered_harbor(&mut player);
    let landing = MapPoint::new(25, 25);
    let dest = MapPoint::new(20, 10);
    player.register_harbor(
        Harbor::new(HarborId(2), dest, PlayerId(0), coastal_sea_ids()).record(),
    );

    h.inventory.add_good(Good::Boards, 6);
    h.inventory.add_good(Good::Stones, 4);
    h.inventory.add_unit(Job::Builder, 1);
    h.start_expedition(&mut player, &mut scheduler);
    h.inventory.add_unit(Job::Scout, NUM_EXPEDITION_SCOUTS);
    h.start_exploration(&mut player);
    h.add_unit(unit(1, Job::Helper, dest), dest, &mut player);
    h.add_soldier(soldier(2), landing, &mut player);
    h.add_soldier(soldier(3), landing, &mut player);

    // First ship: both soldiers for the shared landing point
    match h.handle_ship_arrival(&mut player) {
        Some(ShipTask::SeaAttack { dest, soldiers, .. }) => {
            assert_eq!(dest, landing);
            assert_eq!(soldiers.len(), 2);
        }
        other => panic!("expected sea attack, got {other:?}"),
    }

    // Second: the ready colonization expedition
    assert!(matches!(
        h.handle_ship_arrival(&mut player),
        Some(ShipTask::Expedition { .. })
    ));
    assert!(!h.expedition.active);

    // Third: the ready exploration
    match h.handle_ship_arrival(&mut player) {
        Some(ShipTask::Exploration { scouts, .. }) => {
            assert_eq!(scouts, NUM_EXPEDITION_SCOUTS)
        }
        other => panic!("expected exploration, got {other:?}"),
    }

    // Fourth: plain transport
    match h.handle_ship_arrival(&mut player) {
        Some(ShipTask::Transport { dest: d, units, .. }) => {
            assert_eq!(d, dest);
            assert_eq!(units.len(), 1);
        }
        other => panic!("expected transport, got {other:?}"),
    }

    // Nothing left for a fifth ship
    assert_eq!(h.handle_ship_arrival(&mut player), None);
}

#[test]
fn transport_skips_destinations_that_are_gone() {
    let mut player = PlayerEconomy::default();
    let mut h = registered_harbor(&mut player);
    let dead = MapPoint::new(20, 10);
    let alive = MapPoint::new(30, 10);
    player.register_harbor(
        Harbor::new(HarborId(3), alive, PlayerId(0), coastal_sea_ids()).record(),
    );

    h.add_unit(unit(1, Job::Helper, dead), dead, &mut player);
    h.cargo_queue.push(CargoWaitEntry {
        ware: ware(1, Good::Fish),
        dest: alive,
    });
    h.inventory.visual_add_good(Good::Fish, 1);

    match h.handle_ship_arrival(&mut player) {
        Some(ShipTask::Transport {
            dest, units, cargo, ..
        }) => {
            assert_eq!(dest, alive);
            assert!(units.is_empty());
            assert_eq!(cargo.len(), 1);
        }
        other => panic!("expected transport, got {other:?}"),
    }
    // The stale unit entry stays queued until its route recovers
    assert_eq!(h.unit_queue.len(), 1);
}

#[test]
fn transport_loads_units_before_cargo_up_to_capacity() {
    let mut player = PlayerEconomy::default();
    let mut h = registered_harbor(&mut player);
    let dest = MapPoint::new(20, 10);
    player.register_harbor(
        Harbor::new(HarborId(2), dest, PlayerId(0), coastal_sea_ids()).record(),
    );

    for i in 0..30 {
        h.add_unit(unit(i, Job::Helper, dest), dest, &mut player);
    }
    for i in 0..20 {
        h.cargo_queue.push(CargoWaitEntry {
            ware: ware(i, Good::Fish),
            dest,
        });
        h.inventory.visual_add_good(Good::Fish, 1);
    }

    match h.handle_ship_arrival(&mut player) {
        Some(ShipTask::Transport { units, cargo, .. }) => {
            assert_eq!(units.len(), 30);
            assert_eq!(units.len() + cargo.len(), SHIP_CAPACITY);
        }
        other => panic!("expected transport, got {other:?}"),
    }
    assert!(h.unit_queue.is_empty());
    assert_eq!(h.cargo_queue.len(), 10);
}

// ======================================================================
// Connections
// ======================================================================

#[test]
fn connections_cover_shared_seas_without_duplicates() {
    let mut player = PlayerEconomy::default();
    let h = registered_harbor(&mut player);
    let b = Harbor::new(
        HarborId(2),
        MapPoint::new(15, 10),
        PlayerId(0),
        [SEA, SEA, SeaId::NONE, SeaId::NONE, SeaId::NONE, SeaId::NONE],
    );
    player.register_harbor(b.record());

    let connections = h.ship_connections(&player);

    assert_eq!(connections.len(), 1);
    assert_eq!(connections[0].dest, HarborId(2));
    assert_eq!(connections[0].way_cost, 2 * 5 + 10);
}

#[test]
fn no_connections_while_tearing_down() {
    let mut player = PlayerEconomy::default();
    let mut scheduler = Scheduler::default();
    let mut h = registered_harbor(&mut player);
    let b = Harbor::new(HarborId(2), MapPoint::new(15, 10), PlayerId(0), coastal_sea_ids());
    player.register_harbor(b.record());

    h.tear_down(&mut player, &mut scheduler);

    assert!(h.ship_connections(&player).is_empty());
    // And the survivor no longer sees the dead harbor
    assert!(b.ship_connections(&player).is_empty());
}

// ======================================================================
// Teardown
// ======================================================================

#[test]
fn teardown_partitions_every_queued_item() {
    let mut player = player_with_warehouse(&[(Good::Boards, 10)], &[]);
    player.return_good_to_inventory(Good::Boards, 10);
    let mut scheduler = Scheduler::default();
    let mut h = registered_harbor(&mut player);
    let dest = MapPoint::new(20, 10);

    h.start_expedition(&mut player, &mut scheduler);
    h.add_unit(unit(1, Job::Helper, dest), dest, &mut player);
    h.cargo_queue.push(CargoWaitEntry {
        ware: ware(2, Good::Fish),
        dest,
    });
    h.inventory.visual_add_good(Good::Fish, 1);
    h.add_soldier(soldier(3), dest, &mut player);

    let report = h.tear_down(&mut player, &mut scheduler);

    assert!(h.destroying);
    assert_eq!(report.lost_cargo.len(), 1);
    assert_eq!(report.released_units.len(), 1);
    assert_eq!(report.released_soldiers.len(), 1);
    assert!(h.cargo_queue.is_empty());
    assert!(h.unit_queue.is_empty());
    assert!(h.soldier_queue.is_empty());
    assert!(!player.is_harbor_registered(h.id));
    assert_eq!(player.standing_requests_for(h.id).count(), 0);
    assert_eq!(player.deliveries_for(h.id).count(), 0);
    assert_eq!(player.harbors_at_sea(SEA), &[] as &[HarborId]);
    assert_eq!(player.ships_to_harbor(h.id), 0);
    assert_eq!(h.replenish_timer, None);
}

#[test]
fn teardown_is_idempotent_and_blocks_new_work() {
    let mut player = PlayerEconomy::default();
    let mut scheduler = Scheduler::default();
    let mut h = registered_harbor(&mut player);

    h.tear_down(&mut player, &mut scheduler);
    let again = h.tear_down(&mut player, &mut scheduler);
    assert_eq!(again, TeardownReport::default());

    h.start_expedition(&mut player, &mut scheduler);
    assert!(!h.expedition.active);
    h.start_exploration(&mut player);
    assert!(!h.exploration.active);
    h.request_ships(&mut player);
    assert_eq!(player.ships_to_harbor(h.id), 0);
    assert_eq!(h.handle_ship_arrival(&mut player), None);
}

#[test]
fn teardown_loses_gathered_expedition_material() {
    let mut player = PlayerEconomy::default();
    player.return_good_to_inventory(Good::Boards, 6);
    player.return_good_to_inventory(Good::Stones, 4);
    let mut scheduler = Scheduler::default();
    let mut h = registered_harbor(&mut player);
    h.inventory.add_good(Good::Boards, 6);
    h.inventory.add_good(Good::Stones, 4);
    h.start_expedition(&mut player, &mut scheduler);

    h.tear_down(&mut player, &mut scheduler);

    assert_eq!(player.global_good(Good::Boards), 0);
    assert_eq!(player.global_good(Good::Stones), 0);
}

#[test]
fn registry_absence_marks_destruction() {
    let mut player = PlayerEconomy::default();
    let mut scheduler = Scheduler::default();
    let mut h = registered_harbor(&mut player);

    assert!(player.is_harbor_registered(h.id));
    h.tear_down(&mut player, &mut scheduler);
    assert!(!player.is_harbor_registered(h.id));
}
