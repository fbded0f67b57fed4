use crate::constants::{HARBOR_COST_BOARDS, HARBOR_COST_STONES, NUM_EXPEDITION_SCOUTS};
use crate::economy::{Good, Job, PlayerEconomy, RequestKind, Soldier, Unit, UnitId, Ware, WareId};
use crate::harbor::types::{
    CargoWaitEntry, ConsistencyError, Harbor, SoldierWaitEntry, UnitWaitEntry,
};
use crate::map_point::MapPoint;
use crate::routing::{NextHop, RoutingTable};

/// What the harbor did with an arriving ware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CargoOutcome {
    /// Queued for sea transport towards the given next harbor.
    QueuedForShip,
    /// The route continues over land; the caller puts the ware back on the
    /// road network.
    DepartedByRoad(Ware),
    /// Stored in the local inventory.
    Stored,
    /// Absorbed into the active expedition's material.
    ConsumedByExpedition,
}

/// What the harbor did with an arriving unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitOutcome {
    /// Taken as the expedition's builder.
    JoinedExpedition,
    /// Taken as one of the exploration expedition's scouts.
    JoinedExploration,
    /// Re-queued for the next sea leg towards its goal.
    QueuedForShip,
    /// The route continues over land; the caller puts the unit back on the
    /// road network.
    DepartedByRoad(Unit),
    /// Stored in the local inventory.
    Stored,
}

/// A queued unit whose route was re-examined after a topology change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteChange {
    /// The unit's route now continues over land; it walks out.
    DepartedByRoad(Unit),
    /// No route to the goal remains; the unit stays here as an inhabitant.
    StoredLocally(UnitId),
}

impl Harbor {
    // ==================================================================
    // Cargo
    // ==================================================================

    /// Take delivery of a ware. Settles the delivery ledger, then decides
    /// between sea queue, road, expedition material and plain storage.
    pub fn add_cargo(
        &mut self,
        mut ware: Ware,
        economy: &mut PlayerEconomy,
        routing: &RoutingTable,
    ) -> Result<CargoOutcome, ConsistencyError> {
        if let Some(handle) = ware.delivery.take() {
            if !economy.complete_delivery(handle) {
                return Err(ConsistencyError::UnknownDelivery);
            }
            if !self.inbound_remove(ware.good) {
                return Err(ConsistencyError::UntrackedInbound(ware.good));
            }
        }

        if let Some(goal) = ware.goal
            && goal != self.pos
            && !self.destroying
        {
            match routing.next_hop(self.pos, goal) {
                NextHop::Sea(dest) => {
                    self.inventory.visual_add_good(ware.good, 1);
                    self.cargo_queue.push(CargoWaitEntry { ware, dest });
                    self.request_ships(economy);
                    return Ok(CargoOutcome::QueuedForShip);
                }
                NextHop::Road => return Ok(CargoOutcome::DepartedByRoad(ware)),
                // Goal unreachable, the ware stays here
                NextHop::None => ware.goal = None,
            }
        }

        if self.expedition.active {
            if ware.good == Good::Boards && self.expedition.boards < HARBOR_COST_BOARDS {
                self.expedition.boards += 1;
                self.check_expedition_ready(economy);
                return Ok(CargoOutcome::ConsumedByExpedition);
            }
            if ware.good == Good::Stones && self.expedition.stones < HARBOR_COST_STONES {
                self.expedition.stones += 1;
                self.check_expedition_ready(economy);
                return Ok(CargoOutcome::ConsumedByExpedition);
            }
        }

        self.inventory.add_good(ware.good, 1);
        Ok(CargoOutcome::Stored)
    }

    /// Pull a queued ware back out, by id. The ware becomes part of the
    /// stored inventory again; its slot in the visual count already exists,
    /// so only the real count moves.
    pub fn cancel_cargo(&mut self, id: WareId) -> Result<Ware, ConsistencyError> {
        let idx = self
            .cargo_queue
            .iter()
            .position(|e| e.ware.id == id)
            .ok_or(ConsistencyError::UnknownCargo(id))?;
        let entry = self.cargo_queue.remove(idx);
        self.inventory.real_add_good(entry.ware.good, 1);
        Ok(entry.ware)
    }

    // ==================================================================
    // Units
    // ==================================================================

    /// Queue a unit for sea transport towards the given next harbor.
    pub fn add_unit(&mut self, unit: Unit, dest: MapPoint, economy: &mut PlayerEconomy) {
        self.inventory.visual_add_unit(unit.job, 1);
        self.unit_queue.push(UnitWaitEntry { unit, dest });
        self.request_ships(economy);
    }

    /// A unit steps off a ship. Routes that continue get the same treatment
    /// as cargo routes: the next sea leg re-queues the unit, a land leg
    /// sends it out by road, and a dead goal settles it here.
    pub fn disembark_unit(
        &mut self,
        mut unit: Unit,
        economy: &mut PlayerEconomy,
        routing: &RoutingTable,
    ) -> UnitOutcome {
        if let Some(goal) = unit.goal
            && goal != self.pos
            && !self.destroying
        {
            match routing.next_hop(self.pos, goal) {
                NextHop::Sea(dest) => {
                    self.add_unit(unit, dest, economy);
                    return UnitOutcome::QueuedForShip;
                }
                NextHop::Road => return UnitOutcome::DepartedByRoad(unit),
                // Goal unreachable, the unit stays here
                NextHop::None => unit.goal = None,
            }
        }
        self.receive_unit(unit, economy)
    }

    /// A unit walked in (or disembarked) with this harbor as its goal.
    /// Builders and scouts an active expedition is waiting for are absorbed
    /// directly; everyone else becomes an inhabitant.
    pub fn receive_unit(&mut self, unit: Unit, economy: &mut PlayerEconomy) -> UnitOutcome {
        if !self.destroying {
            if unit.job == Job::Builder && self.expedition.active && !self.expedition.builder {
                self.expedition.builder = true;
                economy.cancel_standing_request(RequestKind::Unit(Job::Builder), self.id);
                self.check_expedition_ready(economy);
                return UnitOutcome::JoinedExpedition;
            }
            if unit.job == Job::Scout
                && self.exploration.active
                && self.exploration.scouts < NUM_EXPEDITION_SCOUTS
            {
                self.exploration.scouts += 1;
                // Waits inside the building, so only the visual count grows
                self.inventory.visual_add_unit(Job::Scout, 1);
                economy.cancel_standing_request(RequestKind::Unit(Job::Scout), self.id);
                self.check_exploration_ready(economy);
                return UnitOutcome::JoinedExploration;
            }
        }
        self.inventory.add_unit(unit.job, 1);
        UnitOutcome::Stored
    }

    /// Pull a queued unit back out, by id. It stays as an inhabitant.
    pub fn cancel_unit(&mut self, id: UnitId) -> Result<Unit, ConsistencyError> {
        let idx = self
            .unit_queue
            .iter()
            .position(|e| e.unit.id == id)
            .ok_or(ConsistencyError::UnknownUnit(id))?;
        let entry = self.unit_queue.remove(idx);
        self.inventory.real_add_unit(entry.unit.job, 1);
        Ok(entry.unit)
    }

    /// Re-examine every queued unit's route after a topology change. Units
    /// whose goal is now reachable over land leave by road; units with no
    /// route left become inhabitants; the rest get their next-harbor hop
    /// refreshed.
    pub fn reexamine_unit_routes(&mut self, routing: &RoutingTable) -> Vec<RouteChange> {
        let mut changes = Vec::new();
        let mut i = 0;
        while i < self.unit_queue.len() {
            let goal = self.unit_queue[i]
                .unit
                .goal
                .unwrap_or(self.unit_queue[i].dest);
            match routing.next_hop(self.pos, goal) {
                NextHop::Sea(dest) => {
                    self.unit_queue[i].dest = dest;
                    i += 1;
                }
                NextHop::Road => {
                    let entry = self.unit_queue.remove(i);
                    self.inventory.visual_remove_unit(entry.unit.job, 1);
                    changes.push(RouteChange::DepartedByRoad(entry.unit));
                }
                NextHop::None => {
                    let entry = self.unit_queue.remove(i);
                    self.inventory.real_add_unit(entry.unit.job, 1);
                    changes.push(RouteChange::StoredLocally(entry.unit.id));
                }
            }
        }
        changes
    }

    // ==================================================================
    // Soldiers
    // ==================================================================

    /// Stage a soldier for an amphibious assault on the given landing point.
    pub fn add_soldier(&mut self, soldier: Soldier, dest: MapPoint, economy: &mut PlayerEconomy) {
        self.inventory.visual_add_unit(soldier.rank, 1);
        self.soldier_queue.push(SoldierWaitEntry { soldier, dest });
        self.request_ships(economy);
    }

    /// Abort one staged soldier's attack, by id. The soldier stays as an
    /// inhabitant.
    pub fn cancel_soldier(&mut self, id: UnitId) -> Result<Soldier, ConsistencyError> {
        let idx = self
            .soldier_queue
            .iter()
            .position(|e| e.soldier.id == id)
            .ok_or(ConsistencyError::UnknownSoldier(id))?;
        let entry = self.soldier_queue.remove(idx);
        self.inventory.real_add_unit(entry.soldier.rank, 1);
        Ok(entry.soldier)
    }
}
