use crate::constants::NUM_EXPEDITION_SCOUTS;
use crate::economy::{Good, Job, PlayerEconomy, RequestKind, Soldier, Unit, Ware};
use crate::harbor::types::{ExpeditionState, ExplorationState, Harbor};
use crate::scheduler::Scheduler;

/// Everything released by a harbor teardown. Each queued item ends up in
/// exactly one place: returned to inventory, released to wander, or lost
/// with the building.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeardownReport {
    pub lost_cargo: Vec<Ware>,
    pub released_units: Vec<Unit>,
    pub released_soldiers: Vec<Soldier>,
}

impl Harbor {
    /// Ordered teardown. Safe to call once; further calls are no-ops. The
    /// `destroying` flag is raised and the harbor unregistered before any
    /// step that could re-enter the economy, so nothing ordered mid-teardown
    /// sticks.
    pub fn tear_down(
        &mut self,
        economy: &mut PlayerEconomy,
        scheduler: &mut Scheduler,
    ) -> TeardownReport {
        if self.destroying {
            return TeardownReport::default();
        }
        self.destroying = true;
        economy.unregister_harbor(self.id);

        if let Some(handle) = self.replenish_timer.take() {
            scheduler.cancel(handle);
        }

        if self.expedition.active {
            // Gathered material perishes with the building
            economy.decrease_global_good(Good::Boards, self.expedition.boards);
            economy.decrease_global_good(Good::Stones, self.expedition.stones);
            if self.expedition.builder {
                self.inventory.add_unit(Job::Builder, 1);
            } else {
                economy.cancel_standing_request(RequestKind::Unit(Job::Builder), self.id);
            }
            self.expedition = ExpeditionState::default();
        }

        if self.exploration.active {
            self.inventory
                .real_add_unit(Job::Scout, self.exploration.scouts);
            for _ in self.exploration.scouts..NUM_EXPEDITION_SCOUTS {
                economy.cancel_standing_request(RequestKind::Unit(Job::Scout), self.id);
            }
            self.exploration = ExplorationState::default();
        }

        economy.cancel_all_requests(self.id);

        let mut report = TeardownReport::default();
        for entry in self.cargo_queue.drain(..) {
            economy.decrease_global_good(entry.ware.good, 1);
            report.lost_cargo.push(entry.ware);
        }
        for entry in self.unit_queue.drain(..) {
            report.released_units.push(entry.unit);
        }
        for entry in self.soldier_queue.drain(..) {
            report.released_soldiers.push(entry.soldier);
        }
        self.inbound.clear();

        // Stored wares perish with the building; inhabitants wander out
        // and keep counting towards the player totals
        for (good, count) in self.inventory.drain_goods() {
            economy.decrease_global_good(good, count);
        }
        self.inventory.drain_units();

        economy.remove_from_sea_zones(self.id);
        economy.drop_ship_orders(self.id);

        report
    }
}
