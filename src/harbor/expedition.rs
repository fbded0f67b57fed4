use crate::constants::{
    HARBOR_COST_BOARDS, HARBOR_COST_STONES, NUM_EXPEDITION_SCOUTS, ORDER_WARES_INTERVAL,
};
use crate::economy::{Good, Job, PlayerEconomy, RequestKind};
use crate::harbor::types::{ExpeditionState, ExplorationState, Harbor};
use crate::scheduler::Scheduler;

impl Harbor {
    // ==================================================================
    // Colonization expedition
    // ==================================================================

    /// Begin collecting material and crew for a colonization expedition.
    /// No-op when one is already active or the harbor is being torn down.
    pub fn start_expedition(&mut self, economy: &mut PlayerEconomy, scheduler: &mut Scheduler) {
        if self.destroying || self.expedition.active {
            return;
        }
        self.expedition.active = true;

        // Pull whatever the local inventory already holds, up to the cost
        self.expedition.boards = self.inventory.good(Good::Boards).min(HARBOR_COST_BOARDS);
        self.expedition.stones = self.inventory.good(Good::Stones).min(HARBOR_COST_STONES);
        self.inventory.remove_good(Good::Boards, self.expedition.boards);
        self.inventory.remove_good(Good::Stones, self.expedition.stones);

        if self.inventory.unit(Job::Builder) > 0 {
            self.inventory.remove_unit(Job::Builder, 1);
            self.expedition.builder = true;
        } else {
            self.expedition.builder = false;
            // A builder idling in any sibling warehouse will answer the
            // standing request; only convert one locally when no player
            // warehouse has one at all.
            let convert = economy
                .find_sibling_warehouses_with_unit(Job::Builder)
                .next()
                .is_none();
            if convert
                && self.inventory.good(Good::Hammer) > 0
                && self.inventory.unit(Job::Helper) > 1
            {
                self.inventory.remove_good(Good::Hammer, 1);
                economy.decrease_global_good(Good::Hammer, 1);
                self.inventory.remove_unit(Job::Helper, 1);
                economy.decrease_global_unit(Job::Helper, 1);
                economy.return_unit_to_inventory(Job::Builder, 1);
                self.expedition.builder = true;
            }
            if !self.expedition.builder {
                economy.add_standing_request(RequestKind::Unit(Job::Builder), self.id);
            }
        }

        self.order_expedition_wares(economy, scheduler);
        self.check_expedition_ready(economy);
    }

    /// Abort the colonization expedition, returning everything gathered so
    /// far. No-op when none is active.
    pub fn stop_expedition(&mut self, economy: &mut PlayerEconomy, scheduler: &mut Scheduler) {
        if !self.expedition.active {
            return;
        }
        self.expedition.active = false;

        self.inventory.add_good(Good::Boards, self.expedition.boards);
        self.inventory.add_good(Good::Stones, self.expedition.stones);
        self.expedition.boards = 0;
        self.expedition.stones = 0;

        if self.expedition.builder {
            self.inventory.add_unit(Job::Builder, 1);
            self.expedition.builder = false;
        } else {
            economy.cancel_standing_request(RequestKind::Unit(Job::Builder), self.id);
        }

        if let Some(handle) = self.replenish_timer.take() {
            scheduler.cancel(handle);
        }
    }

    pub fn is_expedition_ready(&self) -> bool {
        self.expedition.is_ready()
    }

    /// Order the boards and stones still missing, counting deliveries
    /// already under way, and arm the replenishment timer while any
    /// shortfall remains. Refuses to act mid-destruction.
    pub fn order_expedition_wares(
        &mut self,
        economy: &mut PlayerEconomy,
        scheduler: &mut Scheduler,
    ) {
        if self.destroying || !self.expedition.active {
            return;
        }

        let todo_boards = self
            .expedition
            .missing_boards()
            .saturating_sub(self.inbound_count(Good::Boards));
        for _ in 0..todo_boards {
            match economy.request_good(Good::Boards, self.id) {
                Some(_) => self.inbound_add(Good::Boards),
                None => break,
            }
        }

        let todo_stones = self
            .expedition
            .missing_stones()
            .saturating_sub(self.inbound_count(Good::Stones));
        for _ in 0..todo_stones {
            match economy.request_good(Good::Stones, self.id) {
                Some(_) => self.inbound_add(Good::Stones),
                None => break,
            }
        }

        // Re-check later while material has not physically arrived yet;
        // the timer self-cancels once the expedition is fully stocked.
        let fully_stocked = self.expedition.boards == HARBOR_COST_BOARDS
            && self.expedition.stones == HARBOR_COST_STONES;
        if !fully_stocked && self.replenish_timer.is_none() {
            self.replenish_timer = Some(scheduler.schedule(self.id, ORDER_WARES_INTERVAL));
        }
    }

    /// The replenishment timer fired: drop the handle and re-evaluate.
    pub fn replenishment_due(&mut self, economy: &mut PlayerEconomy, scheduler: &mut Scheduler) {
        self.replenish_timer = None;
        self.order_expedition_wares(economy, scheduler);
    }

    /// An ordered delivery failed under way; re-order if still wanted.
    pub fn delivery_lost(
        &mut self,
        good: Good,
        economy: &mut PlayerEconomy,
        scheduler: &mut Scheduler,
    ) {
        self.inbound_remove(good);
        if self.expedition.active && good.is_construction_material() {
            self.order_expedition_wares(economy, scheduler);
        }
    }

    pub(crate) fn check_expedition_ready(&self, economy: &mut PlayerEconomy) {
        if self.expedition.is_ready() {
            self.request_ships(economy);
        }
    }

    /// Called by the arrival dispatcher when a ship takes the expedition:
    /// the material and builder leave with the ship.
    pub(crate) fn launch_expedition(&mut self) {
        self.expedition = ExpeditionState::default();
    }

    // ==================================================================
    // Exploration expedition
    // ==================================================================

    /// Begin staffing an exploration expedition with scouts. No-op when one
    /// is already active or the harbor is being torn down.
    pub fn start_exploration(&mut self, economy: &mut PlayerEconomy) {
        if self.destroying || self.exploration.active {
            return;
        }
        self.exploration.active = true;
        self.exploration.scouts = 0;

        let required = NUM_EXPEDITION_SCOUTS;
        if self.inventory.unit(Job::Scout) < required {
            let mut missing = required - self.inventory.unit(Job::Scout);
            // Scouts idling in sibling warehouses will answer the standing
            // requests below; they only suppress local recruitment.
            for wh in economy.find_sibling_warehouses_with_unit(Job::Scout) {
                let available = wh.unit(Job::Scout);
                if available >= missing {
                    missing = 0;
                    break;
                }
                missing -= available;
            }
            while missing > 0 && self.try_recruit(Job::Scout, economy) {
                missing -= 1;
            }
            for _ in self.inventory.unit(Job::Scout)..required {
                economy.add_standing_request(RequestKind::Unit(Job::Scout), self.id);
            }
        }

        let local = self.inventory.unit(Job::Scout);
        if local > 0 {
            self.exploration.scouts = local.min(required);
            // Scouts stay in the building until the ship loads, so only the
            // real count moves
            self.inventory
                .real_remove_unit(Job::Scout, self.exploration.scouts);
        }

        self.check_exploration_ready(economy);
    }

    /// Abort the exploration expedition and release its scouts. No-op when
    /// none is active.
    pub fn stop_exploration(&mut self, economy: &mut PlayerEconomy) {
        if !self.exploration.active {
            return;
        }
        self.exploration.active = false;

        for _ in self.exploration.scouts..NUM_EXPEDITION_SCOUTS {
            economy.cancel_standing_request(RequestKind::Unit(Job::Scout), self.id);
        }
        if self.exploration.scouts > 0 {
            self.inventory
                .real_add_unit(Job::Scout, self.exploration.scouts);
            self.exploration.scouts = 0;
        }
    }

    pub fn is_exploration_ready(&self) -> bool {
        self.exploration.is_ready()
    }

    pub(crate) fn check_exploration_ready(&self, economy: &mut PlayerEconomy) {
        if self.exploration.is_ready() {
            self.request_ships(economy);
        }
    }

    /// Called by the arrival dispatcher when a ship takes the exploration
    /// expedition: the scouts leave with the ship.
    pub(crate) fn launch_exploration(&mut self) {
        self.inventory
            .visual_remove_unit(Job::Scout, self.exploration.scouts);
        self.exploration = ExplorationState::default();
    }

    /// Convert a helper plus the job's tool into the job locally.
    fn try_recruit(&mut self, job: Job, economy: &mut PlayerEconomy) -> bool {
        let Some(tool) = job.recruitment_tool() else {
            return false;
        };
        if self.inventory.good(tool) == 0 || self.inventory.unit(Job::Helper) == 0 {
            return false;
        }
        self.inventory.remove_good(tool, 1);
        economy.decrease_global_good(tool, 1);
        self.inventory.remove_unit(Job::Helper, 1);
        economy.decrease_global_unit(Job::Helper, 1);
        self.inventory.add_unit(job, 1);
        economy.return_unit_to_inventory(job, 1);
        true
    }
}
