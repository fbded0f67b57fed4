use crate::constants::SHIP_CAPACITY;
use crate::economy::PlayerEconomy;
use crate::harbor::types::Harbor;
use crate::map_point::MapPoint;
use crate::ships::ShipTask;

impl Harbor {
    /// Exactly one dispatch decision for a ship that just arrived, in
    /// priority order: staged soldiers, ready colonization expedition,
    /// ready exploration expedition, waiting transport. Returns `None` when
    /// there is nothing for the ship to do (it idles at the harbor).
    pub fn handle_ship_arrival(&mut self, economy: &mut PlayerEconomy) -> Option<ShipTask> {
        if self.destroying {
            return None;
        }

        if !self.soldier_queue.is_empty() {
            return Some(self.load_sea_attack());
        }

        if self.expedition.is_ready() {
            self.launch_expedition();
            return Some(ShipTask::Expedition { from: self.id });
        }

        if self.exploration.is_ready() {
            let scouts = self.exploration.scouts;
            self.launch_exploration();
            return Some(ShipTask::Exploration {
                from: self.id,
                scouts,
            });
        }

        self.load_transport(economy)
    }

    /// Load every soldier headed for the first staged landing point.
    fn load_sea_attack(&mut self) -> ShipTask {
        let dest = self.soldier_queue[0].dest;
        let mut soldiers = Vec::new();
        let mut i = 0;
        while i < self.soldier_queue.len() {
            if self.soldier_queue[i].dest == dest {
                let entry = self.soldier_queue.remove(i);
                self.inventory.visual_remove_unit(entry.soldier.rank, 1);
                soldiers.push(entry.soldier);
            } else {
                i += 1;
            }
        }
        ShipTask::SeaAttack {
            from: self.id,
            dest,
            soldiers,
        }
    }

    /// Load units and cargo for one destination, units first, up to ship
    /// capacity. Only destinations that still resolve to a harbor owned by
    /// the same player qualify; stale queue entries are skipped.
    fn load_transport(&mut self, economy: &PlayerEconomy) -> Option<ShipTask> {
        let dest = self.pick_transport_dest(economy)?;

        let mut units = Vec::new();
        let mut cargo = Vec::new();
        let mut space = SHIP_CAPACITY;

        let mut i = 0;
        while i < self.unit_queue.len() && space > 0 {
            if self.unit_queue[i].dest == dest {
                let entry = self.unit_queue.remove(i);
                self.inventory.visual_remove_unit(entry.unit.job, 1);
                units.push(entry.unit);
                space -= 1;
            } else {
                i += 1;
            }
        }

        let mut i = 0;
        while i < self.cargo_queue.len() && space > 0 {
            if self.cargo_queue[i].dest == dest {
                let entry = self.cargo_queue.remove(i);
                self.inventory.visual_remove_good(entry.ware.good, 1);
                cargo.push(entry.ware);
                space -= 1;
            } else {
                i += 1;
            }
        }

        Some(ShipTask::Transport {
            from: self.id,
            dest,
            units,
            cargo,
        })
    }

    /// First queued destination that is still a valid harbor, units before
    /// cargo.
    fn pick_transport_dest(&self, economy: &PlayerEconomy) -> Option<MapPoint> {
        for entry in &self.unit_queue {
            if economy.harbor_at(entry.dest).is_some() {
                return Some(entry.dest);
            }
        }
        for entry in &self.cargo_queue {
            if economy.harbor_at(entry.dest).is_some() {
                return Some(entry.dest);
            }
        }
        None
    }
}
