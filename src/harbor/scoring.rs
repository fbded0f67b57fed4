use crate::economy::{HarborId, PlayerEconomy};
use crate::harbor::types::{Harbor, ShipConnection};
use crate::map_point::MapPoint;
use crate::ships::travel_cost;

impl Harbor {
    /// How many ships this harbor could use right now: one per ready
    /// expedition, plus one per distinct destination among queued units,
    /// cargo and staged soldiers.
    pub fn needed_ship_count(&self) -> u32 {
        let mut count = 0;

        if self.expedition.is_ready() {
            count += 1;
        }
        if self.exploration.is_ready() {
            count += 1;
        }

        // Units and cargo share ships, so they share the dedup set too
        let mut transport_dests: Vec<MapPoint> = Vec::new();
        for entry in &self.unit_queue {
            if !transport_dests.contains(&entry.dest) {
                transport_dests.push(entry.dest);
                count += 1;
            }
        }
        for entry in &self.cargo_queue {
            if !transport_dests.contains(&entry.dest) {
                transport_dests.push(entry.dest);
                count += 1;
            }
        }

        let mut attack_dests: Vec<MapPoint> = Vec::new();
        for entry in &self.soldier_queue {
            if !attack_dests.contains(&entry.dest) {
                attack_dests.push(entry.dest);
                count += 1;
            }
        }

        count
    }

    /// Urgency of sending one more ship here, given how many are already
    /// on their way. Ships already coming satisfy the most urgent wants
    /// first; only unsatisfied wants score points.
    pub fn urgency_score(&self, ships_coming: u32) -> u32 {
        let mut ships = ships_coming;
        let mut points = 0;

        if self.expedition.is_ready() {
            if ships == 0 {
                points += 100;
            } else {
                ships -= 1;
            }
        }
        if self.exploration.is_ready() {
            if ships == 0 {
                points += 100;
            } else {
                ships -= 1;
            }
        }
        if !self.unit_queue.is_empty() || !self.cargo_queue.is_empty() {
            if ships > 0 {
                ships -= 1;
            } else {
                points += (self.unit_queue.len() + self.cargo_queue.len()) as u32 * 5;
            }
        }
        if !self.soldier_queue.is_empty() && ships == 0 {
            points += self.soldier_queue.len() as u32 * 10;
        }

        points
    }

    /// Place ship orders until enough are committed to this harbor.
    /// Idempotent: ships already ordered or under way count against the
    /// need. Refuses to act mid-destruction.
    pub fn request_ships(&self, economy: &mut PlayerEconomy) {
        if self.destroying {
            return;
        }
        let needed = self.needed_ship_count();
        for _ in economy.ships_to_harbor(self.id)..needed {
            economy.order_ship(self.id);
        }
    }

    /// Every distinct sibling harbor reachable over a shared sea zone, with
    /// the travel cost to get there. Empty while either endpoint is being
    /// torn down.
    pub fn ship_connections(&self, economy: &PlayerEconomy) -> Vec<ShipConnection> {
        if self.destroying || !economy.is_harbor_registered(self.id) {
            return Vec::new();
        }
        let mut dests: Vec<HarborId> = Vec::new();
        for sea in self.sea_ids {
            if !sea.is_some() {
                continue;
            }
            for &id in economy.harbors_at_sea(sea) {
                if id != self.id && !dests.contains(&id) {
                    dests.push(id);
                }
            }
        }
        dests
            .into_iter()
            .filter_map(|id| {
                economy.harbor_record(id).map(|record| ShipConnection {
                    dest: id,
                    way_cost: travel_cost(self.pos, record.pos),
                })
            })
            .collect()
    }
}
