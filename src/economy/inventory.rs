use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::economy::goods::Good;
use crate::economy::jobs::Job;

/// Confirmed vs. provisional quantity of a single good or unit type.
///
/// `real` is the confirmed stock. `visual` is what the UI should show and
/// additionally counts entries that still sit in the building but are
/// committed elsewhere (queued for a ship, staged for an expedition).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DualCount {
    pub real: u32,
    pub visual: u32,
}

/// Warehouse stock split into real and visual counts per good and unit type.
///
/// Uses `BTreeMap` so iteration order is identical on every networked peer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    goods: BTreeMap<Good, DualCount>,
    units: BTreeMap<Job, DualCount>,
}

macro_rules! dual_count_accessors {
    ($get:ident, $visual_get:ident, $add:ident, $real_add:ident, $visual_add:ident,
     $remove:ident, $real_remove:ident, $visual_remove:ident, $field:ident, $key:ty) => {
        /// Confirmed amount
        pub fn $get(&self, key: $key) -> u32 {
            self.$field.get(&key).map_or(0, |c| c.real)
        }

        /// Provisional amount shown to the UI
        pub fn $visual_get(&self, key: $key) -> u32 {
            self.$field.get(&key).map_or(0, |c| c.visual)
        }

        /// Add to both the real and the visual count
        pub fn $add(&mut self, key: $key, qty: u32) {
            let c = self.$field.entry(key).or_default();
            c.real += qty;
            c.visual += qty;
        }

        /// Add to the real count only (the visual count already includes it)
        pub fn $real_add(&mut self, key: $key, qty: u32) {
            self.$field.entry(key).or_default().real += qty;
        }

        /// Add to the visual count only (entry is committed, not stored)
        pub fn $visual_add(&mut self, key: $key, qty: u32) {
            self.$field.entry(key).or_default().visual += qty;
        }

        /// Remove up to `qty` from both counts; returns how many were removed
        pub fn $remove(&mut self, key: $key, qty: u32) -> u32 {
            let c = self.$field.entry(key).or_default();
            let take = c.real.min(qty);
            c.real -= take;
            c.visual = c.visual.saturating_sub(take);
            take
        }

        /// Remove from the real count only
        pub fn $real_remove(&mut self, key: $key, qty: u32) -> u32 {
            let c = self.$field.entry(key).or_default();
            let take = c.real.min(qty);
            c.real -= take;
            take
        }

        /// Remove from the visual count only
        pub fn $visual_remove(&mut self, key: $key, qty: u32) {
            let c = self.$field.entry(key).or_default();
            c.visual = c.visual.saturating_sub(qty);
        }
    };
}

impl Inventory {
    dual_count_accessors!(
        good, visual_good, add_good, real_add_good, visual_add_good, remove_good,
        real_remove_good, visual_remove_good, goods, Good
    );

    dual_count_accessors!(
        unit, visual_unit, add_unit, real_add_unit, visual_add_unit, remove_unit,
        real_remove_unit, visual_remove_unit, units, Job
    );

    /// Sum of confirmed goods over all types
    pub fn total_goods(&self) -> u32 {
        self.goods.values().map(|c| c.real).sum()
    }

    /// Sum of confirmed units over all jobs
    pub fn total_units(&self) -> u32 {
        self.units.values().map(|c| c.real).sum()
    }

    /// Iterate confirmed good counts in deterministic order
    pub fn goods(&self) -> impl Iterator<Item = (Good, u32)> + '_ {
        self.goods.iter().map(|(g, c)| (*g, c.real))
    }

    /// Iterate confirmed unit counts in deterministic order
    pub fn units(&self) -> impl Iterator<Item = (Job, u32)> + '_ {
        self.units.iter().map(|(j, c)| (*j, c.real))
    }

    /// Empty the good stock, yielding the confirmed counts. Used by
    /// building teardown.
    pub fn drain_goods(&mut self) -> Vec<(Good, u32)> {
        let drained = self
            .goods
            .iter()
            .filter(|(_, c)| c.real > 0)
            .map(|(g, c)| (*g, c.real))
            .collect();
        self.goods.clear();
        drained
    }

    /// Empty the unit stock, yielding the confirmed counts.
    pub fn drain_units(&mut self) -> Vec<(Job, u32)> {
        let drained = self
            .units
            .iter()
            .filter(|(_, c)| c.real > 0)
            .map(|(j, c)| (*j, c.real))
            .collect();
        self.units.clear();
        drained
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_remove_track_both_counts() {
        let mut inv = Inventory::default();
        assert_eq!(inv.good(Good::Boards), 0);
        inv.add_good(Good::Boards, 3);
        assert_eq!(inv.good(Good::Boards), 3);
        assert_eq!(inv.visual_good(Good::Boards), 3);

        let taken = inv.remove_good(Good::Boards, 5);
        assert_eq!(taken, 3);
        assert_eq!(inv.good(Good::Boards), 0);
        assert_eq!(inv.visual_good(Good::Boards), 0);
    }

    #[test]
    fn real_only_removal_keeps_visual() {
        let mut inv = Inventory::default();
        inv.add_unit(Job::Scout, 2);
        inv.real_remove_unit(Job::Scout, 2);
        assert_eq!(inv.unit(Job::Scout), 0);
        // Scouts are still in the building, just committed to the expedition
        assert_eq!(inv.visual_unit(Job::Scout), 2);
    }

    #[test]
    fn visual_only_add_marks_committed_entries() {
        let mut inv = Inventory::default();
        inv.visual_add_good(Good::Fish, 1);
        assert_eq!(inv.good(Good::Fish), 0);
        assert_eq!(inv.visual_good(Good::Fish), 1);

        inv.visual_remove_good(Good::Fish, 1);
        assert_eq!(inv.visual_good(Good::Fish), 0);
    }

    #[test]
    fn totals_sum_real_counts() {
        let mut inv = Inventory::default();
        inv.add_good(Good::Boards, 2);
        inv.add_good(Good::Stones, 4);
        inv.add_unit(Job::Helper, 3);
        inv.visual_add_unit(Job::Private, 1);
        assert_eq!(inv.total_goods(), 6);
        assert_eq!(inv.total_units(), 3);
    }
}
