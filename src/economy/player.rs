use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::economy::goods::Good;
use crate::economy::jobs::Job;
use crate::economy::units::DeliveryHandle;
use crate::map_point::{MapPoint, SeaId};

/// Identifies a player. Harbors never hold `Entity` references to other
/// players' state; everything goes through the shared `Economy` resource.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct PlayerId(pub u8);

/// Identifies a harbor site. Stable across save/load, unlike `Entity`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct HarborId(pub u16);

/// What a standing request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestKind {
    Good(Good),
    Unit(Job),
}

/// A request that stays open until fulfilled or cancelled; re-examined by
/// the owning player's distribution logic, not by the harbor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingRequest {
    pub kind: RequestKind,
    pub requester: HarborId,
}

/// A ware on its way to a requester, already subtracted from its source
/// warehouse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delivery {
    pub handle: DeliveryHandle,
    pub good: Good,
    pub dest: HarborId,
}

/// Read-only view of a sibling warehouse used by expedition start scans.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warehouse {
    pub goods: BTreeMap<Good, u32>,
    pub units: BTreeMap<Job, u32>,
}

impl Warehouse {
    pub fn good(&self, good: Good) -> u32 {
        self.goods.get(&good).copied().unwrap_or(0)
    }

    pub fn unit(&self, job: Job) -> u32 {
        self.units.get(&job).copied().unwrap_or(0)
    }
}

/// Registry entry for a harbor owned by this player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarborRecord {
    pub id: HarborId,
    pub pos: MapPoint,
    pub sea_ids: [SeaId; 6],
}

/// Per-player economy state: global inventory bookkeeping, standing
/// requests, in-transit deliveries, warehouse and harbor registries and the
/// ship-order ledger.
///
/// All collections are ordered so replayed event streams produce identical
/// state on every peer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerEconomy {
    pub global_goods: BTreeMap<Good, u32>,
    pub global_units: BTreeMap<Job, u32>,
    pub warehouses: Vec<Warehouse>,
    standing_requests: Vec<StandingRequest>,
    deliveries: Vec<Delivery>,
    harbors: Vec<HarborRecord>,
    sea_zones: BTreeMap<SeaId, Vec<HarborId>>,
    ship_orders: BTreeMap<HarborId, u32>,
    ships_en_route: BTreeMap<HarborId, u32>,
    next_delivery: u32,
}

impl PlayerEconomy {
    // ------------------------------------------------------------------
    // Global inventory
    // ------------------------------------------------------------------

    pub fn global_good(&self, good: Good) -> u32 {
        self.global_goods.get(&good).copied().unwrap_or(0)
    }

    pub fn global_unit(&self, job: Job) -> u32 {
        self.global_units.get(&job).copied().unwrap_or(0)
    }

    pub fn return_good_to_inventory(&mut self, good: Good, n: u32) {
        *self.global_goods.entry(good).or_default() += n;
    }

    pub fn return_unit_to_inventory(&mut self, job: Job, n: u32) {
        *self.global_units.entry(job).or_default() += n;
    }

    pub fn decrease_global_good(&mut self, good: Good, n: u32) {
        let c = self.global_goods.entry(good).or_default();
        *c = c.saturating_sub(n);
    }

    pub fn decrease_global_unit(&mut self, job: Job, n: u32) {
        let c = self.global_units.entry(job).or_default();
        *c = c.saturating_sub(n);
    }

    // ------------------------------------------------------------------
    // Requests and deliveries
    // ------------------------------------------------------------------

    /// Order one ware from any sibling warehouse. On success the good is
    /// subtracted at the source and travels towards `requester` as a
    /// tracked delivery. Returns `None` when nothing is available.
    pub fn request_good(&mut self, good: Good, requester: HarborId) -> Option<DeliveryHandle> {
        let source = self.warehouses.iter_mut().find(|wh| wh.good(good) > 0)?;
        *source.goods.entry(good).or_default() -= 1;

        let handle = DeliveryHandle(self.next_delivery);
        self.next_delivery += 1;
        self.deliveries.push(Delivery {
            handle,
            good,
            dest: requester,
        });
        Some(handle)
    }

    /// Mark a tracked delivery as arrived. Returns false when the handle is
    /// unknown, which callers treat as a consistency violation.
    pub fn complete_delivery(&mut self, handle: DeliveryHandle) -> bool {
        match self.deliveries.iter().position(|d| d.handle == handle) {
            Some(idx) => {
                self.deliveries.remove(idx);
                true
            }
            None => false,
        }
    }

    /// A delivery failed under way; the good is gone. Returns its type so
    /// the requester can re-order.
    pub fn fail_delivery(&mut self, handle: DeliveryHandle) -> Option<Good> {
        let idx = self.deliveries.iter().position(|d| d.handle == handle)?;
        Some(self.deliveries.remove(idx).good)
    }

    pub fn deliveries_for(&self, dest: HarborId) -> impl Iterator<Item = &Delivery> {
        self.deliveries.iter().filter(move |d| d.dest == dest)
    }

    pub fn add_standing_request(&mut self, kind: RequestKind, requester: HarborId) {
        self.standing_requests.push(StandingRequest { kind, requester });
    }

    /// Withdraw one standing request of the given kind. No-op when none is
    /// open (the request may already have been fulfilled).
    pub fn cancel_standing_request(&mut self, kind: RequestKind, requester: HarborId) {
        if let Some(idx) = self
            .standing_requests
            .iter()
            .position(|r| r.kind == kind && r.requester == requester)
        {
            self.standing_requests.remove(idx);
        }
    }

    pub fn standing_requests_for(&self, requester: HarborId) -> impl Iterator<Item = &StandingRequest> {
        self.standing_requests
            .iter()
            .filter(move |r| r.requester == requester)
    }

    /// Drop every standing request and in-transit delivery tied to a harbor
    /// being torn down. In-transit goods are lost together with their
    /// destination and leave the player totals.
    pub fn cancel_all_requests(&mut self, requester: HarborId) {
        self.standing_requests.retain(|r| r.requester != requester);
        let mut kept = Vec::with_capacity(self.deliveries.len());
        for delivery in std::mem::take(&mut self.deliveries) {
            if delivery.dest == requester {
                self.decrease_global_good(delivery.good, 1);
            } else {
                kept.push(delivery);
            }
        }
        self.deliveries = kept;
    }

    /// Read-only scan over sibling warehouses holding at least one unit of
    /// the given job.
    pub fn find_sibling_warehouses_with_unit(&self, job: Job) -> impl Iterator<Item = &Warehouse> {
        self.warehouses.iter().filter(move |wh| wh.unit(job) > 0)
    }

    // ------------------------------------------------------------------
    // Harbor and sea-zone registries
    // ------------------------------------------------------------------

    pub fn register_harbor(&mut self, record: HarborRecord) {
        for sea in record.sea_ids {
            if sea.is_some() {
                let ids = self.sea_zones.entry(sea).or_default();
                if !ids.contains(&record.id) {
                    ids.push(record.id);
                }
            }
        }
        self.harbors.push(record);
    }

    /// Remove the harbor from the active registry. Accessors treat absence
    /// as "being destroyed"; the sea-zone entries are removed separately
    /// later in the teardown sequence.
    pub fn unregister_harbor(&mut self, id: HarborId) {
        self.harbors.retain(|h| h.id != id);
    }

    pub fn remove_from_sea_zones(&mut self, id: HarborId) {
        for ids in self.sea_zones.values_mut() {
            ids.retain(|h| *h != id);
        }
    }

    pub fn is_harbor_registered(&self, id: HarborId) -> bool {
        self.harbors.iter().any(|h| h.id == id)
    }

    /// The registered harbor at a position, if this player still owns one
    /// there. Dispatch uses this to validate destinations.
    pub fn harbor_at(&self, pos: MapPoint) -> Option<&HarborRecord> {
        self.harbors.iter().find(|h| h.pos == pos)
    }

    pub fn harbor_record(&self, id: HarborId) -> Option<&HarborRecord> {
        self.harbors.iter().find(|h| h.id == id)
    }

    pub fn harbors_at_sea(&self, sea: SeaId) -> &[HarborId] {
        self.sea_zones.get(&sea).map_or(&[], |ids| ids.as_slice())
    }

    // ------------------------------------------------------------------
    // Ship-order ledger
    // ------------------------------------------------------------------

    /// Ships already committed to this harbor: ordered but unassigned plus
    /// assigned but not yet arrived.
    pub fn ships_to_harbor(&self, id: HarborId) -> u32 {
        self.ship_orders.get(&id).copied().unwrap_or(0)
            + self.ships_en_route.get(&id).copied().unwrap_or(0)
    }

    pub fn order_ship(&mut self, id: HarborId) {
        *self.ship_orders.entry(id).or_default() += 1;
    }

    /// Ships already dispatched towards this harbor.
    pub fn ships_en_route_to(&self, id: HarborId) -> u32 {
        self.ships_en_route.get(&id).copied().unwrap_or(0)
    }

    /// Harbors with open ship orders, in deterministic order.
    pub fn harbors_awaiting_ships(&self) -> impl Iterator<Item = HarborId> + '_ {
        self.ship_orders
            .iter()
            .filter(|(_, n)| **n > 0)
            .map(|(id, _)| *id)
    }

    pub fn note_ship_dispatched(&mut self, id: HarborId) {
        let orders = self.ship_orders.entry(id).or_default();
        *orders = orders.saturating_sub(1);
        *self.ships_en_route.entry(id).or_default() += 1;
    }

    pub fn note_ship_arrived(&mut self, id: HarborId) {
        let n = self.ships_en_route.entry(id).or_default();
        *n = n.saturating_sub(1);
    }

    pub fn note_ship_lost(&mut self, id: HarborId) {
        let n = self.ships_en_route.entry(id).or_default();
        *n = n.saturating_sub(1);
    }

    pub fn drop_ship_orders(&mut self, id: HarborId) {
        self.ship_orders.remove(&id);
        self.ships_en_route.remove(&id);
    }
}

/// Shared economy state for all players.
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Economy {
    pub players: BTreeMap<PlayerId, PlayerEconomy>,
}

impl Economy {
    pub fn player(&self, id: PlayerId) -> Option<&PlayerEconomy> {
        self.players.get(&id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> &mut PlayerEconomy {
        self.players.entry(id).or_default()
    }
}
