use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::map_point::MapPoint;

/// Next hop for an entity standing at a harbor and heading for a goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NextHop {
    /// No path at all; the entity should be stored locally.
    None,
    /// Continue over the road network.
    Road,
    /// Board a ship towards the given sibling harbor.
    Sea(MapPoint),
}

/// Routing oracle over the combined road and sea network.
///
/// Pathfinding itself is an external collaborator; this resource holds its
/// current answers, keyed by (from, to). Topology changes replace entries
/// and are followed by a `RoadTopologyChanged` message so harbors re-examine
/// their queues. Missing entries mean "no path".
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutingTable {
    // JSON maps need string keys, so the tuple-keyed map travels as a
    // sequence of pairs
    #[serde(with = "hops_as_pairs")]
    hops: BTreeMap<(MapPoint, MapPoint), NextHop>,
}

mod hops_as_pairs {
    use super::{MapPoint, NextHop};
    use serde::{Deserialize, Deserializer, Serializer};
    use std::collections::BTreeMap;

    type Hops = BTreeMap<(MapPoint, MapPoint), NextHop>;

    pub fn serialize<S: Serializer>(hops: &Hops, ser: S) -> Result<S::Ok, S::Error> {
        ser.collect_seq(hops.iter())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Hops, D::Error> {
        let pairs = Vec::<((MapPoint, MapPoint), NextHop)>::deserialize(de)?;
        Ok(pairs.into_iter().collect())
    }
}

impl RoutingTable {
    pub fn set_hop(&mut self, from: MapPoint, to: MapPoint, hop: NextHop) {
        self.hops.insert((from, to), hop);
    }

    pub fn clear_hop(&mut self, from: MapPoint, to: MapPoint) {
        self.hops.remove(&(from, to));
    }

    pub fn next_hop(&self, from: MapPoint, to: MapPoint) -> NextHop {
        if from == to {
            return NextHop::None;
        }
        self.hops.get(&(from, to)).copied().unwrap_or(NextHop::None)
    }

    pub fn path_exists(&self, from: MapPoint, to: MapPoint) -> bool {
        !matches!(self.next_hop(from, to), NextHop::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_routes_have_no_path() {
        let table = RoutingTable::default();
        let a = MapPoint::new(0, 0);
        let b = MapPoint::new(5, 5);
        assert_eq!(table.next_hop(a, b), NextHop::None);
        assert!(!table.path_exists(a, b));
    }

    #[test]
    fn hops_can_be_replaced_and_cleared() {
        let mut table = RoutingTable::default();
        let a = MapPoint::new(0, 0);
        let b = MapPoint::new(5, 5);
        let h = MapPoint::new(9, 9);

        table.set_hop(a, b, NextHop::Sea(h));
        assert_eq!(table.next_hop(a, b), NextHop::Sea(h));

        table.set_hop(a, b, NextHop::Road);
        assert_eq!(table.next_hop(a, b), NextHop::Road);
        assert!(table.path_exists(a, b));

        table.clear_hop(a, b);
        assert!(!table.path_exists(a, b));
    }

    #[test]
    fn populated_table_round_trips_through_json() {
        let mut table = RoutingTable::default();
        let a = MapPoint::new(0, 0);
        let b = MapPoint::new(5, 5);
        let h = MapPoint::new(9, 9);
        table.set_hop(a, b, NextHop::Sea(h));
        table.set_hop(a, h, NextHop::Road);

        let json = serde_json::to_string(&table).unwrap();
        let restored: RoutingTable = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, table);
        assert_eq!(restored.next_hop(a, b), NextHop::Sea(h));
    }
}
