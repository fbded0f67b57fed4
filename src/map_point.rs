use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer map coordinate.
///
/// Ordered and hashed so it can key `BTreeMap`s in decision paths; all
/// destination comparisons in the harbor use exact coordinate equality.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct MapPoint {
    pub x: u32,
    pub y: u32,
}

impl MapPoint {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Chebyshev distance, the number of steps between two points.
    /// Integer-only so it is identical on every peer.
    pub fn distance(self, other: MapPoint) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        dx.max(dy)
    }
}

impl fmt::Display for MapPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Id of a connected body of navigable water. 0 means "no sea".
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct SeaId(pub u16);

impl SeaId {
    pub const NONE: SeaId = SeaId(0);

    pub fn is_some(self) -> bool {
        self.0 != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_chebyshev() {
        let a = MapPoint::new(2, 3);
        assert_eq!(a.distance(MapPoint::new(2, 3)), 0);
        assert_eq!(a.distance(MapPoint::new(5, 3)), 3);
        assert_eq!(a.distance(MapPoint::new(0, 9)), 6);
        assert_eq!(MapPoint::new(0, 9).distance(a), 6);
    }

    #[test]
    fn sea_id_zero_means_none() {
        assert!(!SeaId::NONE.is_some());
        assert!(SeaId(3).is_some());
    }
}
