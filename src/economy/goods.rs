use core::fmt;

use serde::{Deserialize, Serialize};

/// A transportable good.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize,
)]
pub enum Good {
    // Construction materials
    Boards,
    Stones,

    // Tools
    Hammer,
    Bow,

    // Food
    Fish,
    Bread,
    Meat,

    // Raw resources
    Timber,
    Iron,
    Coal,
    Gold,

    // Special
    Boat,
    Coins,
}

impl Good {
    /// Returns true if this good is consumed when founding a new harbor
    pub fn is_construction_material(self) -> bool {
        matches!(self, Good::Boards | Good::Stones)
    }

    /// Returns true if this good is a tool used to recruit a worker
    pub fn is_tool(self) -> bool {
        matches!(self, Good::Hammer | Good::Bow)
    }

    /// Returns true if this good feeds workers
    pub fn is_food(self) -> bool {
        matches!(self, Good::Fish | Good::Bread | Good::Meat)
    }
}

impl fmt::Display for Good {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Good::Boards => write!(f, "Boards"),
            Good::Stones => write!(f, "Stones"),
            Good::Hammer => write!(f, "Hammer"),
            Good::Bow => write!(f, "Bow"),
            Good::Fish => write!(f, "Fish"),
            Good::Bread => write!(f, "Bread"),
            Good::Meat => write!(f, "Meat"),
            Good::Timber => write!(f, "Timber"),
            Good::Iron => write!(f, "Iron"),
            Good::Coal => write!(f, "Coal"),
            Good::Gold => write!(f, "Gold"),
            Good::Boat => write!(f, "Boat"),
            Good::Coins => write!(f, "Coins"),
        }
    }
}
