//! Game constants and configuration values
//!
//! This module centralizes the magic numbers used by the harbor and fleet logic.

// ============================================================================
// EXPEDITIONS
// ============================================================================

/// Boards required to found a new harbor via expedition
pub const HARBOR_COST_BOARDS: u32 = 6;

/// Stones required to found a new harbor via expedition
pub const HARBOR_COST_STONES: u32 = 4;

/// Scouts required before an exploration expedition may launch
pub const NUM_EXPEDITION_SCOUTS: u32 = 3;

/// Ticks between replenishment re-checks while expedition wares are missing
pub const ORDER_WARES_INTERVAL: u64 = 210;

// ============================================================================
// SHIPPING
// ============================================================================

/// Maximum number of units plus wares a single ship can carry
pub const SHIP_CAPACITY: usize = 40;

/// Fixed cost added to a ship connection to account for loading and unloading
pub const LOADING_OVERHEAD: u32 = 10;

/// Ship way costs are doubled because the ship may need to arrive first
pub const WAY_COST_FACTOR: u32 = 2;
