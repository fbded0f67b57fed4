//! Sealanes - coastal logistics for a real-time strategy economy
//!
//! Harbors bridge the road network and sea transport: they queue wares,
//! workers and soldiers for ships, outfit colonization and exploration
//! expeditions, and tell the fleet how urgently they need a vessel.

use bevy::app::PluginGroup;
use bevy::prelude::*;

use crate::economy::EconomyPlugin;
use crate::harbor::HarborPlugin;
use crate::save::GameSavePlugin;
use crate::scheduler::SchedulerPlugin;
use crate::ships::ShipsPlugin;

pub mod constants;
pub mod economy;
pub mod harbor;
pub mod map_point;
pub mod messages;
pub mod routing;
pub mod save;
pub mod scheduler;
pub mod ships;

/// Simulation phases within one update, in execution order.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimSet {
    /// Scheduler tick and timer callbacks.
    Timers,
    /// Fleet dispatch and travel.
    Ships,
    /// Harbor command, arrival and teardown processing.
    Harbors,
}

/// Plugin group for core game logic (headless-compatible).
/// Use this for tests that don't need rendering or player input.
pub struct LogicPlugins;

impl PluginGroup for LogicPlugins {
    fn build(self) -> bevy::app::PluginGroupBuilder {
        bevy::app::PluginGroupBuilder::start::<Self>()
            .add(SimOrderPlugin)
            .add(SchedulerPlugin)
            .add(EconomyPlugin)
            .add(ShipsPlugin)
            .add(HarborPlugin)
            .add(GameSavePlugin)
    }
}

/// Orders the simulation phases; separate so every member plugin can rely
/// on the sets existing.
struct SimOrderPlugin;

impl Plugin for SimOrderPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (SimSet::Timers, SimSet::Ships, SimSet::Harbors).chain(),
        );
    }
}
