use std::fs;
use std::path::PathBuf;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::economy::Economy;
use crate::harbor::{Harbor, HarborIndex};
use crate::routing::RoutingTable;
use crate::scheduler::Scheduler;
use crate::ships::Ship;

/// Plugin wiring the JSON snapshot save/load pipeline.
pub struct GameSavePlugin;

/// Default save settings (currently only the fallback save path).
#[derive(Resource, Clone)]
pub struct SaveSettings {
    /// Filesystem path used when requests do not provide one.
    pub default_path: PathBuf,
}

impl Default for SaveSettings {
    fn default() -> Self {
        Self {
            default_path: PathBuf::from("saves/autosave.json"),
        }
    }
}

/// Request to write the current game state to disk.
#[derive(Message, Clone)]
pub struct SaveGameRequest {
    pub path: Option<PathBuf>,
}

/// Request to load a saved game from disk.
#[derive(Message, Clone)]
pub struct LoadGameRequest {
    pub path: Option<PathBuf>,
}

/// Notification emitted after a successful save operation.
#[derive(Message, Clone)]
pub struct SaveGameCompleted {
    pub path: PathBuf,
}

/// Notification emitted after a successful load operation.
#[derive(Message, Clone)]
pub struct LoadGameCompleted {
    pub path: PathBuf,
}

/// A harbor plus the state its snapshot cannot carry directly: pending
/// timers are stored as remaining delay and re-armed on load, so handles
/// stay local to each scheduler instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarborSnapshot {
    pub harbor: Harbor,
    pub replenish_remaining: Option<u64>,
}

/// Everything needed to restore a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub economy: Economy,
    pub routing: RoutingTable,
    pub harbors: Vec<HarborSnapshot>,
    pub ships: Vec<Ship>,
}

impl Plugin for GameSavePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SaveSettings>()
            .add_message::<SaveGameRequest>()
            .add_message::<LoadGameRequest>()
            .add_message::<SaveGameCompleted>()
            .add_message::<LoadGameCompleted>()
            .add_systems(Update, (process_save_requests, process_load_requests));
    }
}

/// Assemble a snapshot from the live state. Harbors are ordered by id so
/// the output is identical for identical sessions.
pub fn collect_snapshot<'a>(
    economy: &Economy,
    routing: &RoutingTable,
    scheduler: &Scheduler,
    harbors: impl IntoIterator<Item = &'a Harbor>,
    ships: impl IntoIterator<Item = &'a Ship>,
) -> WorldSnapshot {
    let mut harbor_snapshots: Vec<HarborSnapshot> = harbors
        .into_iter()
        .map(|harbor| HarborSnapshot {
            harbor: harbor.clone(),
            replenish_remaining: harbor
                .replenish_timer
                .and_then(|handle| scheduler.remaining(handle)),
        })
        .collect();
    harbor_snapshots.sort_by_key(|s| s.harbor.id);

    WorldSnapshot {
        tick: scheduler.now(),
        economy: economy.clone(),
        routing: routing.clone(),
        harbors: harbor_snapshots,
        ships: ships.into_iter().cloned().collect(),
    }
}

fn process_save_requests(
    mut requests: MessageReader<SaveGameRequest>,
    settings: Res<SaveSettings>,
    economy: Res<Economy>,
    routing: Res<RoutingTable>,
    scheduler: Res<Scheduler>,
    harbors: Query<&Harbor>,
    ships: Query<&Ship>,
    mut completed: MessageWriter<SaveGameCompleted>,
) {
    for request in requests.read() {
        let path = request
            .path
            .clone()
            .unwrap_or_else(|| settings.default_path.clone());

        let snapshot = collect_snapshot(&economy, &routing, &scheduler, &harbors, &ships);
        let json = match serde_json::to_string_pretty(&snapshot) {
            Ok(json) => json,
            Err(err) => {
                error!("failed to serialize snapshot: {err}");
                continue;
            }
        };
        if let Some(parent) = path.parent()
            && let Err(err) = fs::create_dir_all(parent)
        {
            error!("failed to create save directory: {err}");
            continue;
        }
        match fs::write(&path, json) {
            Ok(()) => {
                info!("saved game to {}", path.display());
                completed.write(SaveGameCompleted { path });
            }
            Err(err) => error!("failed to write {}: {err}", path.display()),
        }
    }
}

fn process_load_requests(
    mut requests: MessageReader<LoadGameRequest>,
    mut commands: Commands,
    settings: Res<SaveSettings>,
    mut economy: ResMut<Economy>,
    mut routing: ResMut<RoutingTable>,
    mut scheduler: ResMut<Scheduler>,
    mut index: ResMut<HarborIndex>,
    live_harbors: Query<Entity, With<Harbor>>,
    live_ships: Query<Entity, With<Ship>>,
    mut completed: MessageWriter<LoadGameCompleted>,
) {
    for request in requests.read() {
        let path = request
            .path
            .clone()
            .unwrap_or_else(|| settings.default_path.clone());

        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(err) => {
                error!("failed to read {}: {err}", path.display());
                continue;
            }
        };
        let snapshot: WorldSnapshot = match serde_json::from_str(&json) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                error!("failed to parse {}: {err}", path.display());
                continue;
            }
        };

        for entity in live_harbors.iter().chain(live_ships.iter()) {
            commands.entity(entity).despawn();
        }
        *index = HarborIndex::default();

        *economy = snapshot.economy;
        *routing = snapshot.routing;
        scheduler.reset_to(snapshot.tick);

        for harbor_snapshot in snapshot.harbors {
            let mut harbor = harbor_snapshot.harbor;
            if let Some(delay) = harbor_snapshot.replenish_remaining {
                harbor.replenish_timer = Some(scheduler.schedule(harbor.id, delay));
            }
            commands.spawn(harbor);
        }
        for ship in snapshot.ships {
            commands.spawn(ship);
        }

        info!("loaded game from {}", path.display());
        completed.write(LoadGameCompleted { path });
    }
}
