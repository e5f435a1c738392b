//! Simulation plugin: registers every resource, message and system of the
//! capture engine.
//!
//! Rapier is deliberately *not* added here.  The binary installs
//! `RapierPhysicsPlugin::<PassThroughHooks>`; tests run the plugin under
//! `MinimalPlugins` and inject `CollisionEvent`s by hand.
//!
//! ## Per-tick order (`Update`)
//!
//! | Set | Systems |
//! |-----|---------|
//! | `Input` | level restart, zone movement |
//! | `Growth` | scale tween, mask radius sync |
//! | `Abilities` | decay → pickups → activation → upgrades |
//! | `Effects` | tractor release → force clear → ability fields |
//! | `Capture` | trigger entry/exit → absorption tasks |
//! | `Progression` | XP + growth, coins, wallet persistence |

use crate::ability::{
    ability_activation_system, ability_decay_system, ability_pickup_system, setup_ability_ledger,
    upgrade_request_system, AbilityActivated, AbilityDeactivated, AbilityLedger, ActivateAbility,
    UpgradeRequest, UpgradesChanged,
};
use crate::config::{load_sim_config, SimConfig};
use crate::economy::{capture_coin_system, load_wallet_system, persist_wallet_system, Wallet};
use crate::tween::scale_tween_system;
use crate::zone::{
    ability_field_system, absorption_system, capture_trigger_system, clear_tractor_forces_system,
    progression_system, release_tractored_system, restart_level_system, spawn_capture_zone,
    sync_capture_radius_system, zone_movement_system, AbsorptionTasks, LevelUp, ProgressUpdated,
    RestartLevel, VictimConsumed, ZoneIntent,
};
use bevy::prelude::*;
use bevy_rapier3d::prelude::CollisionEvent;

/// Ordered stages of one simulation tick.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub enum SimSet {
    Input,
    Growth,
    Abilities,
    Effects,
    Capture,
    Progression,
}

/// Startup stages: config first so every later system sees final values.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub enum SimStartupSet {
    Config,
    Services,
    Spawn,
}

pub struct SimulationPlugin {
    /// Read `assets/sim.toml` at startup.
    pub load_config_file: bool,
}

impl Default for SimulationPlugin {
    fn default() -> Self {
        Self {
            load_config_file: true,
        }
    }
}

impl SimulationPlugin {
    /// Compiled defaults (or a pre-inserted `SimConfig`) only.  No file I/O.
    pub fn headless() -> Self {
        Self {
            load_config_file: false,
        }
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimConfig>()
            .init_resource::<AbilityLedger>()
            .init_resource::<AbsorptionTasks>()
            .init_resource::<Wallet>()
            .init_resource::<ZoneIntent>();

        app.add_message::<CollisionEvent>()
            .add_message::<ActivateAbility>()
            .add_message::<AbilityActivated>()
            .add_message::<AbilityDeactivated>()
            .add_message::<UpgradeRequest>()
            .add_message::<UpgradesChanged>()
            .add_message::<VictimConsumed>()
            .add_message::<ProgressUpdated>()
            .add_message::<LevelUp>()
            .add_message::<RestartLevel>();

        app.configure_sets(
            Startup,
            (
                SimStartupSet::Config,
                SimStartupSet::Services,
                SimStartupSet::Spawn,
            )
                .chain(),
        );
        if self.load_config_file {
            app.add_systems(Startup, load_sim_config.in_set(SimStartupSet::Config));
        }
        app.add_systems(
            Startup,
            (
                (setup_ability_ledger, load_wallet_system).in_set(SimStartupSet::Services),
                spawn_capture_zone.in_set(SimStartupSet::Spawn),
            ),
        );

        app.configure_sets(
            Update,
            (
                SimSet::Input,
                SimSet::Growth,
                SimSet::Abilities,
                SimSet::Effects,
                SimSet::Capture,
                SimSet::Progression,
            )
                .chain(),
        );
        app.add_systems(
            Update,
            (
                (restart_level_system, zone_movement_system)
                    .chain()
                    .in_set(SimSet::Input),
                (scale_tween_system, sync_capture_radius_system)
                    .chain()
                    .in_set(SimSet::Growth),
                (
                    ability_decay_system,
                    ability_pickup_system,
                    ability_activation_system,
                    upgrade_request_system,
                )
                    .chain()
                    .in_set(SimSet::Abilities),
                (
                    release_tractored_system,
                    clear_tractor_forces_system,
                    ability_field_system,
                )
                    .chain()
                    .in_set(SimSet::Effects),
                (capture_trigger_system, absorption_system)
                    .chain()
                    .in_set(SimSet::Capture),
                (progression_system, capture_coin_system, persist_wallet_system)
                    .chain()
                    .in_set(SimSet::Progression),
            ),
        );
    }
}
