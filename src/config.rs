//! Runtime simulation configuration loaded from `assets/sim.toml`.
//!
//! [`SimConfig`] is a Bevy [`Resource`] that mirrors every constant in
//! [`crate::constants`].  At startup, [`load_sim_config`] reads
//! `assets/sim.toml` and overwrites the defaults with any values present in
//! the file.  Missing keys fall back to the compile-time defaults, so a minimal
//! TOML can override just the constants you care about.
//!
//! ## Usage in systems
//!
//! Add `config: Res<SimConfig>` to any system parameter list and read values
//! with `config.edge_tolerance`, `config.magnet_base_radius`, etc.
//!
//! Keep `src/constants.rs` in sync: it remains the **authoritative default**
//! source used by `SimConfig::default()`.

use crate::ability::{AbilityParams, AbilityTable, LinearStat};
use crate::constants::*;
use crate::error::{
    validate_growth, validate_positive, validate_unit_fraction, SimError, SimResult,
};
use bevy::prelude::*;
use serde::Deserialize;

/// Default location of the runtime override file.
pub const CONFIG_PATH: &str = "assets/sim.toml";

/// Runtime-tunable absorption, progression and ability configuration.
///
/// All fields default to the corresponding compile-time constant from
/// `src/constants.rs`.  Override any subset by setting the value in
/// `assets/sim.toml`.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // ── Capture Zone ─────────────────────────────────────────────────────────
    pub void_radius: f32,
    pub sink_depth: f32,
    pub pull_force: f32,
    pub spin_rate: f32,
    pub edge_tolerance: f32,
    pub converge_timeout_secs: f32,
    pub bottom_margin: f32,
    pub finish_duration_secs: f32,
    pub environment_scan_radius: f32,
    pub tumble_impulse: f32,
    /// Classification tags the zone is allowed to swallow.
    pub target_classification: Vec<String>,

    // ── Leveling ─────────────────────────────────────────────────────────────
    pub initial_xp_to_next_level: u32,
    pub xp_requirement_growth: f32,
    pub growth_factor: f32,
    pub growth_tween_secs: f32,

    // ── Abilities ────────────────────────────────────────────────────────────
    pub magnet_duration: f32,
    pub magnet_base_radius: f32,
    pub magnet_radius_step: f32,
    pub magnet_base_force: f32,
    pub magnet_force_step: f32,
    pub speed_duration: f32,
    pub speed_base_multiplier: f32,
    pub speed_bonus_step: f32,
    pub shield_base_duration: f32,
    pub shield_duration_step: f32,
    /// Multiply ability query radii by the zone's current scale.
    pub scale_ability_radius_with_zone: bool,

    // ── Upgrades / Economy ───────────────────────────────────────────────────
    pub upgrade_base_price: u32,
    pub upgrade_price_multiplier: f32,
    pub upgrade_max_level: u32,
    pub coins_per_capture: u32,

    // ── Ability Effects ──────────────────────────────────────────────────────
    pub tractor_linear_damping: f32,
    pub tractor_angular_damping: f32,
    pub hunter_tag: String,
    pub prey_tag: String,

    // ── Zone Movement / Arena ────────────────────────────────────────────────
    pub zone_move_speed: f32,
    pub arena_half_extent: f32,

    // ── Simulation ───────────────────────────────────────────────────────────
    pub max_tick_secs: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            // Capture Zone
            void_radius: VOID_RADIUS,
            sink_depth: SINK_DEPTH,
            pull_force: PULL_FORCE,
            spin_rate: SPIN_RATE,
            edge_tolerance: EDGE_TOLERANCE,
            converge_timeout_secs: CONVERGE_TIMEOUT_SECS,
            bottom_margin: BOTTOM_MARGIN,
            finish_duration_secs: FINISH_DURATION_SECS,
            environment_scan_radius: ENVIRONMENT_SCAN_RADIUS,
            tumble_impulse: TUMBLE_IMPULSE,
            target_classification: vec![PREY_TAG.to_string(), HUNTER_TAG.to_string()],
            // Leveling
            initial_xp_to_next_level: INITIAL_XP_TO_NEXT_LEVEL,
            xp_requirement_growth: XP_REQUIREMENT_GROWTH,
            growth_factor: GROWTH_FACTOR,
            growth_tween_secs: GROWTH_TWEEN_SECS,
            // Abilities
            magnet_duration: MAGNET_DURATION,
            magnet_base_radius: MAGNET_BASE_RADIUS,
            magnet_radius_step: MAGNET_RADIUS_STEP,
            magnet_base_force: MAGNET_BASE_FORCE,
            magnet_force_step: MAGNET_FORCE_STEP,
            speed_duration: SPEED_DURATION,
            speed_base_multiplier: SPEED_BASE_MULTIPLIER,
            speed_bonus_step: SPEED_BONUS_STEP,
            shield_base_duration: SHIELD_BASE_DURATION,
            shield_duration_step: SHIELD_DURATION_STEP,
            scale_ability_radius_with_zone: true,
            // Upgrades / Economy
            upgrade_base_price: UPGRADE_BASE_PRICE,
            upgrade_price_multiplier: UPGRADE_PRICE_MULTIPLIER,
            upgrade_max_level: UPGRADE_MAX_LEVEL,
            coins_per_capture: COINS_PER_CAPTURE,
            // Ability Effects
            tractor_linear_damping: TRACTOR_LINEAR_DAMPING,
            tractor_angular_damping: TRACTOR_ANGULAR_DAMPING,
            hunter_tag: HUNTER_TAG.to_string(),
            prey_tag: PREY_TAG.to_string(),
            // Zone Movement / Arena
            zone_move_speed: ZONE_MOVE_SPEED,
            arena_half_extent: ARENA_HALF_EXTENT,
            // Simulation
            max_tick_secs: MAX_TICK_SECS,
        }
    }
}

impl SimConfig {
    /// Parse a TOML document, filling unspecified keys with defaults.
    pub fn from_toml_str(contents: &str) -> SimResult<Self> {
        toml::from_str::<SimConfig>(contents).map_err(|err| SimError::Parse {
            path: CONFIG_PATH.to_string(),
            message: err.to_string(),
        })
    }

    /// Reject values that would make the simulation unstable or a progression
    /// non-monotonic.
    pub fn validate(&self) -> SimResult<()> {
        validate_positive("void_radius", self.void_radius)?;
        validate_positive("sink_depth", self.sink_depth)?;
        validate_unit_fraction("edge_tolerance", self.edge_tolerance)?;
        validate_positive("converge_timeout_secs", self.converge_timeout_secs)?;
        validate_positive("finish_duration_secs", self.finish_duration_secs)?;
        validate_positive("growth_tween_secs", self.growth_tween_secs)?;
        validate_growth("growth_factor", self.growth_factor)?;
        validate_growth("xp_requirement_growth", self.xp_requirement_growth)?;
        validate_growth("upgrade_price_multiplier", self.upgrade_price_multiplier)?;
        validate_positive("magnet_duration", self.magnet_duration)?;
        validate_positive("speed_duration", self.speed_duration)?;
        validate_positive("shield_base_duration", self.shield_base_duration)?;
        validate_positive("magnet_base_radius", self.magnet_base_radius)?;
        validate_positive("max_tick_secs", self.max_tick_secs)?;
        if self.initial_xp_to_next_level == 0 {
            return Err(SimError::UnsafeConstant {
                name: "initial_xp_to_next_level",
                value: 0.0,
                safe_range: "[1, ∞)",
            });
        }
        Ok(())
    }

    /// Per-ability lookup table derived from the ability settings.
    ///
    /// Magnet and Speed durations carry no per-level step.
    pub fn ability_table(&self) -> AbilityTable {
        AbilityTable {
            magnet: AbilityParams {
                duration: LinearStat::constant(self.magnet_duration),
                radius: Some(LinearStat::new(
                    self.magnet_base_radius,
                    self.magnet_radius_step,
                )),
                force: Some(LinearStat::new(self.magnet_base_force, self.magnet_force_step)),
            },
            speed: AbilityParams {
                duration: LinearStat::constant(self.speed_duration),
                radius: None,
                force: Some(LinearStat::new(
                    self.speed_base_multiplier,
                    self.speed_bonus_step,
                )),
            },
            shield: AbilityParams {
                duration: LinearStat::new(self.shield_base_duration, self.shield_duration_step),
                radius: None,
                force: None,
            },
        }
    }
}

/// Startup system: attempt to load `assets/sim.toml` and overwrite the
/// `SimConfig` resource with any values present in the file.
///
/// Missing keys retain their compiled defaults.  Parse and validation errors
/// are logged but do not abort the simulation.  A missing file is not an error.
pub fn load_sim_config(mut config: ResMut<SimConfig>) {
    match std::fs::read_to_string(CONFIG_PATH) {
        Ok(contents) => match SimConfig::from_toml_str(&contents).and_then(|loaded| {
            loaded.validate()?;
            Ok(loaded)
        }) {
            Ok(loaded) => {
                *config = loaded;
                info!("Loaded simulation config from {CONFIG_PATH}");
            }
            Err(err) => {
                warn!("Rejected {CONFIG_PATH}: {err}; using defaults");
            }
        },
        Err(_) => {
            info!("No {CONFIG_PATH} found; using compiled defaults");
        }
    }
}
