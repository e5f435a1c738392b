//! The capture zone: trigger volume, absorption tasks, ability fields,
//! progression and steering.
//!
//! - [`state`] — `CaptureZone`, derived geometry, mask radius sync
//! - [`absorption`] — the per-victim capture state machine
//! - [`effects`] — Magnet attraction / repulsion fields
//! - [`leveling`] — XP, level-ups, growth tween
//! - [`movement`] — `ZoneIntent` → zone translation

pub mod absorption;
pub mod effects;
pub mod leveling;
pub mod movement;
pub mod state;

pub use absorption::{
    absorption_system, advance, capture_trigger_system, AbsorptionPhase, AbsorptionTask,
    AbsorptionTasks, AbsorptionTuning, TaskStep, VictimConsumed,
};
pub use effects::{
    ability_field_system, clear_tractor_forces_system, field_rules, release_tractored_system,
    FieldKind, FieldRule, Tractored,
};
pub use leveling::{
    progression_system, restart_level_system, LevelUp, Progression, ProgressUpdated, RestartLevel,
};
pub use movement::{keyboard_to_intent_system, step_zone_position, zone_movement_system, ZoneIntent};
pub use state::{sync_capture_radius_system, CaptureZone, MaskRadius, ZoneGeometry};

use crate::config::SimConfig;
use crate::physics::ZoneVolume;
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

/// Half-height of the trigger cylinder at scale 1.
const TRIGGER_HALF_HEIGHT: f32 = 0.5;

/// Components for a capture zone at `position`.
///
/// The trigger is a kinematic sensor cylinder of radius `void_radius`.  Rapier
/// scales it with the entity's `Transform`, so the trigger radius follows the
/// growth tween without further bookkeeping.
pub fn zone_bundle(config: &SimConfig, position: Vec3) -> impl Bundle {
    let zone = CaptureZone::from_config(config);
    let radius = zone.effective_radius(1.0);
    (
        Name::new("CaptureZone"),
        zone,
        Progression::from_config(config),
        MaskRadius(radius),
        ZoneVolume,
        Transform::from_translation(position),
        RigidBody::KinematicPositionBased,
        Collider::cylinder(TRIGGER_HALF_HEIGHT, radius),
        Sensor,
        ActiveEvents::COLLISION_EVENTS,
        ActiveCollisionTypes::all(),
    )
}

/// Startup system: spawn the zone at the arena origin.
pub fn spawn_capture_zone(mut commands: Commands, config: Res<SimConfig>) {
    let entity = commands.spawn(zone_bundle(&config, Vec3::ZERO)).id();
    info!("Spawned capture zone {entity}");
}
