//! Demo arena: ground, perimeter, a herd of victims and a few pickups.
//!
//! Victim wandering lives here too.  It stands in for the external
//! locomotion controllers and respects [`Autonomy::enabled`].

use crate::ability::{Ability, AbilityPickup};
use crate::classification::{Autonomy, Classification, Power};
use crate::config::SimConfig;
use crate::physics::{CaptureBoundary, EnvironmentCollider};
use crate::simulation::SimStartupSet;
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use rand::Rng;

pub const PREY_COUNT: usize = 24;
pub const PREDATOR_COUNT: usize = 6;
pub const PICKUP_COUNT: usize = 6;
pub const PREDATOR_POWER: u32 = 3;

/// Keep spawns this far from the zone so nothing starts inside it.
const SPAWN_CLEARANCE: f32 = 4.0;
const GROUND_HALF_THICKNESS: f32 = 0.5;
const WALL_HEIGHT: f32 = 2.0;
const WANDER_SPEED: f32 = 1.5;
const WANDER_TURN_SECS: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnKind {
    Prey,
    Predator,
    Pickup(Ability),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPoint {
    pub kind: SpawnKind,
    pub position: Vec3,
}

/// Random wander heading for autonomous victims.
#[derive(Component, Debug, Clone, Copy)]
pub struct Wander {
    pub heading: Vec2,
    pub timer: f32,
}

/// Scatter victims and pickups inside the arena, away from the origin.
pub fn arena_layout(config: &SimConfig, rng: &mut impl Rng) -> Vec<SpawnPoint> {
    let extent = (config.arena_half_extent - 1.0).max(SPAWN_CLEARANCE + 1.0);
    let mut random_point = |height: f32| loop {
        let x = rng.gen_range(-extent..extent);
        let z = rng.gen_range(-extent..extent);
        if Vec2::new(x, z).length() >= SPAWN_CLEARANCE {
            break Vec3::new(x, height, z);
        }
    };

    let mut points = Vec::with_capacity(PREY_COUNT + PREDATOR_COUNT + PICKUP_COUNT);
    for _ in 0..PREY_COUNT {
        points.push(SpawnPoint {
            kind: SpawnKind::Prey,
            position: random_point(0.5),
        });
    }
    for _ in 0..PREDATOR_COUNT {
        points.push(SpawnPoint {
            kind: SpawnKind::Predator,
            position: random_point(0.75),
        });
    }
    for i in 0..PICKUP_COUNT {
        points.push(SpawnPoint {
            kind: SpawnKind::Pickup(Ability::ALL[i % Ability::COUNT]),
            position: random_point(0.5),
        });
    }
    points
}

fn spawn_point(commands: &mut Commands, config: &SimConfig, point: SpawnPoint) {
    let transform = Transform::from_translation(point.position);
    match point.kind {
        SpawnKind::Prey => {
            commands.spawn((
                Name::new("Prey"),
                Classification::single(config.prey_tag.clone()),
                Power(1),
                Autonomy::default(),
                Wander {
                    heading: Vec2::ZERO,
                    timer: 0.0,
                },
                transform,
                RigidBody::Dynamic,
                Collider::ball(0.4),
                LockedAxes::ROTATION_LOCKED,
                Velocity::zero(),
                ExternalForce::default(),
            ));
        }
        SpawnKind::Predator => {
            commands.spawn((
                Name::new("Predator"),
                Classification::single(config.hunter_tag.clone()),
                Power(PREDATOR_POWER),
                Autonomy::default(),
                Wander {
                    heading: Vec2::ZERO,
                    timer: 0.0,
                },
                transform,
                RigidBody::Dynamic,
                Collider::capsule_y(0.35, 0.4),
                LockedAxes::ROTATION_LOCKED,
                Velocity::zero(),
                ExternalForce::default(),
            ));
        }
        SpawnKind::Pickup(ability) => {
            commands.spawn((
                Name::new(format!("{} pickup", ability.label())),
                AbilityPickup(ability),
                transform,
                RigidBody::Fixed,
                Collider::ball(0.3),
                Sensor,
            ));
        }
    }
}

/// Startup system: ground, walls and the initial population.
pub fn spawn_arena(mut commands: Commands, config: Res<SimConfig>) {
    let half = config.arena_half_extent;
    commands.spawn((
        Name::new("Ground"),
        EnvironmentCollider,
        Transform::from_xyz(0.0, -GROUND_HALF_THICKNESS, 0.0),
        RigidBody::Fixed,
        Collider::cuboid(half, GROUND_HALF_THICKNESS, half),
    ));
    for (offset, extents) in [
        (Vec3::new(half, WALL_HEIGHT, 0.0), Vec3::new(0.5, WALL_HEIGHT, half)),
        (Vec3::new(-half, WALL_HEIGHT, 0.0), Vec3::new(0.5, WALL_HEIGHT, half)),
        (Vec3::new(0.0, WALL_HEIGHT, half), Vec3::new(half, WALL_HEIGHT, 0.5)),
        (Vec3::new(0.0, WALL_HEIGHT, -half), Vec3::new(half, WALL_HEIGHT, 0.5)),
    ] {
        commands.spawn((
            Name::new("Boundary"),
            CaptureBoundary,
            EnvironmentCollider,
            Transform::from_translation(offset),
            RigidBody::Fixed,
            Collider::cuboid(extents.x, extents.y, extents.z),
        ));
    }

    let layout = arena_layout(&config, &mut rand::thread_rng());
    for point in &layout {
        spawn_point(&mut commands, &config, *point);
    }
    info!("Arena populated with {} entities", layout.len());
}

/// Steer autonomous victims along a slowly changing random heading.
pub fn wander_system(
    time: Res<Time>,
    mut q: Query<(&Autonomy, &mut Wander, &mut Velocity)>,
) {
    let dt = time.delta_secs();
    let mut rng = rand::thread_rng();
    for (autonomy, mut wander, mut velocity) in q.iter_mut() {
        if !autonomy.enabled {
            continue;
        }
        wander.timer -= dt;
        if wander.timer <= 0.0 {
            let angle = rng.gen_range(0.0..std::f32::consts::TAU);
            wander.heading = Vec2::from_angle(angle);
            wander.timer = WANDER_TURN_SECS;
        }
        velocity.linvel.x = wander.heading.x * WANDER_SPEED;
        velocity.linvel.z = wander.heading.y * WANDER_SPEED;
    }
}

pub struct ArenaPlugin;

impl Plugin for ArenaPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_arena.in_set(SimStartupSet::Spawn))
            .add_systems(Update, wander_system);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn layout_keeps_clear_of_the_zone_and_inside_the_walls() {
        let config = SimConfig::default();
        let mut rng = StdRng::seed_from_u64(7);
        let layout = arena_layout(&config, &mut rng);
        assert_eq!(layout.len(), PREY_COUNT + PREDATOR_COUNT + PICKUP_COUNT);
        for point in &layout {
            let planar = Vec2::new(point.position.x, point.position.z);
            assert!(planar.length() >= SPAWN_CLEARANCE);
            assert!(planar.x.abs() < config.arena_half_extent);
            assert!(planar.y.abs() < config.arena_half_extent);
        }
    }

    #[test]
    fn every_ability_gets_a_pickup() {
        let mut rng = StdRng::seed_from_u64(1);
        let layout = arena_layout(&SimConfig::default(), &mut rng);
        for ability in Ability::ALL {
            assert!(layout
                .iter()
                .any(|p| p.kind == SpawnKind::Pickup(ability)));
        }
    }
}
