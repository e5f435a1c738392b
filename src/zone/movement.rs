//! Player steering of the capture zone.
//!
//! Input systems write [`ZoneIntent`]; [`zone_movement_system`] is the only
//! system that moves the zone.  Tests drive movement by setting the intent
//! directly.

use super::state::CaptureZone;
use crate::ability::AbilityLedger;
use crate::config::SimConfig;
use bevy::prelude::*;

/// Desired horizontal heading of the zone.  `x` maps to world X, `y` to
/// world Z.  Longer-than-unit vectors are normalised.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct ZoneIntent {
    pub direction: Vec2,
}

/// Translate WASD / arrow keys into [`ZoneIntent`].
pub fn keyboard_to_intent_system(keys: Res<ButtonInput<KeyCode>>, mut intent: ResMut<ZoneIntent>) {
    let mut direction = Vec2::ZERO;
    if keys.any_pressed([KeyCode::KeyW, KeyCode::ArrowUp]) {
        direction.y -= 1.0;
    }
    if keys.any_pressed([KeyCode::KeyS, KeyCode::ArrowDown]) {
        direction.y += 1.0;
    }
    if keys.any_pressed([KeyCode::KeyA, KeyCode::ArrowLeft]) {
        direction.x -= 1.0;
    }
    if keys.any_pressed([KeyCode::KeyD, KeyCode::ArrowRight]) {
        direction.x += 1.0;
    }
    intent.direction = direction;
}

/// Next zone position after moving along `direction` for `dt` seconds,
/// kept inside the square arena of half-width `half_extent`.
pub fn step_zone_position(
    position: Vec3,
    direction: Vec2,
    speed: f32,
    dt: f32,
    half_extent: f32,
) -> Vec3 {
    let heading = if direction.length_squared() > 1.0 {
        direction.normalize_or_zero()
    } else {
        direction
    };
    let delta = heading * speed * dt;
    if !delta.is_finite() {
        return position;
    }
    let limit = half_extent.max(0.0);
    Vec3::new(
        (position.x + delta.x).clamp(-limit, limit),
        position.y,
        (position.z + delta.y).clamp(-limit, limit),
    )
}

/// Move every zone along the current intent.  Speed is boosted while the
/// Speed ability is active.
pub fn zone_movement_system(
    time: Res<Time>,
    config: Res<SimConfig>,
    intent: Res<ZoneIntent>,
    ledger: Res<AbilityLedger>,
    mut q_zone: Query<&mut Transform, With<CaptureZone>>,
) {
    if intent.direction == Vec2::ZERO {
        return;
    }
    let speed = config.zone_move_speed * ledger.speed_multiplier();
    let dt = time.delta_secs();
    for mut transform in q_zone.iter_mut() {
        transform.translation = step_zone_position(
            transform.translation,
            intent.direction,
            speed,
            dt,
            config.arena_half_extent,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ability::Ability;
    use std::time::Duration;

    #[test]
    fn diagonal_input_is_normalised() {
        let next = step_zone_position(Vec3::ZERO, Vec2::new(1.0, 1.0), 5.0, 1.0, 100.0);
        assert!((Vec2::new(next.x, next.z).length() - 5.0).abs() < 1e-4);
        assert_eq!(next.y, 0.0);
    }

    #[test]
    fn position_is_clamped_to_arena() {
        let next = step_zone_position(Vec3::new(24.0, 0.0, 0.0), Vec2::X, 5.0, 1.0, 25.0);
        assert_eq!(next.x, 25.0);
    }

    #[test]
    fn speed_ability_boosts_movement() {
        let mut world = World::new();
        world.insert_resource(Time::<()>::default());
        let config = SimConfig::default();
        let mut ledger = AbilityLedger::from_config(&config);
        ledger.activate(Ability::Speed);
        let multiplier = ledger.speed_multiplier();
        world.insert_resource(config.clone());
        world.insert_resource(ledger);
        world.insert_resource(ZoneIntent {
            direction: Vec2::X,
        });
        let zone = world
            .spawn((CaptureZone::from_config(&config), Transform::default()))
            .id();
        let mut schedule = Schedule::default();
        schedule.add_systems(zone_movement_system);
        world
            .resource_mut::<Time>()
            .advance_by(Duration::from_millis(500));
        schedule.run(&mut world);

        let x = world.get::<Transform>(zone).unwrap().translation.x;
        assert!(multiplier > 1.0);
        assert!((x - config.zone_move_speed * multiplier * 0.5).abs() < 1e-4);
    }
}
