//! Uniform-scale tweening for the capture zone.
//!
//! Growth animates `Transform::scale`, and the scale is the single source of
//! truth for every derived radius.  Reading the radius mid-animation therefore
//! yields the animated value, overshoot included.

use bevy::math::curve::{Curve, EaseFunction, EasingCurve};
use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    /// Overshoots the target and settles back.
    #[default]
    BackOut,
}

impl Easing {
    /// Eased progress for `t` in `[0, 1]`.  `BackOut` exceeds 1 mid-way.
    pub fn sample(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::BackOut => {
                EasingCurve::new(0.0_f32, 1.0, EaseFunction::BackOut).sample_clamped(t)
            }
        }
    }
}

/// Animates a uniform scale from `from` to `to`.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct ScaleTween {
    from: f32,
    to: f32,
    elapsed: f32,
    duration: f32,
    easing: Easing,
    cancelled: bool,
}

impl ScaleTween {
    pub fn new(from: f32, to: f32, duration: f32, easing: Easing) -> Self {
        Self {
            from,
            to,
            elapsed: 0.0,
            duration: duration.max(0.0),
            easing,
            cancelled: false,
        }
    }

    pub fn target(&self) -> f32 {
        self.to
    }

    pub fn value(&self) -> f32 {
        if self.duration <= 0.0 {
            return self.to;
        }
        let t = self.elapsed / self.duration;
        self.from + (self.to - self.from) * self.easing.sample(t)
    }

    pub fn advance(&mut self, dt: f32) {
        if dt.is_finite() && dt > 0.0 {
            self.elapsed = (self.elapsed + dt).min(self.duration);
        }
    }

    pub fn is_finished(&self) -> bool {
        self.cancelled || self.elapsed >= self.duration
    }

    /// Stop the tween where it is.  The next tick removes it without writing.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

/// Advance every tween and write the eased scale.  Finished tweens land
/// exactly on their target and are removed.
pub fn scale_tween_system(
    mut commands: Commands,
    time: Res<Time>,
    mut q_tweens: Query<(Entity, &mut ScaleTween, &mut Transform)>,
) {
    let dt = time.delta_secs();
    for (entity, mut tween, mut transform) in q_tweens.iter_mut() {
        if tween.is_cancelled() {
            commands.entity(entity).remove::<ScaleTween>();
            continue;
        }
        tween.advance(dt);
        let value = tween.value();
        if value.is_finite() {
            transform.scale = Vec3::splat(value);
        }
        if tween.is_finished() {
            commands.entity(entity).remove::<ScaleTween>();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn back_out_overshoots_then_settles() {
        let peak = (1..20)
            .map(|i| Easing::BackOut.sample(i as f32 / 20.0))
            .fold(f32::MIN, f32::max);
        assert!(peak > 1.0, "expected overshoot, peak was {peak}");
        assert!((Easing::BackOut.sample(1.0) - 1.0).abs() < 1e-5);
        assert!(Easing::BackOut.sample(0.0).abs() < 1e-5);
    }

    #[test]
    fn zero_duration_jumps_to_target() {
        let tween = ScaleTween::new(1.0, 1.2, 0.0, Easing::BackOut);
        assert_eq!(tween.value(), 1.2);
        assert!(tween.is_finished());
    }

    #[test]
    fn system_lands_on_target_and_removes_tween() {
        let mut world = World::new();
        world.insert_resource(Time::<()>::default());
        let zone = world
            .spawn((
                Transform::default(),
                ScaleTween::new(1.0, 1.2, 0.5, Easing::BackOut),
            ))
            .id();
        let mut schedule = Schedule::default();
        schedule.add_systems(scale_tween_system);

        for _ in 0..6 {
            world
                .resource_mut::<Time>()
                .advance_by(Duration::from_millis(100));
            schedule.run(&mut world);
        }

        let transform = world.get::<Transform>(zone).unwrap();
        assert!((transform.scale.x - 1.2).abs() < 1e-5);
        assert!(world.get::<ScaleTween>(zone).is_none());
    }

    #[test]
    fn cancelled_tween_leaves_scale_alone() {
        let mut world = World::new();
        world.insert_resource(Time::<()>::default());
        let mut tween = ScaleTween::new(1.0, 2.0, 1.0, Easing::Linear);
        tween.cancel();
        let zone = world
            .spawn((Transform::from_scale(Vec3::splat(1.5)), tween))
            .id();
        let mut schedule = Schedule::default();
        schedule.add_systems(scale_tween_system);
        world
            .resource_mut::<Time>()
            .advance_by(Duration::from_millis(100));
        schedule.run(&mut world);

        assert_eq!(world.get::<Transform>(zone).unwrap().scale, Vec3::splat(1.5));
        assert!(world.get::<ScaleTween>(zone).is_none());
    }
}
