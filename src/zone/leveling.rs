//! XP, level-ups and zone growth.

use super::absorption::{AbsorptionTasks, VictimConsumed};
use super::state::{CaptureZone, MaskRadius};
use crate::ability::AbilityLedger;
use crate::config::SimConfig;
use crate::tween::{Easing, ScaleTween};
use bevy::prelude::*;
use std::collections::HashMap;

/// Level and XP of a capture zone.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Progression {
    pub level: u32,
    pub current_xp: u32,
    pub xp_to_next_level: u32,
    /// Multiplier applied to `xp_to_next_level` on every level-up.
    pub requirement_growth: f32,
}

impl Progression {
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            level: 1,
            current_xp: 0,
            xp_to_next_level: config.initial_xp_to_next_level.max(1),
            requirement_growth: config.xp_requirement_growth,
        }
    }

    /// Add `xp`.  Returns the new level when the threshold was reached.
    ///
    /// At most one level is gained per grant; overflow XP is discarded.
    pub fn grant(&mut self, xp: u32) -> Option<u32> {
        self.current_xp = self.current_xp.saturating_add(xp);
        if self.current_xp < self.xp_to_next_level {
            return None;
        }
        self.level += 1;
        self.current_xp = 0;
        let next = (self.xp_to_next_level as f32 * self.requirement_growth).floor();
        self.xp_to_next_level = if next.is_finite() {
            (next as u32).max(1)
        } else {
            self.xp_to_next_level
        };
        Some(self.level)
    }

    /// Progress toward the next level in `[0, 1]`.
    pub fn fraction(&self) -> f32 {
        (self.current_xp as f32 / self.xp_to_next_level.max(1) as f32).clamp(0.0, 1.0)
    }
}

// ── Messages ──────────────────────────────────────────────────────────────────

#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct ProgressUpdated {
    pub zone: Entity,
    pub fraction: f32,
}

#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelUp {
    pub zone: Entity,
    pub new_level: u32,
}

/// Start the level over: progression, size, timers and pending captures are
/// reset.  Upgrade levels and coins survive.
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct RestartLevel;

// ── Systems ───────────────────────────────────────────────────────────────────

/// Turn swallowed victims into XP and grow the zone on level-up.
pub fn progression_system(
    mut commands: Commands,
    config: Res<SimConfig>,
    mut consumed: MessageReader<VictimConsumed>,
    mut q_zone: Query<(&mut Progression, &Transform, Option<&ScaleTween>)>,
    mut progress: MessageWriter<ProgressUpdated>,
    mut level_up: MessageWriter<LevelUp>,
) {
    // Scale target per zone, compounded across every level-up this tick.
    let mut targets: HashMap<Entity, (f32, f32)> = HashMap::new();

    for victim in consumed.read() {
        let Ok((mut progression, transform, tween)) = q_zone.get_mut(victim.zone) else {
            continue;
        };
        if victim.tags.iter().any(|t| *t == config.hunter_tag) {
            debug!("Zone {} swallowed a {}", victim.zone, config.hunter_tag);
        }

        let leveled = progression.grant(victim.xp());
        progress.write(ProgressUpdated {
            zone: victim.zone,
            fraction: progression.fraction(),
        });

        let Some(new_level) = leveled else {
            continue;
        };
        let (_, target) = targets.entry(victim.zone).or_insert_with(|| {
            let base = tween
                .filter(|t| !t.is_finished())
                .map_or(transform.scale.x, ScaleTween::target);
            (transform.scale.x, base)
        });
        *target *= config.growth_factor;
        info!("Zone reached level {new_level}; growing to scale {target:.2}");
        level_up.write(LevelUp {
            zone: victim.zone,
            new_level,
        });
    }

    for (zone, (from, to)) in targets {
        commands.entity(zone).insert(ScaleTween::new(
            from,
            to,
            config.growth_tween_secs,
            Easing::BackOut,
        ));
    }
}

pub fn restart_level_system(
    mut commands: Commands,
    mut restart: MessageReader<RestartLevel>,
    config: Res<SimConfig>,
    mut ledger: ResMut<AbilityLedger>,
    mut tasks: ResMut<AbsorptionTasks>,
    mut q_zone: Query<(
        Entity,
        &CaptureZone,
        &mut Progression,
        &mut Transform,
        &mut MaskRadius,
    )>,
) {
    if restart.read().count() == 0 {
        return;
    }
    ledger.reset_active_effects();
    // Committed victims are already falling through the floor; swallow them
    // without reward.
    for victim in tasks.clear() {
        if let Ok(mut entity) = commands.get_entity(victim) {
            entity.despawn();
        }
    }
    for (entity, zone, mut progression, mut transform, mut mask) in q_zone.iter_mut() {
        *progression = Progression::from_config(&config);
        transform.scale = Vec3::ONE;
        mask.0 = zone.effective_radius(1.0);
        commands.entity(entity).remove::<ScaleTween>();
    }
    info!("Level restarted");
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::message::Messages;
    use std::time::Duration;

    #[test]
    fn large_grant_levels_up_exactly_once() {
        let mut p = Progression::from_config(&SimConfig::default());
        assert_eq!(p.xp_to_next_level, 5);
        assert_eq!(p.grant(50), Some(2));
        assert_eq!(p.level, 2);
        assert_eq!(p.current_xp, 0);
        assert_eq!(p.xp_to_next_level, 7);
    }

    #[test]
    fn requirement_grows_by_floor() {
        let mut p = Progression::from_config(&SimConfig::default());
        let mut requirements = Vec::new();
        for _ in 0..4 {
            let need = p.xp_to_next_level;
            requirements.push(need);
            assert_eq!(p.grant(need - 1), None);
            assert!(p.grant(1).is_some());
        }
        assert_eq!(requirements, vec![5, 7, 10, 15]);
        assert_eq!(p.level, 5);
    }

    #[test]
    fn fraction_reports_partial_progress() {
        let mut p = Progression::from_config(&SimConfig::default());
        p.grant(2);
        assert!((p.fraction() - 0.4).abs() < 1e-6);
    }

    fn growth_world() -> (World, Schedule, Entity) {
        let mut world = World::new();
        world.insert_resource(Time::<()>::default());
        world.insert_resource(SimConfig::default());
        world.init_resource::<Messages<VictimConsumed>>();
        world.init_resource::<Messages<ProgressUpdated>>();
        world.init_resource::<Messages<LevelUp>>();
        let zone = world
            .spawn((
                Progression::from_config(&SimConfig::default()),
                Transform::default(),
            ))
            .id();
        let mut schedule = Schedule::default();
        schedule.add_systems((progression_system, crate::tween::scale_tween_system).chain());
        (world, schedule, zone)
    }

    fn consume(world: &mut World, zone: Entity, power: u32) {
        let victim = world.spawn_empty().id();
        world.write_message(VictimConsumed {
            zone,
            victim,
            tags: vec!["Prey".into()],
            power,
        });
    }

    #[test]
    fn level_up_grows_zone_with_overshoot() {
        let (mut world, mut schedule, zone) = growth_world();
        consume(&mut world, zone, 5);
        schedule.run(&mut world);
        assert_eq!(world.get::<Progression>(zone).unwrap().level, 2);
        assert!(world.get::<ScaleTween>(zone).is_some());

        let mut peak = 0.0_f32;
        for _ in 0..10 {
            world
                .resource_mut::<Time>()
                .advance_by(Duration::from_millis(50));
            schedule.run(&mut world);
            peak = peak.max(world.get::<Transform>(zone).unwrap().scale.x);
        }
        assert!(peak > 1.2, "BackOut should overshoot, peak {peak}");
        let scale = world.get::<Transform>(zone).unwrap().scale.x;
        assert!((scale - 1.2).abs() < 1e-4);
    }

    #[test]
    fn back_to_back_level_ups_compound_target() {
        let (mut world, mut schedule, zone) = growth_world();
        consume(&mut world, zone, 5);
        schedule.run(&mut world);
        consume(&mut world, zone, 7);
        schedule.run(&mut world);

        let tween = world.get::<ScaleTween>(zone).unwrap();
        assert!((tween.target() - 1.2 * 1.2).abs() < 1e-5);
    }

    #[test]
    fn simultaneous_level_ups_each_grow_the_zone() {
        let (mut world, mut schedule, zone) = growth_world();
        consume(&mut world, zone, 5);
        consume(&mut world, zone, 7);
        schedule.run(&mut world);
        assert_eq!(world.get::<Progression>(zone).unwrap().level, 3);

        for _ in 0..12 {
            world
                .resource_mut::<Time>()
                .advance_by(Duration::from_millis(50));
            schedule.run(&mut world);
        }
        let scale = world.get::<Transform>(zone).unwrap().scale.x;
        assert!((scale - 1.2 * 1.2).abs() < 1e-4, "zone scale {scale}");
    }

    #[test]
    fn restart_swallows_committed_victims_without_reward() {
        use crate::classification::{Autonomy, Classification};
        use crate::zone::absorption::absorption_system;

        let config = SimConfig::default();
        let mut world = World::new();
        world.insert_resource(Time::<()>::default());
        world.insert_resource(config.clone());
        world.insert_resource(AbilityLedger::from_config(&config));
        world.init_resource::<AbsorptionTasks>();
        world.init_resource::<Messages<VictimConsumed>>();
        world.init_resource::<Messages<RestartLevel>>();
        let zone = world
            .spawn((
                CaptureZone::from_config(&config),
                Progression::from_config(&config),
                Transform::default(),
                MaskRadius(1.0),
            ))
            .id();
        let waiting = world
            .spawn((
                Classification::single("Prey"),
                Autonomy::default(),
                Transform::from_xyz(0.95, 0.0, 0.0),
            ))
            .id();
        let falling = world
            .spawn((
                Classification::single("Prey"),
                Autonomy::default(),
                Transform::from_xyz(0.1, 0.0, 0.0),
            ))
            .id();
        {
            let mut tasks = world.resource_mut::<AbsorptionTasks>();
            tasks.begin(zone, waiting);
            tasks.begin(zone, falling);
        }

        let mut schedule = Schedule::default();
        schedule.add_systems((absorption_system, restart_level_system).chain());
        schedule.run(&mut world);
        assert!(world.resource::<AbsorptionTasks>().is_committed(falling));
        assert!(!world.resource::<AbsorptionTasks>().is_committed(waiting));

        world.write_message(RestartLevel);
        schedule.run(&mut world);

        assert!(world.resource::<AbsorptionTasks>().is_empty());
        assert!(world.get_entity(falling).is_err());
        assert!(world.get_entity(waiting).is_ok());
        assert!(world.resource::<Messages<VictimConsumed>>().is_empty());
    }
}
