//! Ability fields applied by the zone each tick.
//!
//! While an ability is active, each [`FieldRule`] selects victims by tag within
//! the ability's radius and pushes them horizontally:
//!
//! - **Attract**: a continuous `ExternalForce` toward the zone centre.
//! - **Repel**: a per-tick velocity change away from the zone centre.
//!
//! The first time an entity is grabbed it is tagged [`Tractored`]: its
//! controller is disabled, it becomes a dynamic body and receives heavy
//! damping.  Once the source ability ends, [`release_tractored_system`] puts
//! everything back.

use super::absorption::AbsorptionTasks;
use super::state::CaptureZone;
use crate::ability::{Ability, AbilityLedger};
use crate::classification::{Autonomy, Classification};
use crate::config::SimConfig;
use crate::physics::{clamp_tick, finite_or_zero, horizontal_direction};
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Attract,
    Repel,
}

/// One ability/tag pairing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    pub ability: Ability,
    pub tag: String,
    pub kind: FieldKind,
}

/// Magnet pulls hunters in and pushes prey away.
pub fn field_rules(config: &SimConfig) -> Vec<FieldRule> {
    vec![
        FieldRule {
            ability: Ability::Magnet,
            tag: config.hunter_tag.clone(),
            kind: FieldKind::Attract,
        },
        FieldRule {
            ability: Ability::Magnet,
            tag: config.prey_tag.clone(),
            kind: FieldKind::Repel,
        },
    ]
}

/// State saved when an ability field takes over an entity.
#[derive(Component, Debug, Clone, Copy)]
pub struct Tractored {
    pub previous_damping: Option<Damping>,
    pub previous_body: Option<RigidBody>,
    pub source: Ability,
}

type FieldTargets<'w, 's> = Query<
    'w,
    's,
    (
        Entity,
        &'static Transform,
        &'static Classification,
        Option<&'static mut Autonomy>,
        Option<&'static Tractored>,
        Option<&'static Damping>,
        Option<&'static RigidBody>,
        Option<&'static mut ExternalForce>,
        Option<&'static mut Velocity>,
    ),
    Without<CaptureZone>,
>;

/// Zero last tick's attraction so forces never accumulate across ticks.
pub fn clear_tractor_forces_system(mut q: Query<&mut ExternalForce, With<Tractored>>) {
    for mut force in q.iter_mut() {
        if force.force != Vec3::ZERO {
            force.force = Vec3::ZERO;
        }
    }
}

pub fn ability_field_system(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<SimConfig>,
    ledger: Res<AbilityLedger>,
    tasks: Res<AbsorptionTasks>,
    q_zone: Query<(&CaptureZone, &Transform)>,
    mut q_targets: FieldTargets,
) {
    let rules: Vec<FieldRule> = field_rules(&config)
        .into_iter()
        .filter(|rule| ledger.is_active(rule.ability))
        .collect();
    if rules.is_empty() {
        return;
    }
    let step = clamp_tick(time.delta_secs(), config.max_tick_secs);

    for (_, zone_transform) in q_zone.iter() {
        let center = zone_transform.translation;
        let scale = if config.scale_ability_radius_with_zone {
            zone_transform.scale.x
        } else {
            1.0
        };

        for rule in &rules {
            let (Some(radius), Some(strength)) =
                (ledger.radius(rule.ability), ledger.force(rule.ability))
            else {
                continue;
            };
            let radius = radius * scale;

            for (
                entity,
                transform,
                classification,
                autonomy,
                tractored,
                damping,
                body,
                force,
                velocity,
            ) in q_targets.iter_mut()
            {
                if !classification.has(&rule.tag)
                    || tasks.is_committed(entity)
                    || transform.translation.distance(center) > radius
                {
                    continue;
                }

                if tractored.is_none() {
                    if let Some(mut autonomy) = autonomy {
                        autonomy.enabled = false;
                    }
                    commands.entity(entity).insert((
                        Tractored {
                            previous_damping: damping.copied(),
                            previous_body: body.copied(),
                            source: rule.ability,
                        },
                        RigidBody::Dynamic,
                        Damping {
                            linear_damping: config.tractor_linear_damping,
                            angular_damping: config.tractor_angular_damping,
                        },
                    ));
                }

                match rule.kind {
                    FieldKind::Attract => {
                        let push = finite_or_zero(
                            horizontal_direction(transform.translation, center) * strength,
                            "magnet attraction",
                        );
                        match force {
                            Some(mut force) => force.force += push,
                            None => {
                                commands.entity(entity).insert(ExternalForce {
                                    force: push,
                                    torque: Vec3::ZERO,
                                });
                            }
                        }
                    }
                    FieldKind::Repel => {
                        let delta = finite_or_zero(
                            horizontal_direction(center, transform.translation) * strength * step,
                            "magnet repulsion",
                        );
                        match velocity {
                            Some(mut velocity) => velocity.linvel += delta,
                            None => {
                                commands.entity(entity).insert(Velocity::linear(delta));
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Hand entities back to their controllers once the grabbing ability ends.
pub fn release_tractored_system(
    mut commands: Commands,
    ledger: Res<AbilityLedger>,
    mut q: Query<(Entity, &Tractored, Option<&mut Autonomy>)>,
) {
    for (entity, tractored, autonomy) in q.iter_mut() {
        if ledger.is_active(tractored.source) {
            continue;
        }
        let mut e = commands.entity(entity);
        e.remove::<Tractored>();
        e.insert(ExternalForce::default());
        match tractored.previous_damping {
            Some(damping) => {
                e.insert(damping);
            }
            None => {
                e.remove::<Damping>();
            }
        }
        match tractored.previous_body {
            Some(body) => {
                e.insert(body);
            }
            None => {
                e.remove::<RigidBody>();
            }
        }
        if let Some(mut autonomy) = autonomy {
            autonomy.enabled = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ability::{ability_decay_system, AbilityDeactivated};
    use bevy::ecs::message::Messages;
    use std::time::Duration;

    struct Fixture {
        world: World,
        schedule: Schedule,
        hunter: Entity,
        prey: Entity,
    }

    fn fixture() -> Fixture {
        let mut world = World::new();
        world.insert_resource(Time::<()>::default());
        world.insert_resource(SimConfig::default());
        world.insert_resource(AbilityLedger::from_config(&SimConfig::default()));
        world.init_resource::<AbsorptionTasks>();
        world.init_resource::<Messages<AbilityDeactivated>>();
        world.spawn((
            CaptureZone::from_config(&SimConfig::default()),
            Transform::default(),
        ));
        let hunter = world
            .spawn((
                Classification::single("Predator"),
                Autonomy::default(),
                RigidBody::KinematicPositionBased,
                Transform::from_xyz(2.0, 1.0, 0.0),
            ))
            .id();
        let prey = world
            .spawn((
                Classification::single("Prey"),
                Autonomy::default(),
                Transform::from_xyz(0.0, 0.5, 2.0),
            ))
            .id();
        let mut schedule = Schedule::default();
        schedule.add_systems(
            (
                ability_decay_system,
                release_tractored_system,
                clear_tractor_forces_system,
                ability_field_system,
            )
                .chain(),
        );
        Fixture {
            world,
            schedule,
            hunter,
            prey,
        }
    }

    fn tick(f: &mut Fixture, secs: f32) {
        f.world
            .resource_mut::<Time>()
            .advance_by(Duration::from_secs_f32(secs));
        f.schedule.run(&mut f.world);
    }

    #[test]
    fn inactive_magnet_leaves_everyone_alone() {
        let mut f = fixture();
        tick(&mut f, 0.1);
        assert!(f.world.get::<Tractored>(f.hunter).is_none());
        assert!(f.world.get::<Autonomy>(f.prey).unwrap().enabled);
    }

    #[test]
    fn magnet_attracts_hunters_and_repels_prey_horizontally() {
        let mut f = fixture();
        f.world
            .resource_mut::<AbilityLedger>()
            .activate(Ability::Magnet);
        tick(&mut f, 0.1);
        tick(&mut f, 0.1);

        assert!(!f.world.get::<Autonomy>(f.hunter).unwrap().enabled);
        let damping = f.world.get::<Damping>(f.hunter).unwrap();
        assert_eq!(damping.linear_damping, 5.0);

        let force = f.world.get::<ExternalForce>(f.hunter).unwrap().force;
        assert_eq!(force.y, 0.0);
        assert!(force.x < 0.0);
        assert!((force.length() - 10.0).abs() < 1e-4, "force was {force:?}");

        let velocity = f.world.get::<Velocity>(f.prey).unwrap().linvel;
        assert_eq!(velocity.y, 0.0);
        assert!(velocity.z > 0.0);
    }

    #[test]
    fn expiring_magnet_applies_no_force_and_restores_entities() {
        let mut f = fixture();
        f.world
            .resource_mut::<AbilityLedger>()
            .activate(Ability::Magnet);
        tick(&mut f, 0.1);
        tick(&mut f, 0.1);

        let remaining = f.world.resource::<AbilityLedger>().remaining(Ability::Magnet);
        tick(&mut f, remaining + 0.1);

        assert!(f.world.get::<Tractored>(f.hunter).is_none());
        assert!(f.world.get::<Autonomy>(f.hunter).unwrap().enabled);
        assert_eq!(
            f.world.get::<ExternalForce>(f.hunter).unwrap().force,
            Vec3::ZERO
        );
        assert!(matches!(
            f.world.get::<RigidBody>(f.hunter),
            Some(RigidBody::KinematicPositionBased)
        ));
        assert!(f.world.get::<Damping>(f.hunter).is_none());
    }

    #[test]
    fn waiting_victims_can_still_be_grabbed() {
        let mut f = fixture();
        let zone = f
            .world
            .query_filtered::<Entity, With<CaptureZone>>()
            .single(&f.world)
            .unwrap();
        let hunter = f.hunter;
        f.world
            .resource_mut::<AbsorptionTasks>()
            .begin(zone, hunter);
        f.world
            .resource_mut::<AbilityLedger>()
            .activate(Ability::Magnet);
        tick(&mut f, 0.1);
        assert!(f.world.get::<Tractored>(f.hunter).is_some());
    }
}
