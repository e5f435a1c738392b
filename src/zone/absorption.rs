//! Absorption state machine: `Waiting → Converging → Finishing → (removed)`.
//!
//! Every victim that enters the zone's trigger volume gets one
//! [`AbsorptionTask`], stored in [`AbsorptionTasks`] and advanced once per tick
//! by [`absorption_system`].  The per-tick decision is the pure function
//! [`advance`]; the system only applies the returned [`TaskStep`] to the ECS.
//!
//! ## Phases
//!
//! | Phase | Leaves when | Side effects |
//! |-------|-------------|--------------|
//! | `Waiting` | planar distance `< radius × edge_tolerance` | none |
//! | `Converging` | height `< bottom + margin`, or timeout | pull + spin each tick |
//! | `Finishing` | shrink finished | scale toward zero, then reward + despawn |
//!
//! A victim whose entity no longer exists is dropped silently in any phase.
//! A `Waiting` victim that leaves the trigger volume is dropped too, so it can
//! brush the rim and walk away.

use super::state::{CaptureZone, ZoneGeometry};
use crate::classification::{Autonomy, Classification, Power};
use crate::config::SimConfig;
use crate::physics::{
    clamp_tick, finite_or_zero, CaptureBoundary, EnvironmentCollider, PassThrough, ZoneVolume,
};
use crate::zone::effects::Tractored;
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use rand::Rng;
use std::collections::HashMap;

// ── Task records ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AbsorptionPhase {
    Waiting,
    Converging,
    Finishing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AbsorptionTask {
    pub zone: Entity,
    pub victim: Entity,
    pub phase: AbsorptionPhase,
    /// Seconds spent in the current phase.
    pub elapsed: f32,
    /// Victim scale when `Finishing` began.
    pub finish_scale: Vec3,
}

impl AbsorptionTask {
    pub fn new(zone: Entity, victim: Entity) -> Self {
        Self {
            zone,
            victim,
            phase: AbsorptionPhase::Waiting,
            elapsed: 0.0,
            finish_scale: Vec3::ONE,
        }
    }

    fn enter(&mut self, phase: AbsorptionPhase) {
        self.phase = phase;
        self.elapsed = 0.0;
    }
}

/// Config-level thresholds shared by every task.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbsorptionTuning {
    pub edge_tolerance: f32,
    pub converge_timeout: f32,
    pub bottom_margin: f32,
    pub finish_duration: f32,
    pub max_tick: f32,
}

impl AbsorptionTuning {
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            edge_tolerance: config.edge_tolerance,
            converge_timeout: config.converge_timeout_secs,
            bottom_margin: config.bottom_margin,
            finish_duration: config.finish_duration_secs,
            max_tick: config.max_tick_secs,
        }
    }
}

/// What the system must do for a task this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TaskStep {
    /// Still waiting outside the commit threshold.
    Hold,
    /// One-time physics takeover.
    BeginConverging,
    /// Velocity changes to add this tick.
    Pull { linear: Vec3, angular: Vec3 },
    BeginFinishing,
    /// Fraction of the finishing scale to keep.
    Shrink { factor: f32 },
    /// Reward and despawn.
    Complete,
    /// The victim's position is unusable; drop the task without reward.
    Cancel,
}

/// Advance `task` by `dt` and decide this tick's step.
///
/// Phase timers use the raw `dt`; forces use `dt` clamped to
/// `tuning.max_tick` so a frame hitch cannot fling the victim.
pub fn advance(
    task: &mut AbsorptionTask,
    victim_position: Vec3,
    zone: &CaptureZone,
    geometry: &ZoneGeometry,
    tuning: &AbsorptionTuning,
    dt: f32,
) -> TaskStep {
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
    if !victim_position.is_finite() {
        return TaskStep::Cancel;
    }
    match task.phase {
        AbsorptionPhase::Waiting => {
            let threshold = geometry.capture_radius * tuning.edge_tolerance;
            if geometry.planar_distance(victim_position) < threshold {
                task.enter(AbsorptionPhase::Converging);
                TaskStep::BeginConverging
            } else {
                TaskStep::Hold
            }
        }
        AbsorptionPhase::Converging => {
            task.elapsed += dt;
            let crossed = victim_position.y < geometry.bottom_height() + tuning.bottom_margin;
            if crossed || task.elapsed >= tuning.converge_timeout {
                task.enter(AbsorptionPhase::Finishing);
                return TaskStep::BeginFinishing;
            }
            let step = clamp_tick(dt, tuning.max_tick);
            let toward = (geometry.sink_point() - victim_position).normalize_or_zero();
            TaskStep::Pull {
                linear: toward * zone.pull_force * step,
                angular: Vec3::Y * zone.spin_rate * step,
            }
        }
        AbsorptionPhase::Finishing => {
            task.elapsed += dt;
            if task.elapsed >= tuning.finish_duration {
                TaskStep::Complete
            } else {
                TaskStep::Shrink {
                    factor: 1.0 - task.elapsed / tuning.finish_duration,
                }
            }
        }
    }
}

// ── Resource ──────────────────────────────────────────────────────────────────

/// Every in-flight absorption, keyed by victim.
#[derive(Resource, Debug, Default)]
pub struct AbsorptionTasks {
    tasks: HashMap<Entity, AbsorptionTask>,
}

impl AbsorptionTasks {
    /// Start a `Waiting` task unless `victim` already has one.
    /// Returns `true` when a task was created.
    pub fn begin(&mut self, zone: Entity, victim: Entity) -> bool {
        if self.tasks.contains_key(&victim) {
            return false;
        }
        self.tasks.insert(victim, AbsorptionTask::new(zone, victim));
        true
    }

    pub fn get(&self, victim: Entity) -> Option<&AbsorptionTask> {
        self.tasks.get(&victim)
    }

    /// `true` once the victim has left `Waiting`.
    pub fn is_committed(&self, victim: Entity) -> bool {
        self.tasks
            .get(&victim)
            .is_some_and(|task| task.phase != AbsorptionPhase::Waiting)
    }

    /// Drop `victim`'s task if it is still `Waiting`.
    pub fn abandon_waiting(&mut self, victim: Entity) -> bool {
        if self
            .tasks
            .get(&victim)
            .is_some_and(|task| task.phase == AbsorptionPhase::Waiting)
        {
            self.tasks.remove(&victim);
            return true;
        }
        false
    }

    /// Drop every task.  Returns the victims that had already committed,
    /// since nothing else will ever finish them.
    pub fn clear(&mut self) -> Vec<Entity> {
        self.tasks
            .drain()
            .filter(|(_, task)| task.phase != AbsorptionPhase::Waiting)
            .map(|(victim, _)| victim)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

// ── Messages ──────────────────────────────────────────────────────────────────

/// A victim finished `Finishing` and was swallowed.
#[derive(Message, Debug, Clone)]
pub struct VictimConsumed {
    pub zone: Entity,
    pub victim: Entity,
    pub tags: Vec<String>,
    /// Victim power, or 1 when it has none.
    pub power: u32,
}

impl VictimConsumed {
    #[inline]
    pub fn xp(&self) -> u32 {
        self.power
    }
}

// ── Systems ───────────────────────────────────────────────────────────────────

/// Create tasks on trigger entry and drop uncommitted ones on exit.
pub fn capture_trigger_system(
    mut collisions: MessageReader<CollisionEvent>,
    q_zone: Query<&CaptureZone>,
    q_victims: Query<&Classification>,
    mut tasks: ResMut<AbsorptionTasks>,
) {
    for event in collisions.read() {
        let (e1, e2, started) = match *event {
            CollisionEvent::Started(e1, e2, _) => (e1, e2, true),
            CollisionEvent::Stopped(e1, e2, _) => (e1, e2, false),
        };
        let (zone_entity, zone, victim) = if let Ok(zone) = q_zone.get(e1) {
            (e1, zone, e2)
        } else if let Ok(zone) = q_zone.get(e2) {
            (e2, zone, e1)
        } else {
            continue;
        };
        let Ok(classification) = q_victims.get(victim) else {
            continue;
        };
        if !zone.is_target(classification) {
            continue;
        }
        if started {
            if tasks.begin(zone_entity, victim) {
                debug!("{victim} entered capture zone");
            }
        } else if tasks.abandon_waiting(victim) {
            debug!("{victim} left capture zone before committing");
        }
    }
}

type VictimQuery<'w, 's> = Query<
    'w,
    's,
    (
        &'static mut Transform,
        &'static Classification,
        Option<&'static Power>,
        Option<&'static mut Velocity>,
        Option<&'static mut Autonomy>,
    ),
    Without<CaptureZone>,
>;

type EnvironmentQuery<'w, 's> = Query<
    'w,
    's,
    (Entity, &'static Collider, &'static Transform),
    (
        With<EnvironmentCollider>,
        Without<ZoneVolume>,
        Without<CaptureBoundary>,
        Without<Classification>,
        Without<CaptureZone>,
    ),
>;

/// Advance every absorption task by one tick.
pub fn absorption_system(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<SimConfig>,
    mut tasks: ResMut<AbsorptionTasks>,
    q_zone: Query<(&CaptureZone, &Transform)>,
    mut q_victims: VictimQuery,
    q_environment: EnvironmentQuery,
    mut consumed: MessageWriter<VictimConsumed>,
) {
    if tasks.is_empty() {
        return;
    }
    let tuning = AbsorptionTuning::from_config(&config);
    let dt = time.delta_secs();
    let mut finished = Vec::new();

    for (&victim, task) in tasks.tasks.iter_mut() {
        let Ok((zone, zone_transform)) = q_zone.get(task.zone) else {
            finished.push(victim);
            continue;
        };
        let Ok((mut transform, classification, power, velocity, autonomy)) =
            q_victims.get_mut(victim)
        else {
            debug!("{victim} vanished during {:?}; task dropped", task.phase);
            finished.push(victim);
            continue;
        };
        let geometry = zone.geometry(zone_transform);

        match advance(task, transform.translation, zone, &geometry, &tuning, dt) {
            TaskStep::Hold => {}
            TaskStep::BeginConverging => {
                debug!("{victim} committed to absorption");
                if let Some(mut autonomy) = autonomy {
                    autonomy.enabled = false;
                }
                let ignored = nearby_environment(
                    transform.translation,
                    config.environment_scan_radius,
                    &q_environment,
                );
                take_over_victim(&mut commands, victim, ignored, config.tumble_impulse);
            }
            TaskStep::Pull { linear, angular } => {
                let linear = finite_or_zero(linear, "absorption pull");
                let angular = finite_or_zero(angular, "absorption spin");
                match velocity {
                    Some(mut velocity) => {
                        velocity.linvel += linear;
                        velocity.angvel += angular;
                    }
                    None => {
                        commands.entity(victim).insert(Velocity {
                            linvel: linear,
                            angvel: angular,
                        });
                    }
                }
            }
            TaskStep::BeginFinishing => {
                debug!("{victim} reached the bottom; shrinking");
                task.finish_scale = transform.scale;
            }
            TaskStep::Shrink { factor } => {
                transform.scale = task.finish_scale * factor.clamp(0.0, 1.0);
            }
            TaskStep::Complete => {
                consumed.write(VictimConsumed {
                    zone: task.zone,
                    victim,
                    tags: classification.tags().to_vec(),
                    power: power.map_or(1, |p| p.0),
                });
                commands.entity(victim).despawn();
                finished.push(victim);
            }
            TaskStep::Cancel => {
                warn!(
                    "{victim} has a non-finite position during {:?}; task dropped",
                    task.phase
                );
                if task.phase != AbsorptionPhase::Waiting {
                    commands.entity(victim).despawn();
                } else if let Some(mut autonomy) = autonomy {
                    autonomy.enabled = true;
                }
                finished.push(victim);
            }
        }
    }

    for victim in finished {
        tasks.tasks.remove(&victim);
    }
}

/// Static colliders within `radius` of `point` that a falling victim should
/// pass through.
fn nearby_environment(point: Vec3, radius: f32, q_environment: &EnvironmentQuery) -> Vec<Entity> {
    q_environment
        .iter()
        .filter(|(_, collider, transform)| {
            collider.distance_to_point(transform.translation, transform.rotation, point, true)
                <= radius
        })
        .map(|(entity, _, _)| entity)
        .collect()
}

/// Hand the victim to the physics engine for its fall.
fn take_over_victim(commands: &mut Commands, victim: Entity, ignored: Vec<Entity>, tumble: f32) {
    let mut rng = rand::thread_rng();
    let axis = Vec3::new(
        rng.gen_range(-1.0..=1.0),
        rng.gen_range(-1.0..=1.0),
        rng.gen_range(-1.0..=1.0),
    )
    .normalize_or_zero();
    let torque = finite_or_zero(axis * tumble, "absorption tumble");

    commands
        .entity(victim)
        .remove::<Tractored>()
        .insert((
            RigidBody::Dynamic,
            GravityScale(1.0),
            LockedAxes::empty(),
            Damping {
                linear_damping: 0.0,
                angular_damping: 0.0,
            },
            ExternalForce::default(),
            ExternalImpulse {
                impulse: Vec3::ZERO,
                torque_impulse: torque,
            },
            PassThrough { colliders: ignored },
            ActiveHooks::FILTER_CONTACT_PAIRS,
        ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::message::Messages;
    use bevy_rapier3d::rapier::geometry::CollisionEventFlags;
    use std::time::Duration;

    fn zone_at_origin() -> (CaptureZone, Transform) {
        (
            CaptureZone::from_config(&SimConfig::default()),
            Transform::default(),
        )
    }

    fn tuning() -> AbsorptionTuning {
        AbsorptionTuning::from_config(&SimConfig::default())
    }

    fn placeholder_entities() -> (Entity, Entity) {
        let mut world = World::new();
        (world.spawn_empty().id(), world.spawn_empty().id())
    }

    #[test]
    fn half_radius_commits_on_the_same_tick() {
        let (zone, zone_tf) = zone_at_origin();
        let (z, v) = placeholder_entities();
        let mut task = AbsorptionTask::new(z, v);
        let step = advance(
            &mut task,
            Vec3::new(0.5, 0.0, 0.0),
            &zone,
            &zone.geometry(&zone_tf),
            &tuning(),
            0.016,
        );
        assert_eq!(step, TaskStep::BeginConverging);
        assert_eq!(task.phase, AbsorptionPhase::Converging);
    }

    #[test]
    fn rim_contact_outside_tolerance_keeps_waiting() {
        let (zone, zone_tf) = zone_at_origin();
        let (z, v) = placeholder_entities();
        let mut task = AbsorptionTask::new(z, v);
        for _ in 0..10 {
            let step = advance(
                &mut task,
                Vec3::new(0.0, 3.0, 0.95),
                &zone,
                &zone.geometry(&zone_tf),
                &tuning(),
                0.1,
            );
            assert_eq!(step, TaskStep::Hold);
        }
        assert_eq!(task.phase, AbsorptionPhase::Waiting);
    }

    #[test]
    fn convergence_cap_forces_finishing() {
        let (zone, zone_tf) = zone_at_origin();
        let geometry = zone.geometry(&zone_tf);
        let (z, v) = placeholder_entities();
        let mut task = AbsorptionTask::new(z, v);
        task.enter(AbsorptionPhase::Converging);

        let mut steps = Vec::new();
        for _ in 0..6 {
            steps.push(advance(
                &mut task,
                Vec3::ZERO,
                &zone,
                &geometry,
                &tuning(),
                0.5,
            ));
        }
        assert!(steps[..5]
            .iter()
            .all(|s| matches!(s, TaskStep::Pull { .. })));
        assert_eq!(steps[5], TaskStep::BeginFinishing);
        assert_eq!(task.phase, AbsorptionPhase::Finishing);
    }

    #[test]
    fn crossing_the_bottom_finishes_early() {
        let (zone, zone_tf) = zone_at_origin();
        let geometry = zone.geometry(&zone_tf);
        let (z, v) = placeholder_entities();
        let mut task = AbsorptionTask::new(z, v);
        task.enter(AbsorptionPhase::Converging);
        let below = geometry.bottom_height() + tuning().bottom_margin - 0.01;
        let step = advance(
            &mut task,
            Vec3::new(0.0, below, 0.0),
            &zone,
            &geometry,
            &tuning(),
            0.016,
        );
        assert_eq!(step, TaskStep::BeginFinishing);
    }

    #[test]
    fn pull_is_clamped_against_frame_hitches() {
        let (zone, zone_tf) = zone_at_origin();
        let geometry = zone.geometry(&zone_tf);
        let (z, v) = placeholder_entities();
        let mut task = AbsorptionTask::new(z, v);
        task.enter(AbsorptionPhase::Converging);
        let TaskStep::Pull { linear, angular } = advance(
            &mut task,
            Vec3::new(0.0, 0.0, 0.0),
            &zone,
            &geometry,
            &tuning(),
            2.0,
        ) else {
            panic!("expected a pull");
        };
        let max = tuning().max_tick;
        assert!((linear.length() - zone.pull_force * max).abs() < 1e-4);
        assert!((angular.y - zone.spin_rate * max).abs() < 1e-4);
        assert!(linear.y < 0.0, "pull must point toward the sink point");
    }

    #[test]
    fn finishing_shrinks_then_completes() {
        let (zone, zone_tf) = zone_at_origin();
        let geometry = zone.geometry(&zone_tf);
        let (z, v) = placeholder_entities();
        let mut task = AbsorptionTask::new(z, v);
        task.enter(AbsorptionPhase::Finishing);
        let half = tuning().finish_duration / 2.0;
        let step = advance(&mut task, Vec3::ZERO, &zone, &geometry, &tuning(), half);
        assert!(matches!(step, TaskStep::Shrink { factor } if (factor - 0.5).abs() < 1e-4));
        let step = advance(&mut task, Vec3::ZERO, &zone, &geometry, &tuning(), half);
        assert_eq!(step, TaskStep::Complete);
    }

    #[test]
    fn one_task_per_victim() {
        let (z, v) = placeholder_entities();
        let mut tasks = AbsorptionTasks::default();
        assert!(tasks.begin(z, v));
        assert!(!tasks.begin(z, v));
        assert_eq!(tasks.len(), 1);
    }

    #[test]
    fn non_finite_position_cancels_in_any_phase() {
        let (zone, zt) = zone_at_origin();
        let geometry = zone.geometry(&zt);
        let (z, v) = placeholder_entities();
        for phase in [
            AbsorptionPhase::Waiting,
            AbsorptionPhase::Converging,
            AbsorptionPhase::Finishing,
        ] {
            let mut task = AbsorptionTask::new(z, v);
            task.phase = phase;
            let position = Vec3::new(f32::NAN, 0.0, 0.0);
            let step = advance(&mut task, position, &zone, &geometry, &tuning(), 0.1);
            assert_eq!(step, TaskStep::Cancel);
            assert_eq!(task.phase, phase);
        }
    }

    #[test]
    fn clear_reports_only_committed_victims() {
        let mut world = World::new();
        let zone = world.spawn_empty().id();
        let waiting = world.spawn_empty().id();
        let falling = world.spawn_empty().id();
        let mut tasks = AbsorptionTasks::default();
        tasks.begin(zone, waiting);
        tasks.begin(zone, falling);
        if let Some(task) = tasks.tasks.get_mut(&falling) {
            task.enter(AbsorptionPhase::Converging);
        }

        assert_eq!(tasks.clear(), vec![falling]);
        assert!(tasks.is_empty());
    }

    // ── System-level ──────────────────────────────────────────────────────────

    #[derive(Resource, Default)]
    struct Consumed(Vec<VictimConsumed>);

    fn record(mut reader: MessageReader<VictimConsumed>, mut seen: ResMut<Consumed>) {
        seen.0.extend(reader.read().cloned());
    }

    fn capture_world() -> (World, Schedule, Entity) {
        let mut world = World::new();
        world.insert_resource(Time::<()>::default());
        world.insert_resource(SimConfig::default());
        world.init_resource::<AbsorptionTasks>();
        world.init_resource::<Consumed>();
        world.init_resource::<Messages<CollisionEvent>>();
        world.init_resource::<Messages<VictimConsumed>>();
        let zone = world
            .spawn((
                CaptureZone::from_config(&SimConfig::default()),
                Transform::default(),
            ))
            .id();
        let mut schedule = Schedule::default();
        schedule.add_systems((capture_trigger_system, absorption_system, record).chain());
        (world, schedule, zone)
    }

    fn tick(world: &mut World, schedule: &mut Schedule, secs: f32) {
        world
            .resource_mut::<Time>()
            .advance_by(Duration::from_secs_f32(secs));
        schedule.run(world);
    }

    #[test]
    fn ineligible_victims_never_get_a_task() {
        let (mut world, mut schedule, zone) = capture_world();
        let rock = world
            .spawn((Classification::single("Scenery"), Transform::default()))
            .id();
        world.write_message(CollisionEvent::Started(
            zone,
            rock,
            CollisionEventFlags::SENSOR,
        ));
        tick(&mut world, &mut schedule, 0.016);
        assert!(world.resource::<AbsorptionTasks>().is_empty());
    }

    #[test]
    fn trigger_exit_drops_only_waiting_tasks() {
        let (mut world, mut schedule, zone) = capture_world();
        let far = world
            .spawn((
                Classification::single("Prey"),
                Transform::from_xyz(0.95, 0.0, 0.0),
            ))
            .id();
        let near = world
            .spawn((
                Classification::single("Prey"),
                Transform::from_xyz(0.2, 0.0, 0.0),
            ))
            .id();
        for victim in [far, near] {
            world.write_message(CollisionEvent::Started(
                zone,
                victim,
                CollisionEventFlags::SENSOR,
            ));
        }
        tick(&mut world, &mut schedule, 0.016);
        assert!(world.resource::<AbsorptionTasks>().is_committed(near));

        for victim in [far, near] {
            world.write_message(CollisionEvent::Stopped(
                victim,
                zone,
                CollisionEventFlags::SENSOR,
            ));
        }
        tick(&mut world, &mut schedule, 0.016);
        let tasks = world.resource::<AbsorptionTasks>();
        assert!(tasks.get(far).is_none());
        assert!(tasks.get(near).is_some());
    }

    #[test]
    fn committed_victim_is_taken_over_and_consumed() {
        let (mut world, mut schedule, zone) = capture_world();
        let victim = world
            .spawn((
                Classification::single("Predator"),
                Power(3),
                Autonomy::default(),
                Transform::from_xyz(0.5, 0.0, 0.0),
            ))
            .id();
        world.write_message(CollisionEvent::Started(
            victim,
            zone,
            CollisionEventFlags::SENSOR,
        ));
        tick(&mut world, &mut schedule, 0.016);

        assert!(!world.get::<Autonomy>(victim).unwrap().enabled);
        assert!(matches!(
            world.get::<RigidBody>(victim),
            Some(RigidBody::Dynamic)
        ));
        assert!(world.get::<PassThrough>(victim).is_some());

        // The victim never falls on its own here, so the timeout carries it
        // into Finishing.
        for _ in 0..40 {
            tick(&mut world, &mut schedule, 0.1);
        }

        assert!(world.get_entity(victim).is_err());
        assert!(world.resource::<AbsorptionTasks>().is_empty());
        let consumed = &world.resource::<Consumed>().0;
        assert_eq!(consumed.len(), 1);
        assert_eq!(consumed[0].xp(), 3);
        assert_eq!(consumed[0].tags, vec!["Predator".to_string()]);
    }

    #[test]
    fn despawned_victim_cancels_without_reward() {
        let (mut world, mut schedule, zone) = capture_world();
        let victim = world
            .spawn((
                Classification::single("Prey"),
                Transform::from_xyz(0.2, 0.0, 0.0),
            ))
            .id();
        world.write_message(CollisionEvent::Started(
            zone,
            victim,
            CollisionEventFlags::SENSOR,
        ));
        tick(&mut world, &mut schedule, 0.016);
        tick(&mut world, &mut schedule, 0.016);
        world.despawn(victim);
        tick(&mut world, &mut schedule, 0.016);

        assert!(world.resource::<AbsorptionTasks>().is_empty());
        assert!(world.resource::<Consumed>().0.is_empty());
    }

    #[test]
    fn non_finite_waiting_victim_is_released() {
        let (mut world, mut schedule, zone) = capture_world();
        let victim = world
            .spawn((
                Classification::single("Prey"),
                Autonomy::default(),
                Transform::from_xyz(f32::NAN, 0.0, 0.0),
            ))
            .id();
        world.write_message(CollisionEvent::Started(
            zone,
            victim,
            CollisionEventFlags::SENSOR,
        ));
        tick(&mut world, &mut schedule, 0.016);

        assert!(world.resource::<AbsorptionTasks>().is_empty());
        assert!(world.get_entity(victim).is_ok());
        assert!(world.get::<Autonomy>(victim).unwrap().enabled);
        assert!(world.resource::<Consumed>().0.is_empty());
    }
}
