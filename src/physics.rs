//! Rapier glue: finite-value guards, collider markers, and the contact filter
//! that lets falling victims pass through the ground.
//!
//! ## Pass-through
//!
//! When a victim starts to fall, the absorption system records every nearby
//! static collider in the victim's [`PassThrough`] component and enables
//! `ActiveHooks::FILTER_CONTACT_PAIRS` on it.  [`PassThroughHooks`] is the
//! `BevyPhysicsHooks` implementation installed with
//! `RapierPhysicsPlugin::<PassThroughHooks>`; it drops any contact pair that
//! one side has listed.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use bevy_rapier3d::rapier::geometry::SolverFlags;

// ── Markers ───────────────────────────────────────────────────────────────────

/// Static scenery a falling victim may be allowed to pass through.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct EnvironmentCollider;

/// Arena perimeter.  Never suppressed, so victims cannot fall out of the world
/// sideways.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct CaptureBoundary;

/// Colliders owned by the capture zone itself.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct ZoneVolume;

/// Colliders this entity no longer generates contacts with.
#[derive(Component, Debug, Clone, Default)]
pub struct PassThrough {
    pub colliders: Vec<Entity>,
}

impl PassThrough {
    #[inline]
    pub fn ignores(&self, other: Entity) -> bool {
        self.colliders.contains(&other)
    }
}

/// Whether a contact between `a` and `b` is suppressed by either side.
pub fn contact_suppressed(
    a: Entity,
    a_pass: Option<&PassThrough>,
    b: Entity,
    b_pass: Option<&PassThrough>,
) -> bool {
    a_pass.is_some_and(|p| p.ignores(b)) || b_pass.is_some_and(|p| p.ignores(a))
}

#[derive(SystemParam)]
pub struct PassThroughHooks<'w, 's> {
    pass_through: Query<'w, 's, &'static PassThrough>,
}

impl BevyPhysicsHooks for PassThroughHooks<'_, '_> {
    fn filter_contact_pair(&self, context: PairFilterContextView) -> Option<SolverFlags> {
        let a = context.collider1();
        let b = context.collider2();
        if contact_suppressed(
            a,
            self.pass_through.get(a).ok(),
            b,
            self.pass_through.get(b).ok(),
        ) {
            None
        } else {
            Some(SolverFlags::COMPUTE_IMPULSES)
        }
    }
}

// ── Numeric guards ────────────────────────────────────────────────────────────

/// Return `v` unchanged when every component is finite, otherwise log and
/// return `Vec3::ZERO`.  Every vector written into Rapier goes through here.
#[inline]
pub fn finite_or_zero(v: Vec3, context: &'static str) -> Vec3 {
    if v.is_finite() {
        v
    } else {
        warn!("Discarded non-finite motion {v:?} in {context}");
        Vec3::ZERO
    }
}

/// Clamp a frame delta into `[0, max]`; non-finite input becomes 0.
#[inline]
pub fn clamp_tick(dt: f32, max: f32) -> f32 {
    if dt.is_finite() {
        dt.clamp(0.0, max.max(0.0))
    } else {
        0.0
    }
}

/// Unit vector from `from` toward `to` on the horizontal plane.
#[inline]
pub fn horizontal_direction(from: Vec3, to: Vec3) -> Vec3 {
    Vec3::new(to.x - from.x, 0.0, to.z - from.z).normalize_or_zero()
}

/// Distance between two points ignoring height.
#[inline]
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    Vec2::new(a.x - b.x, a.z - b.z).length()
}
