//! Capture zone components and derived geometry.
//!
//! `Transform::scale.x` is the single source of truth for zone size.  Every
//! radius (trigger test, mask, ability queries) is derived from it on demand,
//! so they all follow the growth tween in lock-step.

use crate::classification::Classification;
use crate::config::SimConfig;
use bevy::prelude::*;

// ── Components ─────────────────────────────────────────────────────────────────

/// Tunables of the sinkhole itself.  Size comes from the entity's `Transform`.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct CaptureZone {
    /// Capture radius at scale 1.
    pub void_radius: f32,
    /// How far below the zone centre the sink point sits.
    pub sink_depth: f32,
    /// Acceleration toward the sink point while converging.
    pub pull_force: f32,
    /// Angular acceleration about the up axis while converging.
    pub spin_rate: f32,
    pub target_classification: Vec<String>,
}

impl CaptureZone {
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            void_radius: config.void_radius,
            sink_depth: config.sink_depth,
            pull_force: config.pull_force,
            spin_rate: config.spin_rate,
            target_classification: config.target_classification.clone(),
        }
    }

    /// `void_radius × scale_x`.
    #[inline]
    pub fn effective_radius(&self, scale_x: f32) -> f32 {
        self.void_radius * scale_x
    }

    /// Whether the zone may swallow an entity with `classification`.
    pub fn is_target(&self, classification: &Classification) -> bool {
        classification.has_any(&self.target_classification)
    }

    pub fn geometry(&self, transform: &Transform) -> ZoneGeometry {
        ZoneGeometry {
            center: transform.translation,
            capture_radius: self.effective_radius(transform.scale.x),
            sink_depth: self.sink_depth,
        }
    }
}

/// Radius fed to the visual mask.  Mirrors the effective capture radius
/// every tick.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct MaskRadius(pub f32);

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Snapshot of the zone's shape for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneGeometry {
    pub center: Vec3,
    pub capture_radius: f32,
    pub sink_depth: f32,
}

impl ZoneGeometry {
    /// Distance from the zone centre ignoring height.
    #[inline]
    pub fn planar_distance(&self, point: Vec3) -> f32 {
        crate::physics::planar_distance(self.center, point)
    }

    /// Point victims are pulled toward while converging.
    #[inline]
    pub fn sink_point(&self) -> Vec3 {
        self.center - Vec3::Y * self.sink_depth
    }

    /// Height of the zone bottom.
    #[inline]
    pub fn bottom_height(&self) -> f32 {
        self.center.y - self.sink_depth
    }
}

// ── Systems ───────────────────────────────────────────────────────────────────

/// Keep the mask radius equal to the effective capture radius.
pub fn sync_capture_radius_system(
    mut q_zone: Query<(&CaptureZone, &Transform, &mut MaskRadius)>,
) {
    for (zone, transform, mut mask) in q_zone.iter_mut() {
        let radius = zone.effective_radius(transform.scale.x);
        if mask.0 != radius {
            mask.0 = radius;
        }
    }
}
