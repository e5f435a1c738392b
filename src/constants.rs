//! Centralised absorption, progression and ability constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place without source-diving across multiple modules.
//! [`crate::config::SimConfig::default`] mirrors every value below; override
//! any subset at runtime through `assets/sim.toml`.
//!
//! ## Tuning guidance
//!
//! Each constant notes the observable consequence of changing it.  Distances
//! are world units (metres at Rapier's default scale), times are seconds.

// ── Capture Zone ──────────────────────────────────────────────────────────────

/// Capture radius of the zone at `scale.x == 1.0`.
///
/// Every radius the gameplay reads (trigger test, mask, ability query) is this
/// value multiplied by the zone's current animated scale.
pub const VOID_RADIUS: f32 = 1.0;

/// Depth below the zone surface that converging victims are pulled toward.
pub const SINK_DEPTH: f32 = 2.0;

/// Acceleration (u/s²) pulling a converging victim toward the sink point.
///
/// Higher values drag victims down faster; above ~120 victims visibly snap
/// rather than fall.
pub const PULL_FORCE: f32 = 40.0;

/// Angular acceleration (rad/s²) around the up axis while converging.
pub const SPIN_RATE: f32 = 6.0;

/// Fraction of the capture radius a victim must be inside before it commits.
///
/// 0.9 means "most of the way in": victims brushing the rim are not dropped.
pub const EDGE_TOLERANCE: f32 = 0.9;

/// Hard cap on the converging phase.  Victims that never fall past the bottom
/// threshold are forced into the finishing phase after this long.
pub const CONVERGE_TIMEOUT_SECS: f32 = 3.0;

/// Height above the sink point at which a falling victim counts as swallowed.
pub const BOTTOM_MARGIN: f32 = 0.5;

/// Duration of the shrink-to-nothing transition before the victim is removed.
pub const FINISH_DURATION_SECS: f32 = 0.1;

/// Radius around a victim scanned for static colliders to pass through.
pub const ENVIRONMENT_SCAN_RADIUS: f32 = 10.0;

/// Maximum magnitude (per axis) of the random angular impulse given to a victim
/// when it starts to fall.
pub const TUMBLE_IMPULSE: f32 = 0.6;

// ── Leveling ──────────────────────────────────────────────────────────────────

/// XP required to go from level 1 to level 2.
pub const INITIAL_XP_TO_NEXT_LEVEL: u32 = 5;

/// Multiplier applied to the XP requirement on every level-up (floored).
pub const XP_REQUIREMENT_GROWTH: f32 = 1.5;

/// Scale multiplier applied to the zone on every level-up.
pub const GROWTH_FACTOR: f32 = 1.2;

/// Duration of the overshoot-then-settle growth animation.
pub const GROWTH_TWEEN_SECS: f32 = 0.5;

// ── Abilities: Magnet ─────────────────────────────────────────────────────────

/// Magnet duration.  Constant: upgrades improve reach and strength, not time.
pub const MAGNET_DURATION: f32 = 8.0;
pub const MAGNET_BASE_RADIUS: f32 = 3.0;
pub const MAGNET_RADIUS_STEP: f32 = 0.5;
pub const MAGNET_BASE_FORCE: f32 = 10.0;
pub const MAGNET_FORCE_STEP: f32 = 2.0;

// ── Abilities: Speed ──────────────────────────────────────────────────────────

pub const SPEED_DURATION: f32 = 6.0;
pub const SPEED_BASE_MULTIPLIER: f32 = 1.5;
pub const SPEED_BONUS_STEP: f32 = 0.1;

// ── Abilities: Shield ─────────────────────────────────────────────────────────

pub const SHIELD_BASE_DURATION: f32 = 5.0;
pub const SHIELD_DURATION_STEP: f32 = 1.0;

// ── Upgrades ──────────────────────────────────────────────────────────────────

/// Coin price of the first upgrade of any ability.
pub const UPGRADE_BASE_PRICE: u32 = 100;

/// Geometric price growth per upgrade level.
pub const UPGRADE_PRICE_MULTIPLIER: f32 = 1.5;

/// Highest reachable upgrade level (inclusive).  No price exists at this level.
pub const UPGRADE_MAX_LEVEL: u32 = 10;

/// Coins credited per unit of victim power on capture.
pub const COINS_PER_CAPTURE: u32 = 1;

// ── Ability Effects ───────────────────────────────────────────────────────────

/// Linear damping forced onto entities caught by an attraction/repulsion field.
///
/// High damping stops pursued entities from orbiting the zone: the pull force
/// reaches a terminal speed of `force / damping` instead of overshooting.
pub const TRACTOR_LINEAR_DAMPING: f32 = 5.0;
pub const TRACTOR_ANGULAR_DAMPING: f32 = 5.0;

/// Classification pulled toward the zone by the magnet.
pub const HUNTER_TAG: &str = "Predator";

/// Classification pushed away from the zone by the magnet.
pub const PREY_TAG: &str = "Prey";

// ── Zone Movement / Arena ─────────────────────────────────────────────────────

/// Horizontal zone speed (u/s) before the Speed ability multiplier.
pub const ZONE_MOVE_SPEED: f32 = 5.0;

/// Half-width of the square arena the zone centre is clamped to.
pub const ARENA_HALF_EXTENT: f32 = 25.0;

// ── Simulation ────────────────────────────────────────────────────────────────

/// Largest tick duration fed into force integration.  Longer frames are
/// clamped so a hitch cannot inject a burst of energy into falling victims.
pub const MAX_TICK_SECS: f32 = 0.1;
