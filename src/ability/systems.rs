//! Ability notifications and the systems that drive the ledger each tick.
//!
//! ## Pipeline (runs in order inside `SimSet::Abilities`)
//!
//! 1. [`ability_decay_system`] — decrement timers, emit [`AbilityDeactivated`].
//! 2. [`ability_pickup_system`] — turn zone/pickup overlaps into [`ActivateAbility`].
//! 3. [`ability_activation_system`] — apply [`ActivateAbility`], emit [`AbilityActivated`].
//!
//! Decay runs first so an ability that expires this tick never contributes a
//! force, while an ability activated this tick is eligible for
//! `SimSet::Effects` in the same tick.

use super::kind::Ability;
use super::ledger::AbilityLedger;
use crate::economy::Wallet;
use crate::persistence::Persistence;
use crate::zone::CaptureZone;
use bevy::prelude::*;
use bevy_rapier3d::prelude::CollisionEvent;

// ── Messages ──────────────────────────────────────────────────────────────────

/// Request to start (or extend) an ability.
#[derive(Message, Debug, Clone, Copy)]
pub struct ActivateAbility {
    pub ability: Ability,
}

/// Fired on every activation with the resulting remaining duration.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct AbilityActivated {
    pub ability: Ability,
    pub total_duration: f32,
    /// `true` when an already-running timer was extended.
    pub extended: bool,
}

#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbilityDeactivated {
    pub ability: Ability,
}

/// Request to buy the next upgrade level of an ability.
#[derive(Message, Debug, Clone, Copy)]
pub struct UpgradeRequest {
    pub ability: Ability,
}

/// Fired after any upgrade level changes.
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct UpgradesChanged;

// ── Components ────────────────────────────────────────────────────────────────

/// Consumable that activates `0` when the capture zone overlaps it.
#[derive(Component, Debug, Clone, Copy)]
pub struct AbilityPickup(pub Ability);

// ── Startup ───────────────────────────────────────────────────────────────────

/// Rebuild the ledger from the final config and load persisted levels.
///
/// Runs after the config file has been applied.  Without a persistence
/// store, levels start at 0 and upgrades are not saved.
pub fn setup_ability_ledger(
    mut ledger: ResMut<AbilityLedger>,
    config: Res<crate::config::SimConfig>,
    persistence: Option<Res<Persistence>>,
) {
    *ledger = AbilityLedger::from_config(&config);
    match persistence {
        Some(persistence) => ledger.load_levels(persistence.store()),
        None => warn!("No persistence store; ability upgrades will not be saved"),
    }
}

// ── Systems ───────────────────────────────────────────────────────────────────

pub fn ability_decay_system(
    time: Res<Time>,
    mut ledger: ResMut<AbilityLedger>,
    mut deactivated: MessageWriter<AbilityDeactivated>,
) {
    if ledger.active().next().is_none() {
        return;
    }
    for ability in ledger.tick(time.delta_secs()) {
        debug!("{} expired", ability.label());
        deactivated.write(AbilityDeactivated { ability });
    }
}

/// Consume pickups touched by the capture zone's trigger volume.
pub fn ability_pickup_system(
    mut commands: Commands,
    mut collisions: MessageReader<CollisionEvent>,
    q_zone: Query<Entity, With<CaptureZone>>,
    q_pickups: Query<&AbilityPickup>,
    mut activate: MessageWriter<ActivateAbility>,
) {
    for event in collisions.read() {
        let CollisionEvent::Started(e1, e2, _) = *event else {
            continue;
        };
        let pickup_entity = if q_zone.contains(e1) && q_pickups.contains(e2) {
            e2
        } else if q_zone.contains(e2) && q_pickups.contains(e1) {
            e1
        } else {
            continue;
        };
        let Ok(pickup) = q_pickups.get(pickup_entity) else {
            continue;
        };
        activate.write(ActivateAbility { ability: pickup.0 });
        commands.entity(pickup_entity).despawn();
    }
}

pub fn ability_activation_system(
    mut requests: MessageReader<ActivateAbility>,
    mut ledger: ResMut<AbilityLedger>,
    mut activated: MessageWriter<AbilityActivated>,
) {
    for request in requests.read() {
        let activation = ledger.activate(request.ability);
        debug!(
            "{} active for {:.1}s (extended: {})",
            activation.ability.label(),
            activation.total_duration,
            activation.extended
        );
        activated.write(AbilityActivated {
            ability: activation.ability,
            total_duration: activation.total_duration,
            extended: activation.extended,
        });
    }
}

/// Resolve upgrade purchases against the wallet and persist new levels.
pub fn upgrade_request_system(
    mut requests: MessageReader<UpgradeRequest>,
    mut ledger: ResMut<AbilityLedger>,
    mut wallet: ResMut<Wallet>,
    mut persistence: Option<ResMut<Persistence>>,
    mut changed: MessageWriter<UpgradesChanged>,
) {
    for request in requests.read() {
        let store = persistence.as_mut().map(|p| p.store_mut());
        match ledger.try_upgrade(request.ability, &mut *wallet, store) {
            Ok(level) => {
                info!("Upgraded {} to level {}", request.ability.label(), level);
                changed.write(UpgradesChanged);
            }
            Err(err) => {
                info!("Upgrade of {} refused: {}", request.ability.label(), err);
            }
        }
    }
}
