//! Active ability timers, persisted upgrade levels and upgrade pricing.

use super::kind::{Ability, AbilityTable};
use crate::config::SimConfig;
use crate::economy::Currency;
use crate::error::UpgradeError;
use crate::persistence::KeyValueStore;
use bevy::prelude::*;

/// Geometric upgrade pricing: `round(base_price × multiplier^level)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpgradePricing {
    pub base_price: u32,
    pub multiplier: f32,
    /// Highest reachable level (inclusive).
    pub max_level: u32,
}

impl UpgradePricing {
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            base_price: config.upgrade_base_price,
            multiplier: config.upgrade_price_multiplier,
            max_level: config.upgrade_max_level,
        }
    }

    /// Price of buying the level after `level`.
    /// Returns `None` when `level` is already the maximum.
    pub fn price(&self, level: u32) -> Option<u32> {
        if level >= self.max_level {
            return None;
        }
        let raw = self.base_price as f64 * (self.multiplier as f64).powi(level as i32);
        Some(raw.round().min(u32::MAX as f64) as u32)
    }
}

/// Outcome of [`AbilityLedger::activate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Activation {
    pub ability: Ability,
    /// Remaining duration after this activation.
    pub total_duration: f32,
    /// `true` when the ability was already running and got extended.
    pub extended: bool,
}

/// Timers and upgrade levels for every ability.
///
/// Upgrade levels are loaded once from the persistence store and written back
/// on every successful upgrade.  Timers are transient and cleared between
/// levels by [`AbilityLedger::reset_active_effects`].
#[derive(Resource, Debug, Clone)]
pub struct AbilityLedger {
    table: AbilityTable,
    pricing: UpgradePricing,
    levels: [u32; Ability::COUNT],
    remaining: [Option<f32>; Ability::COUNT],
}

impl FromWorld for AbilityLedger {
    fn from_world(world: &mut World) -> Self {
        match world.get_resource::<SimConfig>() {
            Some(config) => Self::from_config(config),
            None => Self::from_config(&SimConfig::default()),
        }
    }
}

impl AbilityLedger {
    pub fn new(table: AbilityTable, pricing: UpgradePricing) -> Self {
        Self {
            table,
            pricing,
            levels: [0; Ability::COUNT],
            remaining: [None; Ability::COUNT],
        }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(config.ability_table(), UpgradePricing::from_config(config))
    }

    /// Read every ability's level from `store`, clamped into `0..=max_level`.
    pub fn load_levels(&mut self, store: &dyn KeyValueStore) {
        for ability in Ability::ALL {
            let stored = store.get_int(ability.storage_key(), 0);
            self.levels[ability.index()] = stored.clamp(0, self.pricing.max_level as i64) as u32;
        }
    }

    // ── Derived values ────────────────────────────────────────────────────────

    #[inline]
    pub fn level(&self, ability: Ability) -> u32 {
        self.levels[ability.index()]
    }

    #[inline]
    pub fn duration(&self, ability: Ability) -> f32 {
        self.table.duration(ability, self.level(ability))
    }

    #[inline]
    pub fn radius(&self, ability: Ability) -> Option<f32> {
        self.table.radius(ability, self.level(ability))
    }

    #[inline]
    pub fn force(&self, ability: Ability) -> Option<f32> {
        self.table.force(ability, self.level(ability))
    }

    /// Price of the next upgrade; `None` at max level.
    #[inline]
    pub fn price(&self, ability: Ability) -> Option<u32> {
        self.pricing.price(self.level(ability))
    }

    #[inline]
    pub fn is_maxed(&self, ability: Ability) -> bool {
        self.level(ability) >= self.pricing.max_level
    }

    /// Zone movement multiplier: the Speed multiplier while Speed is active,
    /// otherwise 1.
    pub fn speed_multiplier(&self) -> f32 {
        if self.is_active(Ability::Speed) {
            self.force(Ability::Speed).unwrap_or(1.0)
        } else {
            1.0
        }
    }

    // ── Timers ────────────────────────────────────────────────────────────────

    /// Start `ability`, or extend it by a fresh `duration()` if it is already
    /// running.  Repeated activations stack additively.
    pub fn activate(&mut self, ability: Ability) -> Activation {
        let added = self.duration(ability);
        let slot = &mut self.remaining[ability.index()];
        let (total, extended) = match *slot {
            Some(current) => (current + added, true),
            None => (added, false),
        };
        *slot = Some(total);
        Activation {
            ability,
            total_duration: total,
            extended,
        }
    }

    /// Subtract `dt` from every running timer and return the abilities that
    /// expired on this tick.
    ///
    /// All timers are decremented before any is removed, so the result does
    /// not depend on iteration order.
    pub fn tick(&mut self, dt: f32) -> Vec<Ability> {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let mut expired = Vec::new();
        for ability in Ability::ALL {
            let slot = &mut self.remaining[ability.index()];
            if let Some(remaining) = slot.as_mut() {
                *remaining -= dt;
                if *remaining <= 0.0 {
                    *slot = None;
                    expired.push(ability);
                }
            }
        }
        expired
    }

    #[inline]
    pub fn is_active(&self, ability: Ability) -> bool {
        self.remaining[ability.index()].is_some()
    }

    /// Seconds left on `ability`; `0.0` when inactive.
    #[inline]
    pub fn remaining(&self, ability: Ability) -> f32 {
        self.remaining[ability.index()].unwrap_or(0.0)
    }

    /// Abilities currently running, with their remaining time.
    pub fn active(&self) -> impl Iterator<Item = (Ability, f32)> + '_ {
        Ability::ALL
            .into_iter()
            .filter_map(|ability| self.remaining[ability.index()].map(|r| (ability, r)))
    }

    /// Clear every running timer.  Upgrade levels are untouched.
    pub fn reset_active_effects(&mut self) {
        self.remaining = [None; Ability::COUNT];
    }

    // ── Upgrades ──────────────────────────────────────────────────────────────

    /// Buy the next level of `ability`.
    ///
    /// On success the wallet is debited, the level incremented and persisted
    /// (when a store is supplied), and the new level returned.
    pub fn try_upgrade(
        &mut self,
        ability: Ability,
        wallet: &mut impl Currency,
        store: Option<&mut dyn KeyValueStore>,
    ) -> Result<u32, UpgradeError> {
        let price = self
            .price(ability)
            .ok_or(UpgradeError::MaxLevelReached { ability })?;
        if !wallet.try_spend(price) {
            return Err(UpgradeError::InsufficientFunds {
                price,
                balance: wallet.current_balance(),
            });
        }
        let level = &mut self.levels[ability.index()];
        *level += 1;
        let new_level = *level;
        if let Some(store) = store {
            store.set_int(ability.storage_key(), new_level as i64);
        }
        Ok(new_level)
    }

    /// Explicitly drop every ability back to level 0.  This is the only
    /// operation allowed to lower an upgrade level.
    pub fn reset_upgrades(&mut self, store: Option<&mut dyn KeyValueStore>) {
        self.levels = [0; Ability::COUNT];
        if let Some(store) = store {
            for ability in Ability::ALL {
                store.set_int(ability.storage_key(), 0);
            }
        }
    }
}
