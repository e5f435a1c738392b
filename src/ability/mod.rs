//! Ability ledger: timed capture modifiers and their persisted upgrades.
//!
//! ## Sub-module layout
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`kind`] | `Ability` variants and the per-ability lookup table of base/step constants |
//! | [`ledger`] | `AbilityLedger` resource: active timers, upgrade levels, pricing |
//! | [`systems`] | Notifications, pickups, per-tick decay, upgrade requests |

pub mod kind;
pub mod ledger;
pub mod systems;

pub use kind::{Ability, AbilityParams, AbilityTable, LinearStat};
pub use ledger::{AbilityLedger, Activation, UpgradePricing};
pub use systems::{
    ability_activation_system, ability_decay_system, ability_pickup_system,
    setup_ability_ledger, upgrade_request_system, AbilityActivated, AbilityDeactivated,
    AbilityPickup, ActivateAbility, UpgradeRequest, UpgradesChanged,
};
