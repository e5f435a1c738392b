//! Coin wallet: earned on capture, spent on ability upgrades.

use crate::config::SimConfig;
use crate::persistence::{KeyValueStore, Persistence};
use crate::zone::VictimConsumed;
use bevy::prelude::*;

/// Balance queries and spending, as seen by the upgrade ledger.
pub trait Currency {
    fn current_balance(&self) -> u32;
    /// Debit `amount` if affordable.  Returns `false` and leaves the balance
    /// untouched otherwise.
    fn try_spend(&mut self, amount: u32) -> bool;
}

/// The player's coin balance.
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wallet {
    pub coins: u32,
}

impl Wallet {
    pub const STORAGE_KEY: &'static str = "wallet.coins";

    pub fn load(store: &dyn KeyValueStore) -> Self {
        let coins = store.get_int(Self::STORAGE_KEY, 0).clamp(0, u32::MAX as i64) as u32;
        Self { coins }
    }

    pub fn persist(&self, store: &mut dyn KeyValueStore) {
        store.set_int(Self::STORAGE_KEY, self.coins as i64);
    }

    #[inline]
    pub fn credit(&mut self, amount: u32) {
        self.coins = self.coins.saturating_add(amount);
    }
}

impl Currency for Wallet {
    fn current_balance(&self) -> u32 {
        self.coins
    }

    fn try_spend(&mut self, amount: u32) -> bool {
        if self.coins < amount {
            return false;
        }
        self.coins -= amount;
        true
    }
}

/// Startup system: restore the balance from the persistence store.
pub fn load_wallet_system(mut wallet: ResMut<Wallet>, persistence: Option<Res<Persistence>>) {
    if let Some(persistence) = persistence {
        *wallet = Wallet::load(persistence.store());
    }
}

/// Credit coins for every swallowed victim, scaled by its power.
pub fn capture_coin_system(
    mut consumed: MessageReader<VictimConsumed>,
    config: Res<SimConfig>,
    mut wallet: ResMut<Wallet>,
) {
    for victim in consumed.read() {
        wallet.credit(config.coins_per_capture.saturating_mul(victim.power));
    }
}

/// Write the balance back whenever it changes.
pub fn persist_wallet_system(wallet: Res<Wallet>, persistence: Option<ResMut<Persistence>>) {
    if !wallet.is_changed() || wallet.is_added() {
        return;
    }
    if let Some(mut persistence) = persistence {
        wallet.persist(persistence.store_mut());
    }
}
