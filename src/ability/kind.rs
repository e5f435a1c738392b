//! Ability variants and their level-derived parameters.
//!
//! Every derived value is linear in the persisted upgrade level `L`:
//!
//! | Ability | duration(L) | radius(L) | force(L) |
//! |---------|-------------|-----------|----------|
//! | Magnet  | constant    | `base + L × step` | `base + L × step` |
//! | Speed   | constant    | —         | multiplier `base + L × step` |
//! | Shield  | `base + L × step` | —   | —        |

/// Timed, upgradeable capture modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Ability {
    Magnet,
    Speed,
    Shield,
}

impl Ability {
    pub const COUNT: usize = 3;
    pub const ALL: [Ability; Ability::COUNT] = [Ability::Magnet, Ability::Speed, Ability::Shield];

    /// Dense index used by the ledger's per-ability arrays.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Ability::Magnet => 0,
            Ability::Speed => 1,
            Ability::Shield => 2,
        }
    }

    #[inline]
    pub fn label(self) -> &'static str {
        match self {
            Ability::Magnet => "Magnet",
            Ability::Speed => "Speed",
            Ability::Shield => "Shield",
        }
    }

    /// Persistence key holding this ability's upgrade level.
    pub fn storage_key(self) -> &'static str {
        match self {
            Ability::Magnet => "ability.magnet.level",
            Ability::Speed => "ability.speed.level",
            Ability::Shield => "ability.shield.level",
        }
    }
}

/// `base + level × step`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearStat {
    pub base: f32,
    pub step: f32,
}

impl LinearStat {
    #[inline]
    pub const fn new(base: f32, step: f32) -> Self {
        Self { base, step }
    }

    /// A stat that ignores the upgrade level.
    #[inline]
    pub const fn constant(base: f32) -> Self {
        Self { base, step: 0.0 }
    }

    #[inline]
    pub fn at(&self, level: u32) -> f32 {
        self.base + level as f32 * self.step
    }
}

/// Base and per-level constants for one ability.  `None` marks a parameter
/// the ability does not have.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbilityParams {
    pub duration: LinearStat,
    pub radius: Option<LinearStat>,
    /// Field strength for Magnet; movement multiplier for Speed.
    pub force: Option<LinearStat>,
}

/// Per-ability lookup table, built once from [`crate::config::SimConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbilityTable {
    pub magnet: AbilityParams,
    pub speed: AbilityParams,
    pub shield: AbilityParams,
}

impl Default for AbilityTable {
    fn default() -> Self {
        crate::config::SimConfig::default().ability_table()
    }
}

impl AbilityTable {
    #[inline]
    pub fn params(&self, ability: Ability) -> &AbilityParams {
        match ability {
            Ability::Magnet => &self.magnet,
            Ability::Speed => &self.speed,
            Ability::Shield => &self.shield,
        }
    }

    #[inline]
    pub fn duration(&self, ability: Ability, level: u32) -> f32 {
        self.params(ability).duration.at(level)
    }

    #[inline]
    pub fn radius(&self, ability: Ability, level: u32) -> Option<f32> {
        self.params(ability).radius.map(|stat| stat.at(level))
    }

    #[inline]
    pub fn force(&self, ability: Ability, level: u32) -> Option<f32> {
        self.params(ability).force.map(|stat| stat.at(level))
    }
}
