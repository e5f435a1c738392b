//! Victim-side components: classification tags, power, and the autonomous
//! controller switch.
//!
//! Locomotion, navigation and animation live outside the engine.  They read
//! [`Autonomy::enabled`] and stand down when the capture zone or an ability
//! field takes the entity over.

use bevy::prelude::*;

/// Capability labels used for capture eligibility and ability targeting.
#[derive(Component, Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    tags: Vec<String>,
}

impl Classification {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    pub fn single(tag: impl Into<String>) -> Self {
        Self {
            tags: vec![tag.into()],
        }
    }

    #[inline]
    pub fn has(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// `true` when any of `wanted` is one of this entity's tags.
    pub fn has_any(&self, wanted: &[String]) -> bool {
        wanted.iter().any(|w| self.has(w))
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }
}

/// Reward weight of a victim.  Victims without it are worth 1.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Power(pub u32);

/// On/off switch for a victim's locomotion, AI and animation controllers.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Autonomy {
    pub enabled: bool,
}

impl Default for Autonomy {
    fn default() -> Self {
        Self { enabled: true }
    }
}
