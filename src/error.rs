//! Simulation-specific error types.
//!
//! Systems propagate errors through these types rather than panicking,
//! enabling graceful degradation instead of hard crashes.
//!
//! ## Usage
//!
//! ```rust
//! use sinkhole::error::{SimError, SimResult};
//!
//! fn check_radius(value: f32) -> SimResult<()> {
//!     if value <= 0.0 {
//!         return Err(SimError::UnsafeConstant {
//!             name: "void_radius",
//!             value,
//!             safe_range: "(0.0, ∞)",
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use crate::ability::Ability;
use std::fmt;

/// Top-level error enum for the capture simulation.
#[derive(Debug)]
pub enum SimError {
    /// A configuration value is outside its safe operating range.
    UnsafeConstant {
        /// Name of the setting (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f32,
        /// Human-readable description of the safe range.
        safe_range: &'static str,
    },

    /// A TOML document (config or store) could not be parsed.
    Parse {
        /// Path of the offending file.
        path: String,
        /// Parser message.
        message: String,
    },

    /// Filesystem access failed.
    Io {
        path: String,
        source: std::io::Error,
    },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::UnsafeConstant {
                name,
                value,
                safe_range,
            } => write!(
                f,
                "setting '{}' = {} is outside safe range {}",
                name, value, safe_range
            ),
            SimError::Parse { path, message } => {
                write!(f, "failed to parse {}: {}", path, message)
            }
            SimError::Io { path, source } => write!(f, "i/o error on {}: {}", path, source),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience alias: a `Result` using `SimError` as the error type.
pub type SimResult<T> = Result<T, SimError>;

/// Expected, user-facing reasons an upgrade purchase is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeError {
    /// The wallet cannot cover the price of the next level.
    InsufficientFunds { price: u32, balance: u32 },
    /// The ability is already at its highest level; no price exists.
    MaxLevelReached { ability: Ability },
}

impl fmt::Display for UpgradeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpgradeError::InsufficientFunds { price, balance } => write!(
                f,
                "insufficient funds: upgrade costs {} coins, balance is {}",
                price, balance
            ),
            UpgradeError::MaxLevelReached { ability } => {
                write!(f, "{} is already at max level", ability.label())
            }
        }
    }
}

impl std::error::Error for UpgradeError {}

// ── Validation helpers ────────────────────────────────────────────────────────

/// Returns an error unless `value` is finite and strictly positive.
pub fn validate_positive(name: &'static str, value: f32) -> SimResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::UnsafeConstant {
            name,
            value,
            safe_range: "(0.0, ∞)",
        })
    }
}

/// Returns an error unless `value` lies in `(0.0, 1.0]`.
pub fn validate_unit_fraction(name: &'static str, value: f32) -> SimResult<()> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(SimError::UnsafeConstant {
            name,
            value,
            safe_range: "(0.0, 1.0]",
        })
    }
}

/// Returns an error unless `value` is finite and strictly greater than 1.
///
/// Growth factors and price multipliers at or below 1.0 break the strictly
/// increasing progressions built on them.
pub fn validate_growth(name: &'static str, value: f32) -> SimResult<()> {
    if value.is_finite() && value > 1.0 {
        Ok(())
    } else {
        Err(SimError::UnsafeConstant {
            name,
            value,
            safe_range: "(1.0, ∞)",
        })
    }
}
