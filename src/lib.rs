//! Sinkhole capture-and-progression engine
//!
//! A ground-level sinkhole swallows eligible entities through a phased
//! absorption sequence, converts them into XP and coins, grows on level-up,
//! and applies timed, upgradable abilities to nearby entities.

pub mod ability;
pub mod arena;
pub mod classification;
pub mod config;
pub mod constants;
pub mod economy;
pub mod error;
pub mod graphics;
pub mod persistence;
pub mod physics;
pub mod simulation;
pub mod tween;
pub mod zone;
