//! Deterministic round module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering, network or platform dependencies

pub mod field;
pub mod round;
pub mod state;
pub mod timers;

pub use field::{Arena, Entity, EntityField, EntityKind};
pub use round::{
    HitOutcome, IgnoreReason, RoundConfig, RoundController, RoundError, RoundEvent, StartOutcome,
};
pub use state::{HitLockPolicy, RoundPhase, RoundResult, RoundState, SoundEffect};
pub use timers::{HitCooldowns, Interval, RoundTimers, TimerEvent};
