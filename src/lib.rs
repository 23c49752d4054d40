//! Bug Squash - a timed "squash the bug, avoid the code block" arcade round
//!
//! Core modules:
//! - `sim`: Deterministic round logic (entity field, timers, round controller)
//! - `leaderboard`: Ranked board reduction and fetch/submit state
//! - `remote`: Remote leaderboard store (HTTP) and the round-end pipeline
//! - `identity`: Persisted display name
//! - `settings`: User preferences
//! - `config`: Deployment configuration for the remote store
//! - `platform`: Browser/native storage and clock

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod config;
pub mod identity;
pub mod leaderboard;
pub mod platform;
pub mod remote;
pub mod settings;
pub mod sim;

pub use identity::PlayerIdentity;
pub use leaderboard::{BoardState, LeaderboardEntry};
pub use settings::Settings;
pub use sim::{EntityKind, RoundConfig, RoundController, RoundEvent, RoundPhase};

/// Game configuration constants
pub mod consts {
    /// Arena dimensions (pixels)
    pub const ARENA_WIDTH: f32 = 900.0;
    pub const ARENA_HEIGHT: f32 = 500.0;

    /// Entity edge lengths (pixels)
    pub const BUG_SIZE: f32 = 40.0;
    pub const DECOY_SIZE: f32 = 60.0;

    /// Entities per round
    pub const BUG_COUNT: usize = 5;
    pub const DECOY_COUNT: usize = 3;

    /// Round length in seconds
    pub const ROUND_DURATION_SECS: u32 = 20;

    /// Timer periods (milliseconds)
    pub const COUNTDOWN_PERIOD_MS: u32 = 1000;
    pub const BUG_REPOSITION_MS: u32 = 1000;
    pub const DECOY_REPOSITION_MS: u32 = 300;

    /// Per-entity double-hit lock, matches the squash animation length
    pub const HIT_COOLDOWN_MS: u32 = 180;

    /// Fixed timer step (all periods above are multiples of it)
    pub const STEP_MS: u32 = 10;
    /// Maximum steps per frame to prevent spiral of death
    pub const MAX_STEPS_PER_FRAME: u32 = 12;

    /// Longest accepted display name (characters)
    pub const MAX_NAME_LEN: usize = 32;

    /// Rows shown on the board (podium + table)
    pub const BOARD_ROWS: usize = 10;
}
