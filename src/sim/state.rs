//! Round state and transitions
//!
//! The phase is an explicit enum; score, penalties and the countdown only
//! change through the transition methods below.

use serde::{Deserialize, Serialize};

use crate::identity::PlayerIdentity;

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Before the first round, or after an abort
    #[default]
    Idle,
    /// Countdown active, hits count
    Running,
    /// Countdown reached zero; frozen until the next start
    Ended,
}

/// Which entities get a double-hit lock after being hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HitLockPolicy {
    /// Every hit counts
    Off,
    /// Only bugs are locked (decoys may be hit repeatedly)
    BugsOnly,
    /// Both kinds are locked
    #[default]
    AllEntities,
}

impl HitLockPolicy {
    pub fn locks(&self, kind: super::EntityKind) -> bool {
        match self {
            HitLockPolicy::Off => false,
            HitLockPolicy::BugsOnly => kind == super::EntityKind::Bug,
            HitLockPolicy::AllEntities => true,
        }
    }
}

/// Sound cues the round asks the shell to play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Bug squashed
    Squash,
    /// Code block hit
    Regression,
    /// Countdown reached zero
    RoundOver,
}

/// Score card for a finished round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    pub player: PlayerIdentity,
    pub score: u32,
    pub penalties: u32,
}

/// Counters for the current (or last) round
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoundState {
    pub phase: RoundPhase,
    pub score: u32,
    pub penalties: u32,
    pub seconds_remaining: u32,
    /// Identity captured at start; the round is attributed to it
    pub player: Option<PlayerIdentity>,
}

impl RoundState {
    /// Idle state showing a full clock
    pub fn new(duration_secs: u32) -> Self {
        Self {
            seconds_remaining: duration_secs,
            ..Default::default()
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == RoundPhase::Running
    }

    /// Reset counters and enter Running
    pub fn begin(&mut self, player: PlayerIdentity, duration_secs: u32) {
        self.phase = RoundPhase::Running;
        self.score = 0;
        self.penalties = 0;
        self.seconds_remaining = duration_secs;
        self.player = Some(player);
    }

    /// One second elapsed; returns true when this tick ended the round
    pub fn countdown(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.seconds_remaining = self.seconds_remaining.saturating_sub(1);
        if self.seconds_remaining == 0 {
            self.phase = RoundPhase::Ended;
            return true;
        }
        false
    }

    pub fn score_bug(&mut self) {
        self.score += 1;
    }

    /// Penalty: lose a point (floored at zero) and count a regression
    pub fn penalize(&mut self) {
        self.score = self.score.saturating_sub(1);
        self.penalties += 1;
    }

    /// Drop back to Idle without a result
    pub fn abort(&mut self, duration_secs: u32) {
        self.phase = RoundPhase::Idle;
        self.seconds_remaining = duration_secs;
    }

    /// Result of the round, once it has a player
    pub fn result(&self) -> Option<RoundResult> {
        self.player.clone().map(|player| RoundResult {
            player,
            score: self.score,
            penalties: self.penalties,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::EntityKind;

    fn ada() -> PlayerIdentity {
        PlayerIdentity::parse("Ada").unwrap()
    }

    #[test]
    fn test_countdown_ends_once() {
        let mut state = RoundState::new(2);
        assert!(!state.countdown(), "idle rounds do not count down");
        assert_eq!(state.seconds_remaining, 2);

        state.begin(ada(), 2);
        assert!(!state.countdown());
        assert_eq!(state.seconds_remaining, 1);
        assert!(state.countdown());
        assert_eq!(state.phase, RoundPhase::Ended);
        assert!(!state.countdown());
        assert_eq!(state.seconds_remaining, 0);
    }

    #[test]
    fn test_penalty_floor() {
        let mut state = RoundState::new(20);
        state.begin(ada(), 20);
        state.penalize();
        state.penalize();
        assert_eq!(state.score, 0);
        assert_eq!(state.penalties, 2);
        state.score_bug();
        assert_eq!(state.score, 1);
    }

    #[test]
    fn test_lock_policy() {
        assert!(HitLockPolicy::AllEntities.locks(EntityKind::Decoy));
        assert!(HitLockPolicy::BugsOnly.locks(EntityKind::Bug));
        assert!(!HitLockPolicy::BugsOnly.locks(EntityKind::Decoy));
        assert!(!HitLockPolicy::Off.locks(EntityKind::Bug));
    }
}
