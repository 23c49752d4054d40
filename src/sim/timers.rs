//! Round timers advanced in fixed steps
//!
//! The countdown, the two reposition cadences and the per-entity hit
//! cooldowns are plain data owned by the round. Nothing fires unless the
//! frame loop advances them, and a disarmed timer never fires.

use super::field::EntityKind;

/// Something a timer asked the round to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// One second of the countdown elapsed
    Countdown,
    /// Time to move every bug
    RepositionBugs,
    /// Time to move every decoy
    RepositionDecoys,
    /// An entity's hit lock expired
    CooldownReleased(EntityKind, usize),
}

/// Repeating timer
#[derive(Debug, Clone)]
pub struct Interval {
    period_ms: u32,
    elapsed_ms: u32,
    armed: bool,
}

impl Interval {
    /// New timer, disarmed
    pub fn new(period_ms: u32) -> Self {
        Self {
            period_ms: period_ms.max(1),
            elapsed_ms: 0,
            armed: false,
        }
    }

    /// Start counting from zero
    pub fn arm(&mut self) {
        self.elapsed_ms = 0;
        self.armed = true;
    }

    pub fn disarm(&mut self) {
        self.elapsed_ms = 0;
        self.armed = false;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Advance by `ms`; returns how many periods completed
    pub fn advance(&mut self, ms: u32) -> u32 {
        if !self.armed {
            return 0;
        }
        self.elapsed_ms = self.elapsed_ms.saturating_add(ms);
        let fired = self.elapsed_ms / self.period_ms;
        self.elapsed_ms %= self.period_ms;
        fired
    }
}

/// Per-entity hit locks, each released by a deferred expiry
#[derive(Debug, Clone, Default)]
pub struct HitCooldowns {
    /// Remaining lock time per bug index (0 = unlocked)
    bugs: Vec<u32>,
    /// Remaining lock time per decoy index (0 = unlocked)
    decoys: Vec<u32>,
}

impl HitCooldowns {
    pub fn new(bug_count: usize, decoy_count: usize) -> Self {
        Self {
            bugs: vec![0; bug_count],
            decoys: vec![0; decoy_count],
        }
    }

    fn slots(&self, kind: EntityKind) -> &[u32] {
        match kind {
            EntityKind::Bug => &self.bugs,
            EntityKind::Decoy => &self.decoys,
        }
    }

    fn slots_mut(&mut self, kind: EntityKind) -> &mut [u32] {
        match kind {
            EntityKind::Bug => &mut self.bugs,
            EntityKind::Decoy => &mut self.decoys,
        }
    }

    /// Lock an entity for `duration_ms`
    pub fn lock(&mut self, kind: EntityKind, index: usize, duration_ms: u32) {
        if let Some(slot) = self.slots_mut(kind).get_mut(index) {
            *slot = duration_ms;
        }
    }

    pub fn is_locked(&self, kind: EntityKind, index: usize) -> bool {
        self.slots(kind).get(index).is_some_and(|&ms| ms > 0)
    }

    /// Number of entities currently locked
    pub fn active(&self) -> usize {
        self.bugs.iter().chain(&self.decoys).filter(|&&ms| ms > 0).count()
    }

    /// Drop every lock without emitting releases
    pub fn clear(&mut self) {
        self.bugs.iter_mut().for_each(|ms| *ms = 0);
        self.decoys.iter_mut().for_each(|ms| *ms = 0);
    }

    /// Count down every lock, pushing a release for each that expires
    pub fn advance(&mut self, ms: u32, out: &mut Vec<TimerEvent>) {
        for kind in [EntityKind::Bug, EntityKind::Decoy] {
            for (index, slot) in self.slots_mut(kind).iter_mut().enumerate() {
                if *slot == 0 {
                    continue;
                }
                *slot = slot.saturating_sub(ms);
                if *slot == 0 {
                    out.push(TimerEvent::CooldownReleased(kind, index));
                }
            }
        }
    }
}

/// Every timer a running round owns
#[derive(Debug, Clone)]
pub struct RoundTimers {
    pub countdown: Interval,
    pub bugs: Interval,
    pub decoys: Interval,
    pub cooldowns: HitCooldowns,
}

impl RoundTimers {
    pub fn new(
        countdown_ms: u32,
        bug_ms: u32,
        decoy_ms: u32,
        bug_count: usize,
        decoy_count: usize,
    ) -> Self {
        Self {
            countdown: Interval::new(countdown_ms),
            bugs: Interval::new(bug_ms),
            decoys: Interval::new(decoy_ms),
            cooldowns: HitCooldowns::new(bug_count, decoy_count),
        }
    }

    /// Fresh start for all periodic timers
    pub fn arm(&mut self) {
        self.countdown.arm();
        self.bugs.arm();
        self.decoys.arm();
        self.cooldowns.clear();
    }

    /// Stop everything, including pending cooldown releases
    pub fn disarm(&mut self) {
        self.countdown.disarm();
        self.bugs.disarm();
        self.decoys.disarm();
        self.cooldowns.clear();
    }

    /// True when nothing could fire
    pub fn is_idle(&self) -> bool {
        !self.countdown.is_armed()
            && !self.bugs.is_armed()
            && !self.decoys.is_armed()
            && self.cooldowns.active() == 0
    }

    /// Advance one step; events come out in a stable order
    pub fn advance(&mut self, ms: u32) -> Vec<TimerEvent> {
        let mut events = Vec::new();
        self.cooldowns.advance(ms, &mut events);
        for _ in 0..self.countdown.advance(ms) {
            events.push(TimerEvent::Countdown);
        }
        for _ in 0..self.bugs.advance(ms) {
            events.push(TimerEvent::RepositionBugs);
        }
        for _ in 0..self.decoys.advance(ms) {
            events.push(TimerEvent::RepositionDecoys);
        }
        events
    }
}
