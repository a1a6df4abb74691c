//! Speed-stability gating of ball release.
//!
//! The fine sensor decides *whether* to suppress (its jitter is what ruins
//! release accuracy); the coarse sensor only counts the suppression down
//! (it cannot resolve phase but is reliable cadence, two events per turn).

use crate::config::StabilityCfg;

pub struct SpeedGate {
    cfg: StabilityCfg,
    /// Previous fine-sensor turn duration (0 until the first update).
    last_turn_us: u64,
    /// Remaining coarse-sensor events for which release stays suppressed.
    suppressed_rounds: u16,
}

impl SpeedGate {
    pub fn new(cfg: StabilityCfg) -> Self {
        Self {
            cfg,
            last_turn_us: 0,
            suppressed_rounds: 0,
        }
    }

    /// Feed one fine-sensor turn duration (µs).
    ///
    /// A relative change above the threshold resets the countdown to
    /// `suppress_rounds`. This is a hard reset, never an extension beyond
    /// that value. The duration is always stored as the new baseline.
    /// Zero durations violate the precondition (the reference divides by
    /// the new duration) and are ignored with a warning.
    pub fn fine_update(&mut self, duration_us: u64) {
        if duration_us == 0 {
            tracing::warn!("ignoring zero-duration fine cycle");
            return;
        }
        let prev = self.last_turn_us as f64;
        let cur = duration_us as f64;
        if (prev - cur).abs() / cur > self.cfg.relative_threshold {
            tracing::debug!(
                last_turn_us = self.last_turn_us,
                turn_us = duration_us,
                "turn-to-turn speed jump, suppressing release"
            );
            self.suppressed_rounds = self.cfg.suppress_rounds;
        }
        self.last_turn_us = duration_us;
    }

    /// Feed one coarse-sensor event. The measured duration is irrelevant
    /// here; each event ticks the countdown down by one.
    pub fn coarse_update(&mut self, _duration_us: u64) {
        if self.suppressed_rounds > 0 {
            self.suppressed_rounds -= 1;
        }
    }

    /// True while release is suppressed. Pure query.
    pub fn is_suppressed(&self) -> bool {
        self.suppressed_rounds != 0
    }
}

impl core::fmt::Debug for SpeedGate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SpeedGate")
            .field("last_turn_us", &self.last_turn_us)
            .field("suppressed_rounds", &self.suppressed_rounds)
            .finish()
    }
}
