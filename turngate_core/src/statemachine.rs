//! Release sequencing state machine.
//!
//! The machine is decoupled from the rest of the system: inputs arrive
//! through injected providers resolved fresh on every call, the only output
//! is the injected gate actuator. `advance_state` must be called once per
//! control-loop tick and never blocks; waiting is an absolute-µs deadline
//! checked on later ticks.

use std::sync::Arc;
use std::time::Instant;

use turngate_traits::clock::Clock;
use turngate_traits::GateActuator;

use crate::config::SequenceCfg;

/// The six sequencer states. Exactly one is active at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseState {
    /// Gate fully closing so the next ball can fall through (initial state).
    Closed,
    /// Waiting for the ball to clear the gate.
    WaitBall,
    /// Waiting for the actuator to reach the prepared position.
    Prepare,
    /// Armed: waiting for the trigger, then computing the release time.
    Ready,
    /// Counting down to the computed release instant.
    Wait,
    /// Waiting for the actuator to finish the release.
    Release,
}

/// Zero-argument provider returning the trigger or suppression level.
pub type StateProvider = Box<dyn FnMut() -> bool>;
/// Zero-argument provider returning the wait until release in µs;
/// negative means "no valid answer now".
pub type ReleaseTimeProvider = Box<dyn FnMut() -> i64>;

pub struct ReleaseStateMachine<A: GateActuator> {
    state: ReleaseState,
    actuator: A,
    cfg: SequenceCfg,
    clock: Arc<dyn Clock + Send + Sync>,
    epoch: Instant,
    /// Absolute deadline (µs since epoch) for the pending timed transition.
    /// Stale values are never consulted: every state that depends on a
    /// deadline sets its own before entering.
    wait_until_us: u64,
    trigger: Option<StateProvider>,
    suppression: Option<StateProvider>,
    release_time: Option<ReleaseTimeProvider>,
}

impl<A: GateActuator> ReleaseStateMachine<A> {
    pub fn new(
        actuator: A,
        cfg: SequenceCfg,
        clock: Arc<dyn Clock + Send + Sync>,
        epoch: Instant,
    ) -> Self {
        Self {
            state: ReleaseState::Closed,
            actuator,
            cfg,
            clock,
            epoch,
            wait_until_us: 0,
            trigger: None,
            suppression: None,
            release_time: None,
        }
    }

    /// Current state.
    pub fn state(&self) -> ReleaseState {
        self.state
    }

    /// Set the provider for the operator trigger (true = release requested).
    /// Unset reads as false.
    pub fn set_trigger_provider(&mut self, p: impl FnMut() -> bool + 'static) {
        self.trigger = Some(Box::new(p));
    }

    /// Set the provider for release suppression (true = do not release).
    /// Unset reads as false.
    pub fn set_suppression_provider(&mut self, p: impl FnMut() -> bool + 'static) {
        self.suppression = Some(Box::new(p));
    }

    /// Set the provider computing the wait in µs from now until the ball
    /// must be released. Unset reads as "no valid answer" (-1).
    pub fn set_release_time_provider(&mut self, p: impl FnMut() -> i64 + 'static) {
        self.release_time = Some(Box::new(p));
    }

    fn set_wait_from_now(&mut self, us: u64) {
        self.wait_until_us = self.clock.us_since(self.epoch).saturating_add(us);
    }

    fn is_wait_done(&self) -> bool {
        self.clock.us_since(self.epoch) >= self.wait_until_us
    }

    fn read_trigger(&mut self) -> bool {
        self.trigger.as_mut().is_some_and(|p| p())
    }

    fn read_suppression(&mut self) -> bool {
        self.suppression.as_mut().is_some_and(|p| p())
    }

    fn read_release_time(&mut self) -> i64 {
        self.release_time.as_mut().map_or(-1, |p| p())
    }

    /// Advance the machine by at most one transition and return the
    /// (possibly new) state.
    ///
    /// Actuator results are logged, never consulted (the driver is
    /// fire-and-forget); every other failure mode degrades to retrying on
    /// the next tick.
    pub fn advance_state(&mut self) -> ReleaseState {
        match self.state {
            ReleaseState::Closed => {
                if let Err(e) = self.actuator.close_for_next_ball() {
                    tracing::warn!(error = %e, "close_for_next_ball failed");
                }
                // Wait a bit longer so the ball has definitely fallen through.
                self.set_wait_from_now(self.cfg.close_settle_us);
                self.transition(ReleaseState::WaitBall);
            }

            ReleaseState::WaitBall => {
                if self.is_wait_done() {
                    if let Err(e) = self.actuator.prepare_release() {
                        tracing::warn!(error = %e, "prepare_release failed");
                    }
                    self.set_wait_from_now(self.cfg.prepare_us);
                    self.transition(ReleaseState::Prepare);
                }
            }

            ReleaseState::Prepare => {
                if self.is_wait_done() {
                    self.transition(ReleaseState::Ready);
                }
            }

            ReleaseState::Ready => {
                // Start the countdown only when triggered and not suppressed.
                if self.read_trigger() && !self.read_suppression() {
                    let wait_us = self.read_release_time();
                    if wait_us >= 0 {
                        self.set_wait_from_now(wait_us as u64);
                        self.transition(ReleaseState::Wait);
                    } else {
                        tracing::debug!("prediction unavailable, staying armed");
                    }
                }
            }

            ReleaseState::Wait => {
                if self.read_suppression() {
                    // Abort the release immediately; no actuator command.
                    self.transition(ReleaseState::Ready);
                } else if self.is_wait_done() {
                    if let Err(e) = self.actuator.release() {
                        tracing::warn!(error = %e, "release failed");
                    }
                    self.set_wait_from_now(self.cfg.release_settle_us);
                    self.transition(ReleaseState::Release);
                }
            }

            ReleaseState::Release => {
                if self.is_wait_done() {
                    self.transition(ReleaseState::Closed);
                }
            }
        }
        self.state
    }

    fn transition(&mut self, next: ReleaseState) {
        tracing::debug!(from = ?self.state, to = ?next, "state transition");
        self.state = next;
    }
}

impl<A: GateActuator> core::fmt::Debug for ReleaseStateMachine<A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ReleaseStateMachine")
            .field("state", &self.state)
            .field("wait_until_us", &self.wait_until_us)
            .finish()
    }
}
