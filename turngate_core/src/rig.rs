//! Owning context for the release-timing engine.
//!
//! `GateRig` replaces the original's global `setup()`/`loop()` split: one
//! object, constructed once through `RigBuilder`, holding every component and
//! exposing a single non-blocking `tick()` entry point for an external drive
//! loop. Within a tick the sensors are always sampled before the state
//! machine runs, so a transition decision never mixes this tick's inputs
//! with stale ones.
//!
//! All sharing is single-threaded by construction (one cooperative control
//! loop, no preemption), so the cross-component links are plain `Rc<Cell>` /
//! `Rc<RefCell>` mirrors written by `tick()` and read by the state machine's
//! providers.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use eyre::WrapErr;
use turngate_traits::clock::Clock;
use turngate_traits::{DigitalInput, GateActuator};

use crate::builder::{Missing, RigBuilder};
use crate::edge::EdgeSignal;
use crate::error::{CoreError, Result};
use crate::observer::CycleObserver;
use crate::stability::SpeedGate;
use crate::statemachine::{ReleaseState, ReleaseStateMachine};

/// Snapshot of the most recent completed fine-sensor turn, mirrored for the
/// release-time provider.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct FineTurn {
    pub turn_us: u64,
    pub boundary_at_us: u64,
    /// False until the first full turn has been measured.
    pub valid: bool,
}

pub struct GateRig {
    pub(crate) fine: CycleObserver<Box<dyn DigitalInput>>,
    pub(crate) coarse: CycleObserver<Box<dyn DigitalInput>>,
    pub(crate) trigger_pin: Box<dyn DigitalInput>,
    pub(crate) trigger_edge: EdgeSignal,
    pub(crate) trigger_level: Rc<Cell<bool>>,
    pub(crate) fine_turn: Rc<Cell<FineTurn>>,
    pub(crate) speed_gate: Rc<RefCell<SpeedGate>>,
    pub(crate) machine: ReleaseStateMachine<Box<dyn GateActuator>>,
    pub(crate) clock: Arc<dyn Clock + Send + Sync>,
    pub(crate) epoch: Instant,
    /// Fine-sensor silence beyond this is reported as a stall diagnostic.
    pub(crate) stall_threshold_us: u64,
}

impl GateRig {
    /// Start building a rig.
    pub fn builder() -> RigBuilder<Missing, Missing, Missing> {
        RigBuilder::default()
    }

    /// One control-loop iteration: sample both sensors and the trigger,
    /// update the stability gate, then advance the state machine by at most
    /// one transition. Never blocks.
    pub fn tick(&mut self) -> Result<ReleaseState> {
        // Fine sensor first: it feeds both the stability gate and the
        // release-time provider the machine may consult below.
        if let Some(m) = self.fine.tick()? {
            self.speed_gate.borrow_mut().fine_update(m.duration_us);
            self.fine_turn.set(FineTurn {
                turn_us: m.duration_us,
                boundary_at_us: m.at_us,
                valid: true,
            });
        }
        if let Some(m) = self.coarse.tick()? {
            self.speed_gate.borrow_mut().coarse_update(m.duration_us);
        }

        let trig = self
            .trigger_pin
            .read()
            .map_err(|e| eyre::Report::new(CoreError::Hardware(e.to_string())))
            .wrap_err("reading trigger")?;
        self.trigger_level.set(trig);
        self.trigger_edge.provide_state(trig);

        Ok(self.machine.advance_state())
    }

    /// Current sequencer state.
    pub fn state(&self) -> ReleaseState {
        self.machine.state()
    }

    /// True while the stability gate suppresses release.
    pub fn is_suppressed(&self) -> bool {
        self.speed_gate.borrow().is_suppressed()
    }

    /// Last fine-sensor turn duration in µs (0 before the first turn).
    pub fn last_turn_time_us(&self) -> u64 {
        self.fine.turn_time_us()
    }

    /// True when the fine sensor has been silent for longer than the
    /// configured maximum turn time while a turn measurement exists:
    /// the platform has effectively stopped under us.
    pub fn fine_sensor_stalled(&self) -> bool {
        let ft = self.fine_turn.get();
        if !ft.valid {
            return false;
        }
        let now_us = self.clock.us_since(self.epoch);
        now_us.saturating_sub(ft.boundary_at_us) > self.stall_threshold_us
    }

    /// The rig's clock (for pacing the external drive loop).
    pub fn clock(&self) -> Arc<dyn Clock + Send + Sync> {
        Arc::clone(&self.clock)
    }
}

impl core::fmt::Debug for GateRig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GateRig")
            .field("state", &self.machine.state())
            .field("last_turn_us", &self.fine.turn_time_us())
            .field("suppressed", &self.speed_gate.borrow().is_suppressed())
            .finish()
    }
}
