//! Type-state builder for `GateRig`. All fields are validated on `build()`.

use std::cell::{Cell, RefCell};
use std::marker::PhantomData;
use std::rc::Rc;
use std::sync::Arc;

use turngate_traits::clock::{Clock, MonotonicClock};
use turngate_traits::{DigitalInput, GateActuator};

use crate::config::{ReleaseCfg, SequenceCfg, StabilityCfg};
use crate::edge::EdgeSignal;
use crate::error::{BuildError, Result};
use crate::model::PredictionModel;
use crate::observer::{CycleMode, CycleObserver};
use crate::predictor::ReleasePredictor;
use crate::rig::{FineTurn, GateRig};
use crate::stability::SpeedGate;
use crate::statemachine::ReleaseStateMachine;

// Type-state markers
pub struct Missing;
pub struct Set;

/// Builder for `GateRig`. The fine pin, coarse pin and actuator advance the
/// type-state; `build()` only exists once all three are present. The trigger
/// pin is validated at build time.
pub struct RigBuilder<F, C, A> {
    fine_pin: Option<Box<dyn DigitalInput>>,
    coarse_pin: Option<Box<dyn DigitalInput>>,
    trigger_pin: Option<Box<dyn DigitalInput>>,
    actuator: Option<Box<dyn GateActuator>>,
    stability: Option<StabilityCfg>,
    release: Option<ReleaseCfg>,
    sequence: Option<SequenceCfg>,
    model: Option<PredictionModel>,
    // Optional clock for tests (accept Box here)
    clock: Option<Box<dyn Clock + Send + Sync>>,
    // Type-state markers
    _f: PhantomData<F>,
    _c: PhantomData<C>,
    _a: PhantomData<A>,
}

impl Default for RigBuilder<Missing, Missing, Missing> {
    fn default() -> Self {
        Self {
            fine_pin: None,
            coarse_pin: None,
            trigger_pin: None,
            actuator: None,
            stability: None,
            release: None,
            sequence: None,
            model: None,
            clock: None,
            _f: PhantomData,
            _c: PhantomData,
            _a: PhantomData,
        }
    }
}

impl<F, C, A> RigBuilder<F, C, A> {
    /// Fallible build available in any type-state; returns a detailed
    /// BuildError for missing pieces.
    pub fn try_build(self) -> Result<GateRig> {
        let RigBuilder {
            fine_pin,
            coarse_pin,
            trigger_pin,
            actuator,
            stability,
            release,
            sequence,
            model,
            clock,
            _f: _,
            _c: _,
            _a: _,
        } = self;

        let fine_pin = fine_pin.ok_or_else(|| eyre::Report::new(BuildError::MissingFinePin))?;
        let coarse_pin =
            coarse_pin.ok_or_else(|| eyre::Report::new(BuildError::MissingCoarsePin))?;
        let trigger_pin =
            trigger_pin.ok_or_else(|| eyre::Report::new(BuildError::MissingTriggerPin))?;
        let actuator = actuator.ok_or_else(|| eyre::Report::new(BuildError::MissingActuator))?;

        let stability = stability.unwrap_or_default();
        let release = release.unwrap_or_default();
        let sequence = sequence.unwrap_or_default();
        let model = model.unwrap_or_default();
        let clock: Arc<dyn Clock + Send + Sync> = match clock {
            Some(b) => Arc::from(b),
            None => Arc::new(MonotonicClock::new()),
        };

        // Validate configs (non-panicking; return typed Config errors)
        if !(stability.relative_threshold > 0.0 && stability.relative_threshold < 1.0) {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "relative_threshold must be in (0, 1)",
            )));
        }
        if stability.suppress_rounds == 0 {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "suppress_rounds must be >= 1",
            )));
        }
        if release.ball_fall_time_us == 0 {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "ball_fall_time_us must be > 0",
            )));
        }
        if release.max_turn_time_us == 0 {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "max_turn_time_us must be > 0",
            )));
        }
        if release.max_projections == 0 {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "max_projections must be >= 1",
            )));
        }
        if sequence.prepare_us == 0 {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "prepare_us must be >= 1",
            )));
        }

        // Establish the shared epoch for all µs timestamps.
        let epoch = clock.now();

        // Fine sensor: one full cycle per turn. Coarse sensor: one event per
        // half turn, scaled x2 into a full-turn estimate, measured on both
        // edges (the hall signal sits near 50% duty).
        let fine = CycleObserver::new(fine_pin, 1, CycleMode::FullCycle, Arc::clone(&clock), epoch);
        let coarse = CycleObserver::new(
            coarse_pin,
            2,
            CycleMode::HalfCycle,
            Arc::clone(&clock),
            epoch,
        );

        let speed_gate = Rc::new(RefCell::new(SpeedGate::new(stability)));
        let trigger_level = Rc::new(Cell::new(false));
        let fine_turn = Rc::new(Cell::new(FineTurn::default()));

        let stall_threshold_us = release.max_turn_time_us;
        let predictor = ReleasePredictor::new(model, release);

        let mut machine = ReleaseStateMachine::new(actuator, sequence, Arc::clone(&clock), epoch);
        {
            let level = Rc::clone(&trigger_level);
            machine.set_trigger_provider(move || level.get());
        }
        {
            let gate = Rc::clone(&speed_gate);
            machine.set_suppression_provider(move || gate.borrow().is_suppressed());
        }
        {
            let turn = Rc::clone(&fine_turn);
            let clock = Arc::clone(&clock);
            machine.set_release_time_provider(move || {
                let ft = turn.get();
                if !ft.valid {
                    tracing::debug!("no completed turn yet, release time unavailable");
                    return -1;
                }
                let now_us = clock.us_since(epoch);
                let time_in_round_us = now_us.saturating_sub(ft.boundary_at_us);
                match predictor.time_to_release(ft.turn_us, time_in_round_us) {
                    Ok(us) => i64::try_from(us).unwrap_or(i64::MAX),
                    Err(e) => {
                        tracing::debug!(error = %e, "release prediction unavailable");
                        -1
                    }
                }
            });
        }

        let mut trigger_edge = EdgeSignal::new();
        trigger_edge.set_callback(|| tracing::info!("release trigger pressed"));

        Ok(GateRig {
            fine,
            coarse,
            trigger_pin,
            trigger_edge,
            trigger_level,
            fine_turn,
            speed_gate,
            machine,
            clock,
            epoch,
            stall_threshold_us,
        })
    }
}

/// Chainable setters that do not affect type-state
impl<F, C, A> RigBuilder<F, C, A> {
    pub fn with_trigger_pin(mut self, pin: impl DigitalInput + 'static) -> Self {
        self.trigger_pin = Some(Box::new(pin));
        self
    }
    pub fn with_stability(mut self, stability: StabilityCfg) -> Self {
        self.stability = Some(stability);
        self
    }
    pub fn with_release(mut self, release: ReleaseCfg) -> Self {
        self.release = Some(release);
        self
    }
    pub fn with_sequence(mut self, sequence: SequenceCfg) -> Self {
        self.sequence = Some(sequence);
        self
    }
    /// Inject a prediction model; defaults to the reference calibration.
    pub fn with_model(mut self, model: PredictionModel) -> Self {
        self.model = Some(model);
        self
    }
    /// Provide a custom clock implementation; defaults to MonotonicClock.
    pub fn with_clock(mut self, clock: Box<dyn Clock + Send + Sync>) -> Self {
        self.clock = Some(clock);
        self
    }
}

// Setters that advance type-state when providing mandatory components
impl<C, A> RigBuilder<Missing, C, A> {
    pub fn with_fine_pin(self, pin: impl DigitalInput + 'static) -> RigBuilder<Set, C, A> {
        let RigBuilder {
            fine_pin: _,
            coarse_pin,
            trigger_pin,
            actuator,
            stability,
            release,
            sequence,
            model,
            clock,
            _f: _,
            _c: _,
            _a: _,
        } = self;
        RigBuilder {
            fine_pin: Some(Box::new(pin)),
            coarse_pin,
            trigger_pin,
            actuator,
            stability,
            release,
            sequence,
            model,
            clock,
            _f: PhantomData,
            _c: PhantomData,
            _a: PhantomData,
        }
    }
}

impl<F, A> RigBuilder<F, Missing, A> {
    pub fn with_coarse_pin(self, pin: impl DigitalInput + 'static) -> RigBuilder<F, Set, A> {
        let RigBuilder {
            fine_pin,
            coarse_pin: _,
            trigger_pin,
            actuator,
            stability,
            release,
            sequence,
            model,
            clock,
            _f: _,
            _c: _,
            _a: _,
        } = self;
        RigBuilder {
            fine_pin,
            coarse_pin: Some(Box::new(pin)),
            trigger_pin,
            actuator,
            stability,
            release,
            sequence,
            model,
            clock,
            _f: PhantomData,
            _c: PhantomData,
            _a: PhantomData,
        }
    }
}

impl<F, C> RigBuilder<F, C, Missing> {
    pub fn with_actuator(self, actuator: impl GateActuator + 'static) -> RigBuilder<F, C, Set> {
        let RigBuilder {
            fine_pin,
            coarse_pin,
            trigger_pin,
            actuator: _,
            stability,
            release,
            sequence,
            model,
            clock,
            _f: _,
            _c: _,
            _a: _,
        } = self;
        RigBuilder {
            fine_pin,
            coarse_pin,
            trigger_pin,
            actuator: Some(Box::new(actuator)),
            stability,
            release,
            sequence,
            model,
            clock,
            _f: PhantomData,
            _c: PhantomData,
            _a: PhantomData,
        }
    }
}

impl RigBuilder<Set, Set, Set> {
    /// Validate and build the rig. Only available when the fine pin, coarse
    /// pin and actuator are all set.
    pub fn build(self) -> Result<GateRig> {
        self.try_build()
    }
}
