#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Predictive release-timing engine (hardware-agnostic).
//!
//! Drives a mechanical ball-release gate in sync with a spinning platform so
//! that a released ball passes through the hole in the platform. All hardware
//! interactions go through the `turngate_traits::DigitalInput` and
//! `turngate_traits::GateActuator` traits.
//!
//! ## Architecture
//!
//! - **Observation**: per-tick pin sampling into cycle durations
//!   (`observer` module, plus the `edge` rising-edge notifier)
//! - **Stability**: suppression of release while rotation speed is erratic
//!   (`stability` module)
//! - **Prediction**: piecewise regression model projected over future turns
//!   until the ball-fall time is covered (`model`, `predictor` modules)
//! - **Sequencing**: six-state release state machine (`statemachine` module)
//! - **Context**: owning `GateRig` with a single `tick()` entry point
//!   (`rig`, `builder`, `runner` modules)
//!
//! ## Timing model
//!
//! One cooperative control loop; nothing blocks or sleeps inside a tick.
//! Waiting is expressed as absolute-µs deadlines checked on later ticks.
//! All timestamps are `u64` microseconds since the rig's epoch.

// Module declarations
pub mod builder;
pub mod config;
pub mod conversions;
pub mod edge;
pub mod error;
pub mod mocks;
pub mod model;
pub mod observer;
pub mod predictor;
pub mod rig;
pub mod runner;
pub mod stability;
pub mod statemachine;
pub mod util;

pub use builder::{Missing, RigBuilder, Set};
pub use config::{ReleaseCfg, SequenceCfg, StabilityCfg};
pub use edge::EdgeSignal;
pub use error::{BuildError, CoreError, PredictError};
pub use model::{ModelSegment, PredictionModel};
pub use observer::{CycleMeasurement, CycleMode, CycleObserver};
pub use predictor::ReleasePredictor;
pub use rig::GateRig;
pub use stability::SpeedGate;
pub use statemachine::{ReleaseState, ReleaseStateMachine};
