//! Runtime configuration for the release-timing engine.
//!
//! These are the structs consumed by the core components. They are separate
//! from the TOML-deserialized config in `turngate_config`; see the
//! `conversions` module for the bridge.

/// Speed-stability gate configuration.
#[derive(Debug, Clone)]
pub struct StabilityCfg {
    /// Relative duration change between consecutive fine-sensor turns above
    /// which release is suppressed. Default: 0.08 (8%).
    pub relative_threshold: f64,
    /// Coarse-sensor events the suppression lasts once triggered. Two coarse
    /// events correspond to one full turn. Default: 2.
    pub suppress_rounds: u16,
}

impl Default for StabilityCfg {
    fn default() -> Self {
        Self {
            relative_threshold: 0.08,
            suppress_rounds: 2,
        }
    }
}

/// Release-prediction configuration.
#[derive(Debug, Clone)]
pub struct ReleaseCfg {
    /// Mechanical transit time between the release command and the ball
    /// clearing the gate (µs). Calibration constant.
    pub ball_fall_time_us: u64,
    /// Turn durations above this bound mean no meaningful platform speed;
    /// prediction is refused instead of projected.
    pub max_turn_time_us: u64,
    /// Hard cap on projection iterations per prediction, guarding against a
    /// malformed or out-of-calibration model.
    pub max_projections: u32,
}

impl Default for ReleaseCfg {
    fn default() -> Self {
        Self {
            // 391000 + 27344, from the reference calibration
            ball_fall_time_us: 418_344,
            max_turn_time_us: 8_000_000,
            max_projections: 64,
        }
    }
}

/// Release-sequencer timing.
#[derive(Debug, Clone)]
pub struct SequenceCfg {
    /// Dwell after fully closing the gate so the ball has definitely fallen
    /// through (µs).
    pub close_settle_us: u64,
    /// Time the actuator needs to reach the prepared position (µs).
    pub prepare_us: u64,
    /// Time the actuator needs to complete a release (µs).
    pub release_settle_us: u64,
}

impl Default for SequenceCfg {
    fn default() -> Self {
        Self {
            close_settle_us: 400_000,
            prepare_us: 200_000,
            release_settle_us: 200_000,
        }
    }
}
