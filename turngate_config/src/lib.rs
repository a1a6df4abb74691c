#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schemas and model-calibration parsing for the release-timing rig.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//! - The regression model (previous turn duration → predicted next turn
//!   duration) is calibration data, loadable inline from TOML or from a
//!   strict-headered CSV. Validation enforces the segment ordering rules the
//!   core relies on: ascending bounds, exactly one unbounded final segment.
use serde::Deserialize;

/// Model calibration CSV schema.
///
/// Expected headers:
/// upper_us,a0,a1,a2,a3,a4
///
/// One row per regression segment, ascending by `upper_us`; the last row
/// uses `upper_us = 0` to mark the unbounded segment. Coefficients are in
/// ascending powers; unused higher powers are written as 0.
///
/// Example:
/// upper_us,a0,a1,a2,a3,a4
/// 500000,268.2445651096,0.998685885,7.73699143114947e-9,0,0
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct ModelRow {
    pub upper_us: u64,
    pub a0: f64,
    pub a1: f64,
    pub a2: f64,
    pub a3: f64,
    pub a4: f64,
}

/// BCM pin assignments (used by the hardware feature of the CLI).
#[derive(Debug, Deserialize)]
pub struct Pins {
    /// Optical sensor: one cycle per full turn.
    pub fine: u8,
    /// Hall sensor: one event per half turn.
    pub coarse: u8,
    /// Operator release button.
    pub trigger: u8,
    /// PWM channel driving the gate servo (0 or 1).
    pub servo_pwm: Option<u8>,
}

/// Speed-stability gate parameters.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Stability {
    /// Relative duration change between consecutive fine-sensor turns above
    /// which release is suppressed.
    pub relative_threshold: f64,
    /// Number of coarse-sensor events the suppression lasts once triggered.
    pub suppress_rounds: u16,
}

impl Default for Stability {
    fn default() -> Self {
        Self {
            relative_threshold: 0.08,
            suppress_rounds: 2,
        }
    }
}

/// Release-prediction parameters.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Release {
    /// Mechanical transit time between the release command and the ball
    /// clearing the gate (µs).
    pub ball_fall_time_us: u64,
    /// Turn durations above this bound mean the platform is effectively not
    /// spinning; prediction is refused.
    pub max_turn_time_us: u64,
    /// Hard cap on projection iterations per prediction.
    pub max_projections: u32,
}

impl Default for Release {
    fn default() -> Self {
        Self {
            ball_fall_time_us: 418_344,
            max_turn_time_us: 8_000_000,
            max_projections: 64,
        }
    }
}

/// Release-sequencer timing.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Sequence {
    /// Dwell after fully closing the gate so the previous ball clears (µs).
    pub close_settle_us: u64,
    /// Time the servo needs to reach the prepared position (µs).
    pub prepare_us: u64,
    /// Time the servo needs to complete a release (µs).
    pub release_settle_us: u64,
}

impl Default for Sequence {
    fn default() -> Self {
        Self {
            close_settle_us: 400_000,
            prepare_us: 200_000,
            release_settle_us: 200_000,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

/// Control-loop pacing.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RunnerCfg {
    /// Tick rate of the cooperative control loop.
    pub tick_rate_hz: u32,
}

impl Default for RunnerCfg {
    fn default() -> Self {
        Self { tick_rate_hz: 2000 }
    }
}

/// One regression segment as persisted in TOML.
#[derive(Debug, Deserialize, Clone)]
pub struct SegmentCfg {
    /// Exclusive upper bound on the input duration (µs). Absent on the last
    /// segment, which is unbounded above.
    pub upper_us: Option<u64>,
    /// Polynomial coefficients in ascending powers (1..=5 entries).
    pub coeffs: Vec<f64>,
}

/// Optional persisted model; when absent the core's reference calibration
/// is used.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ModelCfg {
    #[serde(default)]
    pub segments: Vec<SegmentCfg>,
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub pins: Pins,
    #[serde(default)]
    pub stability: Stability,
    #[serde(default)]
    pub release: Release,
    #[serde(default)]
    pub sequence: Sequence,
    #[serde(default)]
    pub runner: RunnerCfg,
    #[serde(default)]
    pub logging: Logging,
    #[serde(default)]
    pub model: Option<ModelCfg>,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Validate a segment list: non-empty, strictly ascending bounds, exactly
/// the final segment unbounded, 1..=5 finite coefficients each.
pub fn validate_segments(segments: &[SegmentCfg]) -> eyre::Result<()> {
    if segments.is_empty() {
        eyre::bail!("model.segments must not be empty");
    }
    let mut prev_bound: Option<u64> = None;
    for (i, seg) in segments.iter().enumerate() {
        let last = i == segments.len() - 1;
        match seg.upper_us {
            None if !last => {
                eyre::bail!("model segment {i} is unbounded but is not the last segment");
            }
            Some(_) if last => {
                eyre::bail!("the last model segment must be unbounded (omit upper_us)");
            }
            Some(b) => {
                if b == 0 {
                    eyre::bail!("model segment {i} has a zero upper bound");
                }
                if let Some(p) = prev_bound
                    && b <= p
                {
                    eyre::bail!("model segment bounds must be strictly ascending (segment {i})");
                }
                prev_bound = Some(b);
            }
            None => {}
        }
        if seg.coeffs.is_empty() || seg.coeffs.len() > 5 {
            eyre::bail!(
                "model segment {i} must have 1..=5 coefficients, got {}",
                seg.coeffs.len()
            );
        }
        if seg.coeffs.iter().any(|c| !c.is_finite()) {
            eyre::bail!("model segment {i} has a non-finite coefficient");
        }
    }
    Ok(())
}

pub fn load_model_csv(path: &std::path::Path) -> eyre::Result<Vec<SegmentCfg>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| eyre::eyre!("open model CSV {:?}: {}", path, e))?;

    // Enforce exact headers
    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read CSV headers {:?}: {}", path, e))?
        .clone();
    let expected = ["upper_us", "a0", "a1", "a2", "a3", "a4"];
    let actual: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
    if actual != expected {
        eyre::bail!(
            "model CSV must have headers 'upper_us,a0,a1,a2,a3,a4', got: {}",
            actual.join(",")
        );
    }

    let mut segments = Vec::new();
    for (idx, rec) in rdr.deserialize::<ModelRow>().enumerate() {
        let row = match rec {
            Ok(row) => row,
            Err(e) => {
                eyre::bail!("invalid CSV row {}: {}", idx + 2, e);
            }
        };
        // Trim trailing zero coefficients down to the actual degree, but keep
        // at least the constant term.
        let mut coeffs = vec![row.a0, row.a1, row.a2, row.a3, row.a4];
        while coeffs.len() > 1 && coeffs.last() == Some(&0.0) {
            coeffs.pop();
        }
        segments.push(SegmentCfg {
            upper_us: (row.upper_us != 0).then_some(row.upper_us),
            coeffs,
        });
    }

    validate_segments(&segments)?;
    Ok(segments)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Stability
        if !(self.stability.relative_threshold > 0.0 && self.stability.relative_threshold < 1.0) {
            eyre::bail!("stability.relative_threshold must be in (0.0, 1.0)");
        }
        if self.stability.suppress_rounds == 0 {
            eyre::bail!("stability.suppress_rounds must be >= 1");
        }

        // Release
        if self.release.ball_fall_time_us == 0 {
            eyre::bail!("release.ball_fall_time_us must be > 0");
        }
        if self.release.max_turn_time_us == 0 {
            eyre::bail!("release.max_turn_time_us must be > 0");
        }
        if self.release.max_projections == 0 {
            eyre::bail!("release.max_projections must be >= 1");
        }

        // Sequence: zero dwell times are allowed in tests but a zero prepare
        // time means commanding release against an unprepared servo.
        if self.sequence.prepare_us == 0 {
            eyre::bail!("sequence.prepare_us must be >= 1");
        }

        // Runner
        if self.runner.tick_rate_hz == 0 {
            eyre::bail!("runner.tick_rate_hz must be > 0");
        }

        // Pins must be pairwise distinct
        if self.pins.fine == self.pins.coarse
            || self.pins.fine == self.pins.trigger
            || self.pins.coarse == self.pins.trigger
        {
            eyre::bail!("pins.fine, pins.coarse and pins.trigger must be distinct");
        }
        if let Some(ch) = self.pins.servo_pwm
            && ch > 1
        {
            eyre::bail!("pins.servo_pwm must be PWM channel 0 or 1");
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref()
            && !matches!(rot, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of: never, daily, hourly");
        }

        // Model (when persisted inline)
        if let Some(model) = &self.model {
            validate_segments(&model.segments)?;
        }

        Ok(())
    }
}
