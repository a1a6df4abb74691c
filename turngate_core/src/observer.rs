//! Cycle-duration measurement from a raw digital input.
//!
//! A `CycleObserver` samples its pin once per control-loop tick and converts
//! qualifying level transitions into scaled cycle durations. Measurements are
//! returned from `tick()` and, when a subscriber is registered, pushed to it
//! synchronously inside the same call.

use std::sync::Arc;
use std::time::Instant;

use eyre::WrapErr;
use turngate_traits::clock::Clock;
use turngate_traits::DigitalInput;

use crate::error::{CoreError, Result};

/// Which level transitions end a measured cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleMode {
    /// Only falling transitions qualify: one measurement per full cycle.
    FullCycle,
    /// Every transition qualifies: one measurement per half cycle. Only
    /// valid near a 50% duty cycle.
    HalfCycle,
}

/// One completed cycle: the scaled duration and the timestamp at which it
/// was recorded, both in µs since the observer's epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleMeasurement {
    pub duration_us: u64,
    pub at_us: u64,
}

pub struct CycleObserver<P: DigitalInput> {
    pin: P,
    /// Factor applied to a raw interval, e.g. 2 to turn a half-turn interval
    /// into a full-turn estimate.
    factor: u32,
    mode: CycleMode,
    clock: Arc<dyn Clock + Send + Sync>,
    epoch: Instant,
    last_state: bool,
    /// Time of the last qualifying transition (µs since epoch).
    last_boundary_us: u64,
    last_measurement: Option<CycleMeasurement>,
    subscriber: Option<Box<dyn FnMut(u64)>>,
}

impl<P: DigitalInput> CycleObserver<P> {
    pub fn new(
        pin: P,
        factor: u32,
        mode: CycleMode,
        clock: Arc<dyn Clock + Send + Sync>,
        epoch: Instant,
    ) -> Self {
        Self {
            pin,
            factor,
            mode,
            clock,
            epoch,
            last_state: false,
            last_boundary_us: 0,
            last_measurement: None,
            subscriber: None,
        }
    }

    /// Register the function called with each new scaled duration (µs).
    /// At most one subscriber; a later call replaces the earlier one.
    pub fn set_subscriber(&mut self, subscriber: impl FnMut(u64) + 'static) {
        self.subscriber = Some(Box::new(subscriber));
    }

    /// Sample the pin once. Returns the fresh measurement when this tick
    /// observed a qualifying transition.
    ///
    /// The stored level is updated on every transition, qualifying or not,
    /// so a skipped boundary never doubles into the next measurement's
    /// duration. Each measurement is reported exactly once.
    pub fn tick(&mut self) -> Result<Option<CycleMeasurement>> {
        let state = self
            .pin
            .read()
            .map_err(|e| eyre::Report::new(CoreError::Hardware(e.to_string())))
            .wrap_err("reading cycle sensor")?;

        if state == self.last_state {
            return Ok(None);
        }

        let mut fresh = None;
        if self.mode == CycleMode::HalfCycle || !state {
            let now_us = self.clock.us_since(self.epoch);
            let dif = now_us.saturating_sub(self.last_boundary_us);
            let duration_us = dif.saturating_mul(u64::from(self.factor));
            let m = CycleMeasurement {
                duration_us,
                at_us: now_us,
            };
            self.last_measurement = Some(m);
            self.last_boundary_us = now_us;
            if let Some(cb) = self.subscriber.as_mut() {
                cb(duration_us);
            }
            fresh = Some(m);
        }
        self.last_state = state;
        Ok(fresh)
    }

    /// Last reported scaled duration in µs (0 before the first measurement).
    pub fn turn_time_us(&self) -> u64 {
        self.last_measurement.map_or(0, |m| m.duration_us)
    }

    /// Timestamp of the last measurement in µs since the epoch (0 before the
    /// first measurement).
    pub fn last_measurement_at_us(&self) -> u64 {
        self.last_measurement.map_or(0, |m| m.at_us)
    }

    pub fn last_measurement(&self) -> Option<CycleMeasurement> {
        self.last_measurement
    }
}

impl<P: DigitalInput> core::fmt::Debug for CycleObserver<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CycleObserver")
            .field("factor", &self.factor)
            .field("mode", &self.mode)
            .field("last_state", &self.last_state)
            .field("last_measurement", &self.last_measurement)
            .finish()
    }
}
