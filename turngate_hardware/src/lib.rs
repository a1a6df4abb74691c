pub mod error;
#[cfg(feature = "hardware")]
pub mod gpio;
#[cfg(feature = "hardware")]
pub mod servo;

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use turngate_traits::clock::{Clock, MonotonicClock};
use turngate_traits::{DigitalInput, GateActuator};

/// Simulated spinning platform.
///
/// Derives the fine and coarse sensor levels from the elapsed wall-clock
/// phase of a turntable with an adjustable period. The fine signal is high
/// during the first half of each turn; the coarse signal toggles every half
/// turn, offset by a quarter turn so its edges interleave with the fine
/// sensor's.
pub struct SimulatedTurntable {
    clock: Arc<dyn Clock + Send + Sync>,
    origin: Instant,
    period_us: Rc<Cell<u64>>,
}

impl SimulatedTurntable {
    pub fn new(period_us: u64) -> Self {
        Self::with_clock(period_us, Arc::new(MonotonicClock::new()))
    }

    pub fn with_clock(period_us: u64, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        let origin = clock.now();
        Self {
            clock,
            origin,
            period_us: Rc::new(Cell::new(period_us.max(1))),
        }
    }

    /// Change the rotation period on the fly (simulates speeding the
    /// platform up or down).
    pub fn set_period_us(&self, period_us: u64) {
        self.period_us.set(period_us.max(1));
    }

    pub fn period_us(&self) -> u64 {
        self.period_us.get()
    }

    fn phase_us(&self) -> u64 {
        let elapsed = self.clock.us_since(self.origin);
        elapsed % self.period_us.get()
    }

    /// Optical sensor view: one cycle per full turn.
    pub fn fine_pin(&self) -> SimulatedSensorPin {
        SimulatedSensorPin {
            clock: Arc::clone(&self.clock),
            origin: self.origin,
            period_us: Rc::clone(&self.period_us),
            quarter_offset: false,
        }
    }

    /// Hall sensor view: level flips every half turn.
    pub fn coarse_pin(&self) -> SimulatedSensorPin {
        SimulatedSensorPin {
            clock: Arc::clone(&self.clock),
            origin: self.origin,
            period_us: Rc::clone(&self.period_us),
            quarter_offset: true,
        }
    }

    /// Fraction of the current turn already completed, for debugging.
    pub fn phase_ratio(&self) -> f64 {
        self.phase_us() as f64 / self.period_us.get() as f64
    }
}

/// One simulated rotation sensor. Not Send: lives on the single control-loop
/// thread like every other core component.
pub struct SimulatedSensorPin {
    clock: Arc<dyn Clock + Send + Sync>,
    origin: Instant,
    period_us: Rc<Cell<u64>>,
    quarter_offset: bool,
}

impl DigitalInput for SimulatedSensorPin {
    fn read(&mut self) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let period = self.period_us.get();
        let mut elapsed = self.clock.us_since(self.origin);
        if self.quarter_offset {
            elapsed += period / 4;
        }
        let phase = elapsed % period;
        Ok(phase < period / 2)
    }
}

/// Simulated operator trigger; flip it from test or CLI code.
#[derive(Clone)]
pub struct SimulatedTrigger {
    level: Rc<Cell<bool>>,
}

impl SimulatedTrigger {
    pub fn new(level: bool) -> Self {
        Self {
            level: Rc::new(Cell::new(level)),
        }
    }

    pub fn set(&self, level: bool) {
        self.level.set(level);
    }
}

impl DigitalInput for SimulatedTrigger {
    fn read(&mut self) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.level.get())
    }
}

/// Simulated gate actuator: prints each command and counts releases.
#[derive(Default)]
pub struct SimulatedGate {
    pub closes: u32,
    pub prepares: u32,
    pub releases: u32,
}

impl SimulatedGate {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GateActuator for SimulatedGate {
    fn close_for_next_ball(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.closes += 1;
        println!("Gate closed for next ball (simulated)");
        Ok(())
    }
    fn prepare_release(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.prepares += 1;
        println!("Gate prepared for release (simulated)");
        Ok(())
    }
    fn release(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.releases += 1;
        println!("Ball released (simulated)");
        Ok(())
    }
}
