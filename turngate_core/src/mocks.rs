//! Test and helper mocks for turngate_core

use std::cell::Cell;
use std::rc::Rc;

use turngate_traits::{DigitalInput, GateActuator};

/// A pin stuck at a fixed level; useful when an input is irrelevant to the
/// scenario being driven.
pub struct ConstPin(pub bool);

impl DigitalInput for ConstPin {
    fn read(&mut self) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.0)
    }
}

/// A pin backed by a shared cell so the level can be flipped between ticks.
/// Single-threaded by design, like the control loop itself.
#[derive(Clone)]
pub struct SharedPin(pub Rc<Cell<bool>>);

impl SharedPin {
    pub fn new(level: bool) -> Self {
        Self(Rc::new(Cell::new(level)))
    }

    pub fn set(&self, level: bool) {
        self.0.set(level);
    }
}

impl DigitalInput for SharedPin {
    fn read(&mut self) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.0.get())
    }
}

/// An actuator that accepts every command and does nothing.
pub struct NoopGate;

impl GateActuator for NoopGate {
    fn close_for_next_ball(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Ok(())
    }
    fn prepare_release(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Ok(())
    }
    fn release(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Ok(())
    }
}
