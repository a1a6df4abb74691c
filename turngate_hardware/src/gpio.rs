//! rppal-backed digital inputs (Raspberry Pi).

use tracing::trace;
use turngate_traits::DigitalInput;

use crate::error::{HwError, Result};

/// A GPIO input line read once per control-loop tick.
pub struct GpioInput {
    pin: rppal::gpio::InputPin,
    active_low: bool,
}

impl GpioInput {
    /// Open a BCM pin as a pulled-up input. `active_low` inverts the level,
    /// matching switches that short to ground when closed.
    pub fn new(bcm_pin: u8, active_low: bool) -> Result<Self> {
        let gpio = rppal::gpio::Gpio::new().map_err(|e| HwError::Gpio(e.to_string()))?;
        let pin = gpio
            .get(bcm_pin)
            .map_err(|e| HwError::Gpio(e.to_string()))?
            .into_input_pullup();
        Ok(Self { pin, active_low })
    }
}

impl DigitalInput for GpioInput {
    fn read(&mut self) -> std::result::Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let level = self.pin.is_high() != self.active_low;
        trace!(pin = self.pin.pin(), level, "gpio sample");
        Ok(level)
    }
}
