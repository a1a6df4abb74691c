//! PWM servo driving the release mechanism (Raspberry Pi).

use std::time::Duration;

use tracing::debug;
use turngate_traits::GateActuator;

use crate::error::{HwError, Result};

/// Standard hobby-servo frame: 50 Hz.
const FRAME: Duration = Duration::from_millis(20);

/// Pulse widths for the three mechanical positions, mapped from the
/// reference servo angles 0° / 17° / 30° on a 544–2400 µs throw.
const CLOSED_PULSE: Duration = Duration::from_micros(544);
const PREPARE_PULSE: Duration = Duration::from_micros(719);
const RELEASE_PULSE: Duration = Duration::from_micros(853);

/// Gate servo on a hardware PWM channel.
pub struct ServoGate {
    pwm: rppal::pwm::Pwm,
}

impl ServoGate {
    /// Open PWM channel 0 or 1 and park the gate closed.
    pub fn new(channel: u8) -> Result<Self> {
        let channel = match channel {
            0 => rppal::pwm::Channel::Pwm0,
            1 => rppal::pwm::Channel::Pwm1,
            other => return Err(HwError::Pwm(format!("invalid PWM channel {other}"))),
        };
        let pwm = rppal::pwm::Pwm::with_period(
            channel,
            FRAME,
            CLOSED_PULSE,
            rppal::pwm::Polarity::Normal,
            true,
        )
        .map_err(|e| HwError::Pwm(e.to_string()))?;
        Ok(Self { pwm })
    }

    fn set_pulse(&mut self, pulse: Duration) -> Result<()> {
        self.pwm
            .set_pulse_width(pulse)
            .map_err(|e| HwError::Pwm(e.to_string()))?;
        debug!(pulse_us = pulse.as_micros() as u64, "servo pulse set");
        Ok(())
    }
}

impl GateActuator for ServoGate {
    fn close_for_next_ball(
        &mut self,
    ) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.set_pulse(CLOSED_PULSE)?;
        Ok(())
    }
    fn prepare_release(
        &mut self,
    ) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.set_pulse(PREPARE_PULSE)?;
        Ok(())
    }
    fn release(&mut self) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.set_pulse(RELEASE_PULSE)?;
        Ok(())
    }
}
