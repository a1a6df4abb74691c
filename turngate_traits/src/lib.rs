pub mod clock;

pub use clock::{Clock, MonotonicClock};

/// A single digital input line, sampled once per control-loop tick.
///
/// Implementations must return the instantaneous logic level; the core does
/// no debouncing (callers provide a clean signal).
pub trait DigitalInput {
    fn read(&mut self) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;
}

/// The physical ball-release mechanism.
///
/// Commands are fire-and-forget from the core's point of view: results are
/// logged but never change control flow.
pub trait GateActuator {
    /// Fully close the mechanism so the next ball can fall through.
    fn close_for_next_ball(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    /// Open the mechanism almost to the release point, so the actual release
    /// is as short as possible.
    fn prepare_release(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    /// Release the ball.
    fn release(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

impl<T: DigitalInput + ?Sized> DigitalInput for Box<T> {
    fn read(&mut self) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        (**self).read()
    }
}

impl<T: GateActuator + ?Sized> GateActuator for Box<T> {
    fn close_for_next_ball(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).close_for_next_ball()
    }
    fn prepare_release(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).prepare_release()
    }
    fn release(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).release()
    }
}
