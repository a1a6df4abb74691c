use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum CoreError {
    #[error("hardware error: {0}")]
    Hardware(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("invalid state: {0}")]
    State(String),
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("missing fine sensor pin")]
    MissingFinePin,
    #[error("missing coarse sensor pin")]
    MissingCoarsePin,
    #[error("missing trigger pin")]
    MissingTriggerPin,
    #[error("missing gate actuator")]
    MissingActuator,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

/// Reasons a release-time prediction is unavailable. Non-fatal: the state
/// machine stays armed and retries on a later tick.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PredictError {
    #[error("turn time {turn_us}us exceeds sanity bound {bound_us}us")]
    TurnTooSlow { turn_us: u64, bound_us: u64 },
    #[error("projection did not cover the fall time within {cap} iterations")]
    NoConvergence { cap: u32 },
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
