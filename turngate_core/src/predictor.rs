//! Iterative time-to-release prediction.
//!
//! Given the most recent fully measured turn and the time already spent in
//! the current turn, projects forward through predicted turn durations until
//! the accumulated time covers the mechanical ball-fall time, then returns
//! the remaining wait. The ball released after exactly that wait falls
//! through the hole on its next pass under the gate.

use crate::config::ReleaseCfg;
use crate::error::PredictError;
use crate::model::PredictionModel;

#[derive(Debug, Clone)]
pub struct ReleasePredictor {
    model: PredictionModel,
    cfg: ReleaseCfg,
}

impl ReleasePredictor {
    pub fn new(model: PredictionModel, cfg: ReleaseCfg) -> Self {
        Self { model, cfg }
    }

    pub fn model(&self) -> &PredictionModel {
        &self.model
    }

    /// Compute the wait in µs from now until the release command.
    ///
    /// `last_turn_us` is the duration of the last fully completed turn;
    /// `time_in_round_us` is the elapsed time since the start of the
    /// current, still-incomplete turn.
    ///
    /// The loop may project several turns ahead when the platform spins
    /// faster than the ball falls. Each projection of a physically valid
    /// model is bounded below by a positive constant, so the accumulator
    /// strictly increases; `max_projections` still caps the loop against a
    /// malformed model.
    pub fn time_to_release(
        &self,
        last_turn_us: u64,
        time_in_round_us: u64,
    ) -> Result<u64, PredictError> {
        if last_turn_us > self.cfg.max_turn_time_us {
            return Err(PredictError::TurnTooSlow {
                turn_us: last_turn_us,
                bound_us: self.cfg.max_turn_time_us,
            });
        }

        let fall_time = i128::from(self.cfg.ball_fall_time_us);
        let mut acc = -i128::from(time_in_round_us);
        let mut turn_us = last_turn_us;
        for _ in 0..self.cfg.max_projections {
            turn_us = self.model.project(turn_us);
            acc += i128::from(turn_us);
            if acc >= fall_time {
                let wait = u64::try_from(acc - fall_time).unwrap_or(u64::MAX);
                tracing::trace!(
                    last_turn_us,
                    time_in_round_us,
                    wait_us = wait,
                    "release time computed"
                );
                return Ok(wait);
            }
        }
        Err(PredictError::NoConvergence {
            cap: self.cfg.max_projections,
        })
    }
}
