//! `From` implementations bridging `turngate_config` types to
//! `turngate_core` types.
//!
//! These keep the CLI free of field-by-field mapping.

use crate::config::{ReleaseCfg, SequenceCfg, StabilityCfg};
use crate::error::Result;
use crate::model::{ModelSegment, PredictionModel};

// ── StabilityCfg ─────────────────────────────────────────────────────────────

impl From<&turngate_config::Stability> for StabilityCfg {
    fn from(c: &turngate_config::Stability) -> Self {
        Self {
            relative_threshold: c.relative_threshold,
            suppress_rounds: c.suppress_rounds,
        }
    }
}

// ── ReleaseCfg ───────────────────────────────────────────────────────────────

impl From<&turngate_config::Release> for ReleaseCfg {
    fn from(c: &turngate_config::Release) -> Self {
        Self {
            ball_fall_time_us: c.ball_fall_time_us,
            max_turn_time_us: c.max_turn_time_us,
            max_projections: c.max_projections,
        }
    }
}

// ── SequenceCfg ──────────────────────────────────────────────────────────────

impl From<&turngate_config::Sequence> for SequenceCfg {
    fn from(c: &turngate_config::Sequence) -> Self {
        Self {
            close_settle_us: c.close_settle_us,
            prepare_us: c.prepare_us,
            release_settle_us: c.release_settle_us,
        }
    }
}

// ── PredictionModel ──────────────────────────────────────────────────────────

impl From<&turngate_config::SegmentCfg> for ModelSegment {
    fn from(c: &turngate_config::SegmentCfg) -> Self {
        Self {
            upper_us: c.upper_us,
            coeffs: c.coeffs.clone(),
        }
    }
}

/// Build a validated model from persisted segments.
pub fn model_from_config(cfg: &turngate_config::ModelCfg) -> Result<PredictionModel> {
    PredictionModel::from_segments(cfg.segments.iter().map(ModelSegment::from).collect())
}
