//! Piecewise polynomial projection of the next turn duration.
//!
//! The relationship between consecutive turn durations was curve-fitted
//! separately per speed range; which polynomial applies is selected purely by
//! the interval the input duration falls in. The coefficients are calibration
//! data and always injected; `reference()` carries the shipped calibration.

use crate::error::{BuildError, Result};

/// One regression segment: a closed-open input interval and a polynomial in
/// ascending powers of the input.
#[derive(Debug, Clone)]
pub struct ModelSegment {
    /// Exclusive upper bound on the input duration (µs). `None` on the last
    /// segment, which is unbounded above.
    pub upper_us: Option<u64>,
    /// 1..=5 coefficients, ascending powers.
    pub coeffs: Vec<f64>,
}

/// Immutable, configuration-loaded prediction model mapping "previous turn
/// duration" to "predicted next turn duration".
#[derive(Debug, Clone)]
pub struct PredictionModel {
    segments: Vec<ModelSegment>,
}

impl PredictionModel {
    /// Build a model from segments, enforcing the ordering rules the
    /// projection relies on: non-empty, strictly ascending bounds, exactly
    /// the last segment unbounded, 1..=5 finite coefficients per segment.
    pub fn from_segments(segments: Vec<ModelSegment>) -> Result<Self> {
        if segments.is_empty() {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "model needs at least one segment",
            )));
        }
        let mut prev_bound: Option<u64> = None;
        for (i, seg) in segments.iter().enumerate() {
            let last = i == segments.len() - 1;
            match seg.upper_us {
                None if !last => {
                    return Err(eyre::Report::new(BuildError::InvalidConfig(
                        "only the last model segment may be unbounded",
                    )));
                }
                Some(_) if last => {
                    return Err(eyre::Report::new(BuildError::InvalidConfig(
                        "the last model segment must be unbounded",
                    )));
                }
                Some(b) => {
                    if b == 0 || prev_bound.is_some_and(|p| b <= p) {
                        return Err(eyre::Report::new(BuildError::InvalidConfig(
                            "model segment bounds must be positive and strictly ascending",
                        )));
                    }
                    prev_bound = Some(b);
                }
                None => {}
            }
            if seg.coeffs.is_empty() || seg.coeffs.len() > 5 {
                return Err(eyre::Report::new(BuildError::InvalidConfig(
                    "model segments need 1..=5 coefficients",
                )));
            }
            if seg.coeffs.iter().any(|c| !c.is_finite()) {
                return Err(eyre::Report::new(BuildError::InvalidConfig(
                    "model coefficients must be finite",
                )));
            }
        }
        Ok(Self { segments })
    }

    /// The shipped calibration: three segments fitted at low, medium and
    /// high platform speed (quadratic, quadratic, quartic).
    pub fn reference() -> Self {
        Self {
            segments: vec![
                ModelSegment {
                    upper_us: Some(500_000),
                    coeffs: vec![268.2445651096, 0.998685885, 7.73699143114947e-9],
                },
                ModelSegment {
                    upper_us: Some(2_000_000),
                    coeffs: vec![2585.5449062138, 0.9910487474, 1.28978803947511e-8],
                },
                ModelSegment {
                    upper_us: None,
                    coeffs: vec![
                        343733.782110879,
                        0.5422132849,
                        2.19266935692185e-7,
                        -3.96812534603555e-14,
                        3.10525846921924e-21,
                    ],
                },
            ],
        }
    }

    /// Project the duration of the next turn from the last one (µs).
    ///
    /// Evaluated in f64 and truncated to u64, matching the reference's
    /// double → unsigned long conversion; negative outputs clamp to 0.
    pub fn project(&self, last_turn_us: u64) -> u64 {
        let Some(seg) = self.segments.iter().find(|s| match s.upper_us {
            Some(bound) => last_turn_us < bound,
            None => true,
        }) else {
            // Unreachable: from_segments guarantees an unbounded tail.
            return last_turn_us;
        };
        let x = last_turn_us as f64;
        let mut y = 0.0f64;
        for &c in seg.coeffs.iter().rev() {
            y = y * x + c;
        }
        if y <= 0.0 {
            0
        } else if y >= u64::MAX as f64 {
            u64::MAX
        } else {
            y as u64
        }
    }
}

impl Default for PredictionModel {
    fn default() -> Self {
        Self::reference()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_selection_by_interval() {
        let model = PredictionModel::reference();
        // Low-speed segment: y ≈ a0 + a1*x at small x.
        let y = model.project(100_000);
        assert!((100_000..110_000).contains(&y), "low segment: {y}");
        // Medium segment applies from 500ms up.
        let y = model.project(1_000_000);
        assert!((990_000..1_010_000).contains(&y), "medium segment: {y}");
        // Unbounded tail.
        let y = model.project(3_000_000);
        assert!(y > 2_000_000, "high segment: {y}");
    }

    #[test]
    fn rejects_unordered_bounds() {
        let segs = vec![
            ModelSegment {
                upper_us: Some(2_000),
                coeffs: vec![0.0, 1.0],
            },
            ModelSegment {
                upper_us: Some(1_000),
                coeffs: vec![0.0, 1.0],
            },
            ModelSegment {
                upper_us: None,
                coeffs: vec![0.0, 1.0],
            },
        ];
        assert!(PredictionModel::from_segments(segs).is_err());
    }

    #[test]
    fn rejects_bounded_tail() {
        let segs = vec![ModelSegment {
            upper_us: Some(1_000),
            coeffs: vec![0.0, 1.0],
        }];
        assert!(PredictionModel::from_segments(segs).is_err());
    }

    #[test]
    fn negative_projection_clamps_to_zero() {
        let segs = vec![ModelSegment {
            upper_us: None,
            coeffs: vec![-10.0],
        }];
        let model = PredictionModel::from_segments(segs).unwrap();
        assert_eq!(model.project(1_000), 0);
    }
}
