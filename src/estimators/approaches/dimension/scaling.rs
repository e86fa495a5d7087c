// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use tracing::{debug, trace, warn};

use crate::estimators::approaches::common_nd::neighbors::NeighborSearch;
use crate::estimators::approaches::common_nd::series::TimeSeries;
use crate::estimators::error::{CorrSumError, Result};

pub const DEFAULT_TARGET_RATIO: f64 = 5.0;
pub const DEFAULT_TOLERANCE: f64 = 0.05;
pub const DEFAULT_MAX_ITERATIONS: usize = 60;

/// Two radii bounding a scaling region, `lower < upper`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalingPair {
    pub lower: f64,
    pub upper: f64,
    /// Achieved `C(upper) / C(lower)`; `None` when no lower radius had any pair
    pub ratio: Option<f64>,
    pub converged: bool,
    pub iterations: usize,
}

impl ScalingPair {
    /// The non-convergence as a reportable error, if the search did not converge.
    pub fn warning(&self) -> Option<CorrSumError> {
        (!self.converged).then_some(CorrSumError::ScalingSearchDidNotConverge {
            iterations: self.iterations,
            ratio: self.ratio,
            lower: self.lower,
        })
    }
}

/// Automatic scaling region for the correlation-dimension fit.
///
/// The upper radius is a quarter of the series' sample standard deviation. The lower
/// radius is found by bisection on `(0, upper)` so that `C(upper) / C(lower)` hits the
/// target ratio within a relative tolerance. Since `C` is a non-decreasing step
/// function the exact ratio may be unreachable; after the iteration budget the lower
/// radius with the closest ratio is kept and the pair is marked as not converged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalingRegionFinder {
    pub target_ratio: f64,
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for ScalingRegionFinder {
    fn default() -> Self {
        Self {
            target_ratio: DEFAULT_TARGET_RATIO,
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl ScalingRegionFinder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_target_ratio(mut self, ratio: f64) -> Self {
        self.target_ratio = ratio;
        self
    }

    /// Relative tolerance on the ratio, e.g. `0.05` for 5 %.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    fn validate(&self) -> Result<()> {
        if !(self.target_ratio.is_finite() && self.target_ratio > 1.0) {
            return Err(CorrSumError::invalid("scaling target ratio must be finite and above 1"));
        }
        if !(self.tolerance.is_finite() && self.tolerance >= 0.0) {
            return Err(CorrSumError::invalid("scaling tolerance must be finite and non-negative"));
        }
        if self.max_iterations == 0 {
            return Err(CorrSumError::invalid("scaling search needs at least one iteration"));
        }
        Ok(())
    }

    pub fn upper_radius(series: &TimeSeries) -> f64 {
        series.std_dev() / 4.0
    }

    pub fn find(&self, series: &TimeSeries, search: &NeighborSearch<'_>) -> Result<ScalingPair> {
        self.validate()?;
        let upper = Self::upper_radius(series);
        if !(upper.is_finite() && upper > 0.0) {
            return Err(CorrSumError::invalid(
                "automatic scaling needs a series with non-zero standard deviation",
            ));
        }

        let c_upper = search.pair_count(upper)?;
        if c_upper == 0 {
            warn!(upper, "no pairs below the upper scaling radius");
            return Ok(ScalingPair { lower: upper / self.target_ratio, upper, ratio: None, converged: false, iterations: 0 });
        }

        let mut lo = 0.0f64;
        let mut hi = upper;
        let mut best: Option<(f64, f64)> = None; // (radius, ratio)
        let mut iterations = 0;

        while iterations < self.max_iterations {
            iterations += 1;
            let mid = 0.5 * (lo + hi);
            if !(mid > lo && mid < hi) {
                break;
            }
            let c_mid = search.pair_count(mid)?;
            if c_mid == 0 {
                trace!(iteration = iterations, radius = mid, "empty lower radius");
                lo = mid;
                continue;
            }
            let ratio = c_upper as f64 / c_mid as f64;
            trace!(iteration = iterations, radius = mid, ratio, "scaling bisection step");

            let closer = best.is_none_or(|(_, b)| (ratio - self.target_ratio).abs() < (b - self.target_ratio).abs());
            if closer {
                best = Some((mid, ratio));
            }
            if (ratio - self.target_ratio).abs() <= self.tolerance * self.target_ratio {
                debug!(lower = mid, upper, ratio, iterations, "scaling region found");
                return Ok(ScalingPair { lower: mid, upper, ratio: Some(ratio), converged: true, iterations });
            }
            if ratio > self.target_ratio {
                lo = mid;
            } else {
                hi = mid;
            }
        }

        let (lower, ratio) = match best {
            Some((r, q)) => (r, Some(q)),
            None => (lo, None),
        };
        let pair = ScalingPair { lower, upper, ratio, converged: false, iterations };
        warn!(lower, upper, ?ratio, iterations, "scaling search did not converge, using closest radius");
        Ok(pair)
    }
}
