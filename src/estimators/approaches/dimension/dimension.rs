// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Correlation dimension
//!
//! The correlation integral of an embedded point set is
//!
//! C(r) = #{(i, j) eligible : |y_i - y_j| < r} / #{(i, j) eligible}
//!
//! where eligible pairs are unordered pairs that survive temporal exclusion. For a
//! set with correlation dimension D, C(r) ~ r^D over a scaling region, so D is the
//! slope of log C(r) against log r.
//!
//! Each radius gives one [`ScalingSample`]. A radius below which no pair falls has no
//! logarithm; the sample keeps `log_correlation = None` and is left out of the fit.
//! The slope is fitted by ordinary least squares over the defined samples and needs at
//! least two of them at distinct radii.

use ndarray::Array1;
use tracing::debug;

use super::scaling::{ScalingPair, ScalingRegionFinder};
use crate::estimators::approaches::common_nd::neighbors::NeighborSearch;
use crate::estimators::approaches::common_nd::series::TimeSeries;
use crate::estimators::diagnostics::Diagnostics;
use crate::estimators::error::{CorrSumError, Result};
use crate::estimators::traits::GlobalValue;
use crate::estimators::utils::regression::least_squares_fit;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalingSample {
    pub radius: f64,
    pub log_radius: f64,
    pub pair_count: u64,
    pub correlation_sum: f64,
    /// `ln C(r)`, `None` when no pair lies below `r`
    pub log_correlation: Option<f64>,
}

impl ScalingSample {
    pub fn new(radius: f64, pair_count: u64, eligible_pairs: u64) -> Self {
        let correlation_sum = pair_count as f64 / eligible_pairs as f64;
        let log_correlation = (pair_count > 0).then(|| correlation_sum.ln());
        Self { radius, log_radius: radius.ln(), pair_count, correlation_sum, log_correlation }
    }

    pub fn is_defined(&self) -> bool {
        self.log_correlation.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DimensionResult {
    pub samples: Vec<ScalingSample>,
    /// Least-squares slope of ln C(r) against ln r
    pub slope: Option<f64>,
    pub eligible_pairs: u64,
    pub scaling: Option<ScalingPair>,
}

impl DimensionResult {
    pub fn log_radii(&self) -> Array1<f64> {
        self.samples.iter().map(|s| s.log_radius).collect()
    }

    /// Parallel to [`log_radii`](Self::log_radii); `None` marks an undefined sample.
    pub fn log_correlation_sums(&self) -> Vec<Option<f64>> {
        self.samples.iter().map(|s| s.log_correlation).collect()
    }

    pub fn correlation_sums(&self) -> Array1<f64> {
        self.samples.iter().map(|s| s.correlation_sum).collect()
    }

    pub fn correlation_dimension(&self) -> Option<f64> {
        self.slope
    }
}

impl GlobalValue for DimensionResult {
    fn global_value(&self) -> Option<f64> {
        self.slope
    }
}

/// Log-spaced radii from `r_min` to `r_max` inclusive.
pub fn geometric_thresholds(r_min: f64, r_max: f64, count: usize) -> Result<Vec<f64>> {
    if !(r_min.is_finite() && r_max.is_finite() && r_min > 0.0 && r_max >= r_min) {
        return Err(CorrSumError::invalid(format!(
            "threshold range must satisfy 0 < r_min <= r_max, got [{r_min}, {r_max}]"
        )));
    }
    match count {
        0 => Ok(Vec::new()),
        1 => Ok(vec![r_min]),
        _ => {
            let (a, b) = (r_min.ln(), r_max.ln());
            let step = (b - a) / (count - 1) as f64;
            Ok((0..count)
                .map(|k| match k {
                    0 => r_min,
                    k if k == count - 1 => r_max,
                    k => (a + step * k as f64).exp(),
                })
                .collect())
        }
    }
}

pub struct DimensionEstimator {
    thresholds: Vec<f64>,
    find_scaling: bool,
    finder: ScalingRegionFinder,
}

impl DimensionEstimator {
    pub fn new(thresholds: Vec<f64>) -> Self {
        Self { thresholds, find_scaling: false, finder: ScalingRegionFinder::default() }
    }

    pub fn with_scaling_search(finder: ScalingRegionFinder) -> Self {
        Self { thresholds: Vec::new(), find_scaling: true, finder }
    }

    pub fn estimate(
        &self,
        series: &TimeSeries,
        search: &NeighborSearch<'_>,
        diagnostics: &mut Diagnostics,
    ) -> Result<DimensionResult> {
        let eligible_pairs = search.eligible_pair_count();
        if eligible_pairs == 0 {
            return Err(CorrSumError::NoEligiblePairs {
                points: search.points().len(),
                min_separation: search.min_separation(),
            });
        }

        let (radii, scaling) = if self.find_scaling {
            let pair = self.finder.find(series, search)?;
            diagnostics.scaling = Some(pair);
            (vec![pair.lower, pair.upper], Some(pair))
        } else {
            if self.thresholds.is_empty() {
                return Err(CorrSumError::invalid("dimension mode needs at least one distance threshold"));
            }
            (self.thresholds.clone(), None)
        };

        let counts = search.pair_counts(&radii)?;
        let samples: Vec<ScalingSample> = radii
            .iter()
            .zip(counts)
            .map(|(&r, c)| ScalingSample::new(r, c, eligible_pairs))
            .collect();
        diagnostics.undefined_samples += samples.iter().filter(|s| !s.is_defined()).count();

        let (x, y): (Vec<f64>, Vec<f64>) = samples
            .iter()
            .filter_map(|s| s.log_correlation.map(|lc| (s.log_radius, lc)))
            .unzip();
        let slope = least_squares_fit(&x, &y).map(|fit| fit.slope);
        debug!(samples = samples.len(), defined = x.len(), ?slope, "correlation integral evaluated");

        Ok(DimensionResult { samples, slope, eligible_pairs, scaling })
    }
}
