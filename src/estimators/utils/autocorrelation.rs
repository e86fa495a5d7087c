// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use ndarray::Array1;
use tracing::debug;

use crate::estimators::approaches::common_nd::series::TimeSeries;
use crate::estimators::error::{CorrSumError, Result};

/// Sample autocorrelation `R(k)` for `k = 0..=max_lag` (biased normalisation,
/// `R(0) = 1`). `None` for a series without variance.
///
/// `max_lag` is clamped to `N - 1`.
pub fn autocorrelation(series: &TimeSeries, max_lag: usize) -> Option<Array1<f64>> {
    let (centered, denom) = center(series)?;
    let max_lag = max_lag.min(centered.len() - 1);
    Some(Array1::from_iter((0..=max_lag).map(|k| lagged_product(&centered, k) / denom)))
}

/// Mean-removed samples and their sum of squares, `None` without variance.
fn center(series: &TimeSeries) -> Option<(Vec<f64>, f64)> {
    let m = series.mean();
    let centered: Vec<f64> = series.as_slice().iter().map(|v| v - m).collect();
    let denom: f64 = centered.iter().map(|v| v * v).sum();
    (denom > 0.0).then_some((centered, denom))
}

fn lagged_product(centered: &[f64], k: usize) -> f64 {
    centered[..centered.len() - k]
        .iter()
        .zip(&centered[k..])
        .map(|(a, b)| a * b)
        .sum()
}

/// Picks the time lag as the first zero crossing of the autocorrelation: the
/// smallest integer `k >= 1` with `R(k) <= 0`. No interpolation between lags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AutocorrelationLagEstimator {
    max_lag: Option<usize>,
}

impl AutocorrelationLagEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop searching after `max_lag` lags instead of `N - 1`.
    pub fn with_max_lag(mut self, max_lag: usize) -> Self {
        self.max_lag = Some(max_lag);
        self
    }

    pub fn estimate(&self, series: &TimeSeries) -> Result<usize> {
        let n = series.len();
        let max_lag = self.max_lag.map_or(n - 1, |m| m.min(n - 1));

        let (centered, denom) = center(series).ok_or(CorrSumError::NoZeroCrossing { max_lag })?;

        for k in 1..=max_lag {
            if lagged_product(&centered, k) / denom <= 0.0 {
                debug!(lag = k, "autocorrelation zero crossing");
                return Ok(k);
            }
        }
        Err(CorrSumError::NoZeroCrossing { max_lag })
    }
}
