// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Local-constant models: prediction and smoothing
//!
//! Both modes estimate a series value `x_t` from the state that precedes it. The
//! query state is the embedding vector whose window ends `horizon` samples before
//! `t`, i.e. the vector anchored at base `t - span - horizon` with
//! `span = (d-1)s`. Its `k` nearest eligible neighbours `j` vote with the values
//! they were followed by, `x_{j + span + horizon}`, and the estimate is their
//! unweighted mean.
//!
//! - **Prediction** splits the series at `half = N / 2`. Targets are the second half,
//!   candidate neighbours are the vectors whose own target lies in the first half.
//!   The default horizon of 1 predicts the sample right after the window.
//! - **Smoothing** uses horizon 0 (the last sample of the query window) and lets
//!   every other vector of the series be a candidate, so each reconstructable sample
//!   `t >= span` is replaced by an average over its state-space neighbours. Samples
//!   before `span` have no window ending at them and are reported as skipped.
//!
//! In both modes temporal exclusion applies, and a target whose query has fewer than
//! `k` eligible candidates is skipped and reported through the diagnostics.

use ndarray::Array1;
use std::ops::Range;
use tracing::debug;

use super::local_model_utils::{neighbor_average, normalized_error_variance};
use crate::estimators::approaches::common_nd::neighbors::{NeighborSearch, SelectionPolicy};
use crate::estimators::approaches::common_nd::series::TimeSeries;
use crate::estimators::diagnostics::{Diagnostics, SkippedPoint};
use crate::estimators::error::Result;
use crate::estimators::traits::{GlobalValue, LocalValues};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalModelScope {
    Prediction,
    Smoothing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocalModelResult {
    /// Series indices of the estimated samples, increasing
    pub indices: Vec<usize>,
    pub predicted: Array1<f64>,
    pub actual: Array1<f64>,
    pub normalized_error_variance: Option<f64>,
}

impl LocalModelResult {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn residuals(&self) -> Array1<f64> {
        &self.predicted - &self.actual
    }
}

impl GlobalValue for LocalModelResult {
    fn global_value(&self) -> Option<f64> {
        self.normalized_error_variance
    }
}

impl LocalValues for LocalModelResult {
    fn local_values(&self) -> Array1<f64> {
        self.predicted.clone()
    }
}

pub struct LocalModelEstimator {
    pub neighbor_size: usize,
    pub horizon: usize,
    pub scope: LocalModelScope,
}

impl LocalModelEstimator {
    pub fn prediction(neighbor_size: usize, horizon: usize) -> Self {
        Self { neighbor_size, horizon, scope: LocalModelScope::Prediction }
    }

    pub fn smoothing(neighbor_size: usize) -> Self {
        Self { neighbor_size, horizon: 0, scope: LocalModelScope::Smoothing }
    }

    /// Target series indices and the base-index range of candidate neighbours.
    fn layout(&self, n_series: usize, offset: usize) -> (Range<usize>, Range<usize>) {
        match self.scope {
            LocalModelScope::Prediction => {
                let half = n_series / 2;
                (half..n_series, 0..half.saturating_sub(offset))
            }
            LocalModelScope::Smoothing => (0..n_series, 0..n_series.saturating_sub(offset)),
        }
    }

    pub fn estimate(
        &self,
        series: &TimeSeries,
        search: &NeighborSearch<'_>,
        diagnostics: &mut Diagnostics,
    ) -> Result<LocalModelResult> {
        let policy = SelectionPolicy::Nearest(self.neighbor_size);
        policy.validate()?;

        let x = series.as_slice();
        let offset = search.points().span() + self.horizon;
        let (targets, candidates) = self.layout(x.len(), offset);

        // targets before `offset` have no query vector at all
        let first_queryable = targets.start.max(offset).min(targets.end);
        let mut skipped: Vec<SkippedPoint> = (targets.start..first_queryable)
            .map(|t| SkippedPoint { index: t, required: self.neighbor_size, available: 0 })
            .collect();

        let anchors = first_queryable.saturating_sub(offset)..targets.end.saturating_sub(offset);
        let outcome = search.search(anchors, policy, candidates)?;
        skipped.extend(outcome.skipped.iter().map(|s| SkippedPoint {
            index: s.anchor + offset,
            required: s.required,
            available: s.available,
        }));
        skipped.sort_unstable_by_key(|s| s.index);

        let mut indices = Vec::with_capacity(outcome.sets.len());
        let mut predicted = Vec::with_capacity(outcome.sets.len());
        let mut actual = Vec::with_capacity(outcome.sets.len());
        for set in &outcome.sets {
            if let Some(value) = neighbor_average(x, set.indices(), offset) {
                let t = set.anchor + offset;
                indices.push(t);
                predicted.push(value);
                actual.push(x[t]);
            }
        }
        let predicted = Array1::from(predicted);
        let actual = Array1::from(actual);
        let nev = normalized_error_variance(predicted.view(), actual.view());
        debug!(scope = ?self.scope, estimated = indices.len(), skipped = skipped.len(), ?nev, "local model evaluated");

        diagnostics.skipped.extend(skipped);
        Ok(LocalModelResult { indices, predicted, actual, normalized_error_variance: nev })
    }
}
