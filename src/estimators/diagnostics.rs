// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use tracing::warn;

use crate::estimators::approaches::dimension::scaling::ScalingPair;
use crate::estimators::error::CorrSumError;

/// A series index whose estimate was dropped for lack of eligible neighbours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkippedPoint {
    pub index: usize,
    pub required: usize,
    pub available: usize,
}

/// Non-fatal findings of one analysis run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    /// Points skipped by the prediction and smoothing modes, in index order
    pub skipped: Vec<SkippedPoint>,
    /// Region chosen by the automatic scaling search
    pub scaling: Option<ScalingPair>,
    /// Correlation-integral samples without any pair below their radius
    pub undefined_samples: usize,
}

impl Diagnostics {
    pub fn insufficient_neighbors(&self) -> usize {
        self.skipped.len()
    }

    pub fn skipped_indices(&self) -> Vec<usize> {
        self.skipped.iter().map(|s| s.index).collect()
    }

    pub fn scaling_converged(&self) -> Option<bool> {
        self.scaling.map(|s| s.converged)
    }

    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.undefined_samples == 0 && self.scaling_converged() != Some(false)
    }

    /// Recoverable errors behind the recorded findings.
    pub fn warnings(&self) -> Vec<CorrSumError> {
        let mut out: Vec<CorrSumError> = self
            .skipped
            .iter()
            .map(|s| CorrSumError::InsufficientNeighbors { anchor: s.index, required: s.required, available: s.available })
            .collect();
        out.extend(self.scaling.and_then(|s| s.warning()));
        out
    }

    pub(crate) fn report(&self) {
        if !self.skipped.is_empty() {
            warn!(count = self.skipped.len(), "points skipped for insufficient neighbours");
        }
        if self.undefined_samples > 0 {
            warn!(count = self.undefined_samples, "correlation integral undefined at some radii");
        }
    }
}
