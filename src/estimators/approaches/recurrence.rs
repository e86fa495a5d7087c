// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use ndarray::Array1;
use tracing::debug;

use crate::estimators::approaches::common_nd::neighbors::{NeighborSearch, SelectionPolicy};
use crate::estimators::error::Result;

/// Recurrent pairs: base indices `(i, j)`, `i < j`, whose embedded states lie closer
/// than the threshold, ordered by `(i, j)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceResult {
    pub pairs: Vec<(usize, usize)>,
}

impl RecurrenceResult {
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn first_indices(&self) -> Array1<usize> {
        self.pairs.iter().map(|&(i, _)| i).collect()
    }

    pub fn second_indices(&self) -> Array1<usize> {
        self.pairs.iter().map(|&(_, j)| j).collect()
    }

    /// Recurrence rate: found pairs over eligible pairs.
    pub fn rate(&self, eligible_pairs: u64) -> Option<f64> {
        (eligible_pairs > 0).then(|| self.pairs.len() as f64 / eligible_pairs as f64)
    }
}

pub struct RecurrenceEstimator {
    distance_threshold: f64,
}

impl RecurrenceEstimator {
    pub fn new(distance_threshold: f64) -> Self {
        Self { distance_threshold }
    }

    pub fn estimate(&self, search: &NeighborSearch<'_>) -> Result<RecurrenceResult> {
        SelectionPolicy::Threshold(self.distance_threshold).validate()?;
        let pairs = search.forward_pairs(self.distance_threshold)?;
        debug!(pairs = pairs.len(), threshold = self.distance_threshold, "recurrence pairs collected");
        Ok(RecurrenceResult { pairs })
    }
}
