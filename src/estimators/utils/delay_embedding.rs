// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use tracing::debug;

use crate::estimators::approaches::common_nd::dataset::EmbeddedPointSet;
use crate::estimators::approaches::common_nd::series::TimeSeries;
use crate::estimators::error::{CorrSumError, Result};

/// Builds time-delay vectors `(x_i, x_{i+s}, ..., x_{i+(d-1)s})` for every base
/// index `i` in `[0, N - W]`, with window length `W = (d-1)s + 1`.
///
/// The time lag of an analysis does not enter here; it only controls which
/// vectors may be neighbours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbeddingBuilder {
    embedded_dim: usize,
    time_step: usize,
    window_length: usize,
}

impl EmbeddingBuilder {
    pub fn new(embedded_dim: usize, time_step: usize) -> Result<Self> {
        if embedded_dim < 1 {
            return Err(CorrSumError::invalid("embedding dimension must be a positive integer"));
        }
        if time_step < 1 {
            return Err(CorrSumError::invalid("time step must be a positive integer"));
        }
        let window_length = (embedded_dim - 1)
            .checked_mul(time_step)
            .and_then(|span| span.checked_add(1))
            .ok_or_else(|| CorrSumError::invalid("embedding window length overflows"))?;
        Ok(Self { embedded_dim, time_step, window_length })
    }

    pub fn embedded_dim(&self) -> usize {
        self.embedded_dim
    }

    pub fn time_step(&self) -> usize {
        self.time_step
    }

    pub fn window_length(&self) -> usize {
        self.window_length
    }

    /// Number of vectors a series of length `len` yields, if any.
    pub fn point_count(&self, len: usize) -> Option<usize> {
        (len >= self.window_length).then(|| len - self.window_length + 1)
    }

    pub fn build(&self, series: &TimeSeries) -> Result<EmbeddedPointSet> {
        let x = series.as_slice();
        let n_points = self.point_count(x.len()).ok_or(CorrSumError::InsufficientLength {
            len: x.len(),
            required: self.window_length,
        })?;

        let mut coords = Vec::with_capacity(n_points * self.embedded_dim);
        for i in 0..n_points {
            for k in 0..self.embedded_dim {
                coords.push(x[i + k * self.time_step]);
            }
        }
        debug!(points = n_points, dim = self.embedded_dim, time_step = self.time_step, "built delay embedding");
        Ok(EmbeddedPointSet::from_coords(coords, self.embedded_dim, self.time_step))
    }
}
