// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use ndarray::{Array1, ArrayView1};

use crate::estimators::error::{CorrSumError, Result};

/// Scalar time series: finite samples in time order, at least one sample.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    values: Vec<f64>,
}

impl TimeSeries {
    pub fn new(values: Vec<f64>) -> Result<Self> {
        if values.is_empty() {
            return Err(CorrSumError::InsufficientLength { len: 0, required: 1 });
        }
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(CorrSumError::NonFiniteSample { index });
        }
        Ok(Self { values })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn view(&self) -> ArrayView1<'_, f64> {
        ArrayView1::from(self.values.as_slice())
    }

    pub fn mean(&self) -> f64 {
        self.view().mean().unwrap_or(0.0)
    }

    /// Sample standard deviation (ddof = 1); zero for a single sample.
    pub fn std_dev(&self) -> f64 {
        if self.values.len() < 2 {
            return 0.0;
        }
        self.view().std(1.0)
    }
}

impl TryFrom<Vec<f64>> for TimeSeries {
    type Error = CorrSumError;

    fn try_from(values: Vec<f64>) -> Result<Self> {
        Self::new(values)
    }
}

impl TryFrom<&[f64]> for TimeSeries {
    type Error = CorrSumError;

    fn try_from(values: &[f64]) -> Result<Self> {
        Self::new(values.to_vec())
    }
}

impl TryFrom<Array1<f64>> for TimeSeries {
    type Error = CorrSumError;

    fn try_from(values: Array1<f64>) -> Result<Self> {
        Self::new(values.iter().copied().collect())
    }
}

impl TryFrom<ArrayView1<'_, f64>> for TimeSeries {
    type Error = CorrSumError;

    fn try_from(values: ArrayView1<'_, f64>) -> Result<Self> {
        Self::new(values.iter().copied().collect())
    }
}
