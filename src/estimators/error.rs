// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error type shared by every stage of an analysis run.
//!
//! Configuration and geometry errors are raised before any distance is computed.
//! `InsufficientNeighbors` and `ScalingSearchDidNotConverge` are never returned
//! from a whole run; they are collected in [`Diagnostics`](crate::estimators::diagnostics::Diagnostics)
//! and the run continues with whatever could be estimated.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CorrSumError>;

#[derive(Debug, Error)]
pub enum CorrSumError {
    /// Unknown mode string, non-positive geometry, or a parameter missing for the selected mode.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The series cannot hold a single embedding window.
    #[error("Insufficient length: series has {len} samples, embedding window needs {required}")]
    InsufficientLength {
        /// Number of samples in the series
        len: usize,
        /// Samples spanned by one embedding vector
        required: usize,
    },

    /// A query point has fewer eligible neighbours than the mode requires.
    #[error("Insufficient neighbours for point {anchor}: required {required}, available {available}")]
    InsufficientNeighbors {
        anchor: usize,
        required: usize,
        available: usize,
    },

    /// The autocorrelation never became non-positive.
    #[error("Autocorrelation has no zero crossing within {max_lag} lags; supply an explicit time lag")]
    NoZeroCrossing { max_lag: usize },

    /// Bisection over the lower scaling radius ran out of iterations.
    #[error("Scaling search did not converge after {iterations} iterations (ratio {ratio:?} at radius {lower})")]
    ScalingSearchDidNotConverge {
        iterations: usize,
        /// Best achieved C(upper)/C(lower), if any lower radius had pairs
        ratio: Option<f64>,
        lower: f64,
    },

    /// Temporal exclusion leaves no pair of points to compare.
    #[error("No eligible pairs among {points} points with minimum separation {min_separation}")]
    NoEligiblePairs { points: usize, min_separation: usize },

    #[error("Sample {index} is not finite")]
    NonFiniteSample { index: usize },

    #[error("Analysis cancelled")]
    Cancelled,

    #[cfg(feature = "parallel")]
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl CorrSumError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }

    /// Whether the error only affects a single point or search and the run carries on.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InsufficientNeighbors { .. } | Self::ScalingSearchDidNotConverge { .. }
        )
    }
}
