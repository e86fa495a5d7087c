// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # corrsum
//!
//! Correlation-integral analysis of scalar time series: time-delay embedding,
//! neighbour search with temporal exclusion, and four estimation modes built on the
//! pairwise distances between embedded states.
//!
//! ## Quick Start
//!
//! ```rust
//! use corrsum::estimators::{analyze, AnalysisConfig, EstimationMode, GlobalValue};
//! use corrsum::estimators::approaches::TimeSeries;
//!
//! let pattern = [0.0, 1.0, 3.0, 2.0, 5.0, 4.0];
//! let values: Vec<f64> = pattern.iter().copied().cycle().take(48).collect();
//! let series = TimeSeries::new(values).unwrap();
//!
//! // Predict the second half from nearest neighbours in the first half
//! let config = AnalysisConfig::new(EstimationMode::prediction(1)).with_time_lag(6);
//! let analysis = analyze(&series, config).unwrap();
//! assert_eq!(analysis.global_value(), Some(0.0));
//! ```
//!
//! ## Estimation Modes
//!
//! | Mode | Neighbour policy | Output | Scalar |
//! |------|------------------|--------|--------|
//! | Recurrence | threshold | recurrent index pairs | none |
//! | Dimension | threshold | `(ln r, ln C(r))` samples | correlation dimension |
//! | Prediction | k nearest | predicted second half | normalised error variance |
//! | Smoothing | k nearest | smoothed series | normalised error variance |
//!
//! ## Architecture
//!
//! 1. **Engine**: [`EstimationEngine`](estimators::EstimationEngine) validates an
//!    [`AnalysisConfig`](estimators::AnalysisConfig), embeds the series and
//!    dispatches on the mode
//! 2. **Estimation Approaches**: recurrence, dimension (with scaling-region search)
//!    and the local-model strategies under `estimators::approaches`
//! 3. **Core Infrastructure**: the embedded point set and the neighbour search with
//!    brute-force and KD-tree backends under `approaches::common_nd`
//! 4. **Utilities**: delay embedding, autocorrelation lag estimation, line fitting
//!
//! ## Feature Flags
//!
//! - `parallel` (default): distribute per-anchor work with rayon
//! - `serde`: `Serialize`/`Deserialize` for the configuration types

pub mod estimators;
