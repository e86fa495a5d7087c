// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Analysis configuration
//!
//! [`AnalysisConfig`] is the typed configuration consumed by the engine. It carries
//! the embedding geometry, the temporal exclusion radius, the estimation mode with
//! its parameters, and execution settings.
//!
//! [`AnalysisOptions`] is the flat, caller-facing form with loosely typed fields
//! (`timeLag` as `"auto"` or an integer, `estimationMode` as a string). It converts
//! into an `AnalysisConfig` with [`TryFrom`], which is where unknown modes and missing
//! mode parameters are rejected.
//!
//! ```
//! use corrsum::estimators::config::{AnalysisConfig, AnalysisOptions, EstimationMode, TimeLag};
//!
//! let options = AnalysisOptions {
//!     estimation_mode: "prediction".into(),
//!     neighbor_size: Some(3),
//!     time_lag: "auto".into(),
//!     ..AnalysisOptions::default()
//! };
//! let config = AnalysisConfig::try_from(options).unwrap();
//! assert_eq!(config.time_lag, TimeLag::Auto);
//! assert_eq!(config.mode, EstimationMode::Prediction { neighbor_size: 3, horizon: 1 });
//! ```

use std::fmt;
use std::str::FromStr;

use crate::estimators::approaches::common_nd::neighbors::{NeighborBackend, SelectionPolicy};
use crate::estimators::error::{CorrSumError, Result};
use crate::estimators::parallel::Parallelism;

pub const DEFAULT_EMBEDDED_DIM: usize = 2;
pub const DEFAULT_TIME_LAG: usize = 2;
pub const DEFAULT_TIME_STEP: usize = 1;
pub const DEFAULT_HORIZON: usize = 1;

/// Temporal exclusion radius, fixed or estimated from the first zero crossing of
/// the autocorrelation function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TimeLag {
    Auto,
    Fixed(usize),
}

impl Default for TimeLag {
    fn default() -> Self {
        TimeLag::Fixed(DEFAULT_TIME_LAG)
    }
}

impl From<usize> for TimeLag {
    fn from(lag: usize) -> Self {
        TimeLag::Fixed(lag)
    }
}

impl FromStr for TimeLag {
    type Err = CorrSumError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("auto") {
            return Ok(TimeLag::Auto);
        }
        s.parse::<usize>()
            .map(TimeLag::Fixed)
            .map_err(|_| CorrSumError::invalid(format!("timeLag must be a non-negative integer or \"auto\", got {s:?}")))
    }
}

impl fmt::Display for TimeLag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeLag::Auto => f.write_str("auto"),
            TimeLag::Fixed(lag) => write!(f, "{lag}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum EstimationModeKind {
    Recurrence,
    Dimension,
    Prediction,
    Smoothing,
}

impl EstimationModeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EstimationModeKind::Recurrence => "recurrence",
            EstimationModeKind::Dimension => "dimension",
            EstimationModeKind::Prediction => "prediction",
            EstimationModeKind::Smoothing => "smooth",
        }
    }
}

impl FromStr for EstimationModeKind {
    type Err = CorrSumError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "recurrence" => Ok(EstimationModeKind::Recurrence),
            "dimension" => Ok(EstimationModeKind::Dimension),
            "prediction" => Ok(EstimationModeKind::Prediction),
            "smooth" | "smoothing" => Ok(EstimationModeKind::Smoothing),
            other => Err(CorrSumError::invalid(format!(
                "unknown estimation mode {other:?}, expected one of recurrence|dimension|prediction|smooth"
            ))),
        }
    }
}

impl fmt::Display for EstimationModeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Estimation mode together with the parameters it needs.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "mode", rename_all = "lowercase"))]
pub enum EstimationMode {
    Recurrence { distance_threshold: f64 },
    /// With `find_scaling` the radii come from the scaling-region search and
    /// `thresholds` is ignored.
    Dimension { thresholds: Vec<f64>, find_scaling: bool },
    Prediction { neighbor_size: usize, horizon: usize },
    Smoothing { neighbor_size: usize },
}

impl EstimationMode {
    pub fn recurrence(distance_threshold: f64) -> Self {
        EstimationMode::Recurrence { distance_threshold }
    }

    pub fn dimension(thresholds: Vec<f64>) -> Self {
        EstimationMode::Dimension { thresholds, find_scaling: false }
    }

    pub fn dimension_with_scaling() -> Self {
        EstimationMode::Dimension { thresholds: Vec::new(), find_scaling: true }
    }

    pub fn prediction(neighbor_size: usize) -> Self {
        EstimationMode::Prediction { neighbor_size, horizon: DEFAULT_HORIZON }
    }

    pub fn smoothing(neighbor_size: usize) -> Self {
        EstimationMode::Smoothing { neighbor_size }
    }

    pub fn kind(&self) -> EstimationModeKind {
        match self {
            EstimationMode::Recurrence { .. } => EstimationModeKind::Recurrence,
            EstimationMode::Dimension { .. } => EstimationModeKind::Dimension,
            EstimationMode::Prediction { .. } => EstimationModeKind::Prediction,
            EstimationMode::Smoothing { .. } => EstimationModeKind::Smoothing,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            EstimationMode::Recurrence { distance_threshold } => {
                SelectionPolicy::Threshold(*distance_threshold).validate()
            }
            EstimationMode::Dimension { find_scaling: true, .. } => Ok(()),
            EstimationMode::Dimension { thresholds, find_scaling: false } => {
                if thresholds.is_empty() {
                    return Err(CorrSumError::invalid(
                        "dimension mode needs a distance threshold unless findScaling is set",
                    ));
                }
                thresholds.iter().try_for_each(|&r| SelectionPolicy::Threshold(r).validate())
            }
            EstimationMode::Prediction { neighbor_size, horizon } => {
                if *horizon == 0 {
                    return Err(CorrSumError::invalid("prediction horizon must be at least 1"));
                }
                SelectionPolicy::Nearest(*neighbor_size).validate()
            }
            EstimationMode::Smoothing { neighbor_size } => SelectionPolicy::Nearest(*neighbor_size).validate(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnalysisConfig {
    pub embedded_dim: usize,
    pub time_lag: TimeLag,
    pub time_step: usize,
    pub mode: EstimationMode,
    #[cfg_attr(feature = "serde", serde(default))]
    pub neighbor_backend: NeighborBackend,
    #[cfg_attr(feature = "serde", serde(default))]
    pub parallelism: Parallelism,
}

impl AnalysisConfig {
    pub fn new(mode: EstimationMode) -> Self {
        Self {
            embedded_dim: DEFAULT_EMBEDDED_DIM,
            time_lag: TimeLag::default(),
            time_step: DEFAULT_TIME_STEP,
            mode,
            neighbor_backend: NeighborBackend::default(),
            parallelism: Parallelism::default(),
        }
    }

    pub fn with_embedded_dim(mut self, embedded_dim: usize) -> Self {
        self.embedded_dim = embedded_dim;
        self
    }

    pub fn with_time_lag(mut self, time_lag: impl Into<TimeLag>) -> Self {
        self.time_lag = time_lag.into();
        self
    }

    pub fn with_time_step(mut self, time_step: usize) -> Self {
        self.time_step = time_step;
        self
    }

    pub fn with_neighbor_backend(mut self, backend: NeighborBackend) -> Self {
        self.neighbor_backend = backend;
        self
    }

    pub fn with_parallelism(mut self, parallelism: Parallelism) -> Self {
        self.parallelism = parallelism;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.embedded_dim < 1 {
            return Err(CorrSumError::invalid("embeddedDim must be at least 1"));
        }
        if self.time_step < 1 {
            return Err(CorrSumError::invalid("timeStep must be at least 1"));
        }
        self.mode.validate()
    }
}

/// Flat option set using the caller-facing parameter names.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct AnalysisOptions {
    pub embedded_dim: usize,
    /// `"auto"` or a non-negative integer
    pub time_lag: String,
    pub time_step: usize,
    pub distance_threshold: Option<f64>,
    #[cfg_attr(feature = "serde", serde(rename = "neighboorSize", alias = "neighborSize"))]
    pub neighbor_size: Option<usize>,
    pub estimation_mode: String,
    pub find_scaling: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            embedded_dim: DEFAULT_EMBEDDED_DIM,
            time_lag: DEFAULT_TIME_LAG.to_string(),
            time_step: DEFAULT_TIME_STEP,
            distance_threshold: None,
            neighbor_size: None,
            estimation_mode: EstimationModeKind::Recurrence.to_string(),
            find_scaling: false,
        }
    }
}

impl TryFrom<AnalysisOptions> for AnalysisConfig {
    type Error = CorrSumError;

    fn try_from(options: AnalysisOptions) -> Result<Self> {
        let kind: EstimationModeKind = options.estimation_mode.parse()?;
        let time_lag: TimeLag = options.time_lag.parse()?;
        let missing = |name: &str| CorrSumError::invalid(format!("{name} is required for {kind} mode"));

        let mode = match kind {
            EstimationModeKind::Recurrence => EstimationMode::Recurrence {
                distance_threshold: options.distance_threshold.ok_or_else(|| missing("distanceThreshold"))?,
            },
            EstimationModeKind::Dimension if options.find_scaling => EstimationMode::dimension_with_scaling(),
            EstimationModeKind::Dimension => EstimationMode::Dimension {
                thresholds: vec![options.distance_threshold.ok_or_else(|| missing("distanceThreshold"))?],
                find_scaling: false,
            },
            EstimationModeKind::Prediction => {
                EstimationMode::prediction(options.neighbor_size.ok_or_else(|| missing("neighboorSize"))?)
            }
            EstimationModeKind::Smoothing => {
                EstimationMode::smoothing(options.neighbor_size.ok_or_else(|| missing("neighboorSize"))?)
            }
        };

        let config = AnalysisConfig::new(mode)
            .with_embedded_dim(options.embedded_dim)
            .with_time_lag(time_lag)
            .with_time_step(options.time_step);
        config.validate()?;
        Ok(config)
    }
}
