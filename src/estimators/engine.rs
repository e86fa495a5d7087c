// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Estimation engine
//!
//! One run embeds the series, resolves the temporal exclusion radius, builds a
//! neighbour search over the embedded points and hands it to the strategy selected
//! by [`EstimationMode`]. Configuration and length problems are reported before
//! any distance is computed.
//!
//! ```
//! use corrsum::estimators::config::{AnalysisConfig, EstimationMode};
//! use corrsum::estimators::engine::{AnalysisOutput, EstimationEngine};
//! use corrsum::estimators::approaches::common_nd::series::TimeSeries;
//!
//! let series = TimeSeries::new((1..=10).map(f64::from).collect()).unwrap();
//! let config = AnalysisConfig::new(EstimationMode::recurrence(1.5)).with_time_lag(1);
//! let analysis = EstimationEngine::new(config).unwrap().run(&series).unwrap();
//!
//! let AnalysisOutput::Recurrence(result) = analysis.output else { unreachable!() };
//! assert_eq!(result.pairs, (0..8).map(|k| (k, k + 1)).collect::<Vec<_>>());
//! ```

use ndarray::Array1;
use tracing::{debug, instrument};

use crate::estimators::approaches::common_nd::neighbors::NeighborSearch;
use crate::estimators::approaches::common_nd::series::TimeSeries;
use crate::estimators::approaches::dimension::{DimensionEstimator, DimensionResult, ScalingRegionFinder};
use crate::estimators::approaches::local_model::{LocalModelEstimator, LocalModelResult};
use crate::estimators::approaches::recurrence::{RecurrenceEstimator, RecurrenceResult};
use crate::estimators::config::{AnalysisConfig, EstimationMode, TimeLag};
use crate::estimators::diagnostics::Diagnostics;
use crate::estimators::error::Result;
use crate::estimators::parallel::{AnchorExecutor, CancellationToken};
use crate::estimators::traits::{GlobalValue, LocalValues, OptionalLocalValues};
use crate::estimators::utils::autocorrelation::AutocorrelationLagEstimator;
use crate::estimators::utils::delay_embedding::EmbeddingBuilder;

/// Mode-specific result of a run.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutput {
    Recurrence(RecurrenceResult),
    Dimension(DimensionResult),
    Prediction(LocalModelResult),
    Smoothing(LocalModelResult),
}

impl AnalysisOutput {
    pub fn as_recurrence(&self) -> Option<&RecurrenceResult> {
        match self {
            AnalysisOutput::Recurrence(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_dimension(&self) -> Option<&DimensionResult> {
        match self {
            AnalysisOutput::Dimension(r) => Some(r),
            _ => None,
        }
    }

    /// Prediction or smoothing result.
    pub fn as_local_model(&self) -> Option<&LocalModelResult> {
        match self {
            AnalysisOutput::Prediction(r) | AnalysisOutput::Smoothing(r) => Some(r),
            _ => None,
        }
    }
}

impl GlobalValue for AnalysisOutput {
    fn global_value(&self) -> Option<f64> {
        match self {
            AnalysisOutput::Recurrence(_) => None,
            AnalysisOutput::Dimension(r) => r.global_value(),
            AnalysisOutput::Prediction(r) | AnalysisOutput::Smoothing(r) => r.global_value(),
        }
    }
}

impl OptionalLocalValues for AnalysisOutput {
    fn supports_local(&self) -> bool {
        matches!(self, AnalysisOutput::Prediction(_) | AnalysisOutput::Smoothing(_))
    }

    fn local_values_opt(&self) -> std::result::Result<Array1<f64>, &'static str> {
        match self {
            AnalysisOutput::Prediction(r) | AnalysisOutput::Smoothing(r) => Ok(r.local_values()),
            AnalysisOutput::Recurrence(_) => Err("recurrence output has no per-point values"),
            AnalysisOutput::Dimension(_) => Err("dimension output has no per-point values"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub output: AnalysisOutput,
    pub diagnostics: Diagnostics,
    /// Exclusion radius that was applied, after `auto` resolution
    pub time_lag: usize,
    pub embedded_points: usize,
}

impl GlobalValue for Analysis {
    fn global_value(&self) -> Option<f64> {
        self.output.global_value()
    }
}

pub struct EstimationEngine {
    config: AnalysisConfig,
    cancel: CancellationToken,
}

impl EstimationEngine {
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, cancel: CancellationToken::new() })
    }

    /// Share `token` with the run so another thread can abort it.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    fn resolve_time_lag(&self, series: &TimeSeries) -> Result<usize> {
        match self.config.time_lag {
            TimeLag::Fixed(lag) => Ok(lag),
            TimeLag::Auto => {
                let lag = AutocorrelationLagEstimator::new().estimate(series)?;
                debug!(lag, "time lag resolved from autocorrelation");
                Ok(lag)
            }
        }
    }

    #[instrument(skip_all, fields(mode = %self.config.mode.kind(), len = series.len()))]
    pub fn run(&self, series: &TimeSeries) -> Result<Analysis> {
        let builder = EmbeddingBuilder::new(self.config.embedded_dim, self.config.time_step)?;
        let points = builder.build(series)?;
        let time_lag = self.resolve_time_lag(series)?;

        let executor = AnchorExecutor::new(self.config.parallelism, self.cancel.clone())?;
        executor.check_cancelled()?;
        let search = NeighborSearch::new(&points, time_lag, self.config.neighbor_backend, &executor);

        let mut diagnostics = Diagnostics::default();
        let output = match &self.config.mode {
            EstimationMode::Recurrence { distance_threshold } => {
                AnalysisOutput::Recurrence(RecurrenceEstimator::new(*distance_threshold).estimate(&search)?)
            }
            EstimationMode::Dimension { thresholds, find_scaling } => {
                let estimator = if *find_scaling {
                    DimensionEstimator::with_scaling_search(ScalingRegionFinder::default())
                } else {
                    DimensionEstimator::new(thresholds.clone())
                };
                AnalysisOutput::Dimension(estimator.estimate(series, &search, &mut diagnostics)?)
            }
            EstimationMode::Prediction { neighbor_size, horizon } => AnalysisOutput::Prediction(
                LocalModelEstimator::prediction(*neighbor_size, *horizon).estimate(series, &search, &mut diagnostics)?,
            ),
            EstimationMode::Smoothing { neighbor_size } => AnalysisOutput::Smoothing(
                LocalModelEstimator::smoothing(*neighbor_size).estimate(series, &search, &mut diagnostics)?,
            ),
        };
        diagnostics.report();

        Ok(Analysis { output, diagnostics, time_lag, embedded_points: points.len() })
    }
}

/// Validate `config` and run it once over `series`.
pub fn analyze(series: &TimeSeries, config: AnalysisConfig) -> Result<Analysis> {
    EstimationEngine::new(config)?.run(series)
}
