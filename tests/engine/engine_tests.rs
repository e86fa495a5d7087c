// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use rstest::rstest;

use corrsum::estimators::approaches::common_nd::neighbors::NeighborBackend;
use corrsum::estimators::config::{AnalysisConfig, AnalysisOptions, EstimationMode, TimeLag};
use corrsum::estimators::engine::{analyze, AnalysisOutput, EstimationEngine};
use corrsum::estimators::error::CorrSumError;
use corrsum::estimators::parallel::{CancellationToken, Parallelism};
use corrsum::estimators::traits::{GlobalValue, OptionalLocalValues};

use crate::test_helpers::{gaussian_series, periodic_series, series, sine_series, DISTINCT_PAIR_PATTERN};

#[test]
fn recurrence_run_from_caller_options() {
    let s = series(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]);
    let config = AnalysisConfig::try_from(AnalysisOptions {
        time_lag: "1".into(),
        distance_threshold: Some(1.5),
        ..AnalysisOptions::default()
    })
    .unwrap();
    let analysis = analyze(&s, config).unwrap();

    assert_eq!(analysis.time_lag, 1);
    assert_eq!(analysis.embedded_points, 9);
    let recurrence = analysis.output.as_recurrence().unwrap();
    let expected: Vec<(usize, usize)> = (0..8).map(|k| (k, k + 1)).collect();
    assert_eq!(recurrence.pairs, expected);
    assert_eq!(analysis.global_value(), None);
    assert!(!analysis.output.supports_local());
    assert!(analysis.output.local_values_opt().is_err());
}

#[test]
fn constant_series_dimension_run_is_flat() {
    let s = series(&[4.0; 30]);
    let config = AnalysisConfig::new(EstimationMode::dimension(vec![0.1, 1.0, 10.0]));
    let analysis = analyze(&s, config).unwrap();

    let dimension = analysis.output.as_dimension().unwrap();
    assert!(dimension.correlation_sums().iter().all(|&c| c == 1.0));
    assert_eq!(analysis.global_value(), Some(0.0));
}

#[test]
fn constant_series_cannot_search_for_scaling() {
    let s = series(&[4.0; 30]);
    let err = analyze(&s, AnalysisConfig::new(EstimationMode::dimension_with_scaling())).unwrap_err();
    assert!(matches!(err, CorrSumError::InvalidConfiguration(_)));
}

#[test]
fn periodic_prediction_run_has_zero_error() {
    let s = periodic_series(&DISTINCT_PAIR_PATTERN, 48);
    let config = AnalysisConfig::new(EstimationMode::prediction(1)).with_time_lag(6);
    let analysis = analyze(&s, config).unwrap();

    assert_eq!(analysis.global_value(), Some(0.0));
    assert!(analysis.output.supports_local());
    let local = analysis.output.local_values_opt().unwrap();
    assert_eq!(local.len(), 24);
    assert_eq!(local.to_vec(), s.as_slice()[24..].to_vec());
    assert!(analysis.diagnostics.is_clean());
}

#[test]
fn smoothing_run_reports_skipped_points() {
    let s = gaussian_series(30, 12);
    let config = AnalysisConfig::new(EstimationMode::smoothing(1)).with_embedded_dim(1).with_time_lag(20);
    let analysis = analyze(&s, config).unwrap();

    let AnalysisOutput::Smoothing(result) = &analysis.output else {
        panic!("expected smoothing output");
    };
    // indices 10..20 are within 20 steps of every other sample
    assert_eq!(analysis.diagnostics.skipped_indices(), (10..20).collect::<Vec<_>>());
    assert_eq!(result.len(), 20);
    assert_eq!(analysis.diagnostics.warnings().len(), 10);
    assert!(analysis.diagnostics.warnings().iter().all(CorrSumError::is_recoverable));
    assert_eq!(analysis.output.as_local_model(), Some(result));
}

#[test]
fn too_short_series_fails_before_any_search() {
    let s = series(&[1.0, 2.0, 3.0]);
    let config = AnalysisConfig::new(EstimationMode::recurrence(1.0))
        .with_embedded_dim(3)
        .with_time_step(2)
        .with_time_lag(TimeLag::Auto);
    let err = analyze(&s, config).unwrap_err();
    assert!(matches!(err, CorrSumError::InsufficientLength { len: 3, required: 5 }));
}

#[test]
fn automatic_time_lag_uses_the_autocorrelation_crossing() {
    let s = sine_series(400, 40.0);
    let config = AnalysisConfig::new(EstimationMode::recurrence(0.2)).with_time_lag(TimeLag::Auto);
    let analysis = analyze(&s, config).unwrap();
    assert_eq!(analysis.time_lag, 11);
    let recurrence = analysis.output.as_recurrence().unwrap();
    assert!(recurrence.pairs.iter().all(|&(i, j)| j - i >= 11));

    let constant = series(&[1.0; 20]);
    let config = AnalysisConfig::new(EstimationMode::recurrence(0.2)).with_time_lag(TimeLag::Auto);
    assert!(matches!(analyze(&constant, config), Err(CorrSumError::NoZeroCrossing { .. })));
}

#[test]
fn cancelled_run_returns_cancelled() {
    let s = gaussian_series(200, 4);
    let token = CancellationToken::new();
    let engine = EstimationEngine::new(AnalysisConfig::new(EstimationMode::recurrence(0.5)))
        .unwrap()
        .with_cancellation(token.clone());
    token.cancel();
    assert!(engine.cancellation_token().is_cancelled());
    assert!(matches!(engine.run(&s), Err(CorrSumError::Cancelled)));
}

#[test]
fn invalid_configuration_is_rejected_by_the_engine() {
    let config = AnalysisConfig::new(EstimationMode::recurrence(-1.0));
    assert!(matches!(EstimationEngine::new(config), Err(CorrSumError::InvalidConfiguration(_))));
}

#[rstest]
#[case(EstimationMode::recurrence(0.8))]
#[case(EstimationMode::dimension(vec![0.2, 0.4, 0.8, 1.6]))]
#[case(EstimationMode::prediction(3))]
#[case(EstimationMode::smoothing(2))]
fn execution_settings_do_not_change_results(#[case] mode: EstimationMode) {
    let s = gaussian_series(1500, 31);
    let base = AnalysisConfig::new(mode).with_embedded_dim(3).with_time_lag(4);

    let reference = analyze(
        &s,
        base.clone()
            .with_parallelism(Parallelism::sequential())
            .with_neighbor_backend(NeighborBackend::BruteForce),
    )
    .unwrap();
    for (parallelism, backend) in [
        (Parallelism::default(), NeighborBackend::Auto),
        (Parallelism::threads(3), NeighborBackend::KdTree),
        (Parallelism::sequential(), NeighborBackend::KdTree),
    ] {
        let run = analyze(&s, base.clone().with_parallelism(parallelism).with_neighbor_backend(backend)).unwrap();
        assert_eq!(run, reference, "{parallelism:?} {backend:?}");
    }
}
