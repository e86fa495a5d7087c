// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use ndarray::array;

use corrsum::estimators::approaches::common_nd::neighbors::{NeighborBackend, NeighborSearch};
use corrsum::estimators::approaches::local_model::{LocalModelEstimator, LocalModelScope};
use corrsum::estimators::diagnostics::Diagnostics;
use corrsum::estimators::parallel::AnchorExecutor;
use corrsum::estimators::traits::GlobalValue;

use crate::test_helpers::{embed, gaussian_series, periodic_series, series, DISTINCT_PAIR_PATTERN};

#[test]
fn periodic_series_is_reproduced_by_smoothing() {
    let s = periodic_series(&DISTINCT_PAIR_PATTERN, 36);
    let points = embed(&s, 2, 1);
    let executor = AnchorExecutor::sequential();
    let search = NeighborSearch::new(&points, 6, NeighborBackend::BruteForce, &executor);

    let estimator = LocalModelEstimator::smoothing(1);
    assert_eq!(estimator.scope, LocalModelScope::Smoothing);
    assert_eq!(estimator.horizon, 0);

    let mut diagnostics = Diagnostics::default();
    let result = estimator.estimate(&s, &search, &mut diagnostics).unwrap();
    // every sample after the first window span
    assert_eq!(result.indices, (1..36).collect::<Vec<_>>());
    assert_eq!(result.predicted, result.actual);
    assert_eq!(result.global_value(), Some(0.0));
    assert_eq!(diagnostics.skipped_indices(), vec![0]);
}

#[test]
fn samples_before_the_first_window_are_reported_as_skipped() {
    let s = gaussian_series(60, 21);
    let points = embed(&s, 3, 2);
    let executor = AnchorExecutor::sequential();
    let search = NeighborSearch::new(&points, 2, NeighborBackend::BruteForce, &executor);

    let mut diagnostics = Diagnostics::default();
    let result = LocalModelEstimator::smoothing(2).estimate(&s, &search, &mut diagnostics).unwrap();
    // span = (3 - 1) * 2
    assert_eq!(result.indices, (4..60).collect::<Vec<_>>());
    assert_eq!(diagnostics.skipped_indices(), vec![0, 1, 2, 3]);
    assert!(diagnostics.skipped.iter().all(|p| p.available == 0 && p.required == 2));
    assert_eq!(result.len() + diagnostics.insufficient_neighbors(), s.len());
}

#[test]
fn smoothing_averages_distant_neighbours() {
    let s = series(&[1.0, 2.0, 3.0, 4.0]);
    let points = embed(&s, 1, 1);
    let executor = AnchorExecutor::sequential();
    let search = NeighborSearch::new(&points, 3, NeighborBackend::BruteForce, &executor);

    let mut diagnostics = Diagnostics::default();
    let result = LocalModelEstimator::smoothing(1).estimate(&s, &search, &mut diagnostics).unwrap();
    assert_eq!(result.indices, vec![0, 3]);
    assert_eq!(result.predicted, array![4.0, 1.0]);
    assert_eq!(result.actual, array![1.0, 4.0]);
    assert_eq!(diagnostics.skipped_indices(), vec![1, 2]);
}

#[test]
fn smoothing_never_uses_the_point_itself() {
    let s = gaussian_series(120, 8);
    let points = embed(&s, 2, 1);
    let executor = AnchorExecutor::sequential();
    // without exclusion beyond the anchor itself, a self match would give zero error
    let search = NeighborSearch::new(&points, 0, NeighborBackend::BruteForce, &executor);

    let mut diagnostics = Diagnostics::default();
    let result = LocalModelEstimator::smoothing(1).estimate(&s, &search, &mut diagnostics).unwrap();
    assert_eq!(result.len(), 119);
    assert!(result.normalized_error_variance.unwrap() > 0.0);
    assert!(result.residuals().iter().all(|r| r.is_finite()));
}
