// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use approx::assert_abs_diff_eq;
use ndarray::Array1;
use rstest::rstest;

use corrsum::estimators::approaches::common_nd::neighbors::{NeighborBackend, NeighborSearch};
use corrsum::estimators::approaches::recurrence::RecurrenceEstimator;
use corrsum::estimators::error::CorrSumError;
use corrsum::estimators::parallel::AnchorExecutor;

use crate::test_helpers::{brute_force_pairs, embed, gaussian_series, series};

#[test]
fn linear_ramp_recurs_only_with_adjacent_vectors() {
    // consecutive 2-D vectors of 1..=10 are sqrt(2) apart, the next ones 2 sqrt(2)
    let s = series(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]);
    let points = embed(&s, 2, 1);
    let executor = AnchorExecutor::sequential();
    let search = NeighborSearch::new(&points, 1, NeighborBackend::BruteForce, &executor);

    let result = RecurrenceEstimator::new(1.5).estimate(&search).unwrap();
    let expected: Vec<(usize, usize)> = (0..8).map(|k| (k, k + 1)).collect();
    assert_eq!(result.pairs, expected);
    assert_eq!(result.first_indices(), Array1::from_iter(0..8usize));
    assert_eq!(result.second_indices(), Array1::from_iter(1..9usize));
    // 9 points, 36 eligible pairs
    assert_abs_diff_eq!(result.rate(search.eligible_pair_count()).unwrap(), 8.0 / 36.0, epsilon = 1e-12);
}

#[test]
fn exclusion_radius_removes_adjacent_pairs() {
    let s = series(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]);
    let points = embed(&s, 2, 1);
    let executor = AnchorExecutor::sequential();
    let search = NeighborSearch::new(&points, 2, NeighborBackend::BruteForce, &executor);

    let result = RecurrenceEstimator::new(1.5).estimate(&search).unwrap();
    assert!(result.is_empty());
}

#[rstest]
#[case(2, 1, 0, 0.5)]
#[case(3, 1, 3, 1.0)]
#[case(4, 2, 10, 1.5)]
fn recurrence_pairs_are_exact_and_unique(
    #[case] dim: usize,
    #[case] step: usize,
    #[case] time_lag: usize,
    #[case] radius: f64,
) {
    let s = gaussian_series(250, 17);
    let points = embed(&s, dim, step);
    let executor = AnchorExecutor::sequential();
    let search = NeighborSearch::new(&points, time_lag, NeighborBackend::BruteForce, &executor);

    let result = RecurrenceEstimator::new(radius).estimate(&search).unwrap();
    assert_eq!(result.pairs, brute_force_pairs(&points, time_lag, radius));
    assert!(result.pairs.windows(2).all(|w| w[0] < w[1]), "pairs sorted and unique");
    for &(i, j) in &result.pairs {
        assert!(i < j && j - i >= time_lag.max(1));
        assert!(points.distance(i, j) < radius);
    }
}

#[test]
fn non_positive_threshold_is_rejected() {
    let s = series(&[1.0, 2.0, 3.0, 4.0]);
    let points = embed(&s, 2, 1);
    let executor = AnchorExecutor::sequential();
    let search = NeighborSearch::new(&points, 1, NeighborBackend::BruteForce, &executor);

    let err = RecurrenceEstimator::new(0.0).estimate(&search).unwrap_err();
    assert!(matches!(err, CorrSumError::InvalidConfiguration(_)));
}
