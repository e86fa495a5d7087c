// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use approx::assert_relative_eq;

use corrsum::estimators::approaches::common_nd::neighbors::{NeighborBackend, NeighborSearch};
use corrsum::estimators::approaches::dimension::{DimensionEstimator, ScalingRegionFinder};
use corrsum::estimators::diagnostics::Diagnostics;
use corrsum::estimators::error::CorrSumError;
use corrsum::estimators::parallel::AnchorExecutor;

use crate::test_helpers::{embed, gaussian_series, series};

#[test]
fn scaling_search_hits_the_target_ratio() {
    let s = gaussian_series(1000, 3);
    let points = embed(&s, 2, 1);
    let executor = AnchorExecutor::sequential();
    let search = NeighborSearch::new(&points, 1, NeighborBackend::BruteForce, &executor);

    let pair = ScalingRegionFinder::default().find(&s, &search).unwrap();
    assert_relative_eq!(pair.upper, s.std_dev() / 4.0);
    assert!(pair.lower > 0.0 && pair.lower < pair.upper);
    assert!(pair.converged);
    assert!(pair.iterations >= 1);
    let ratio = pair.ratio.unwrap();
    assert!((ratio - 5.0).abs() <= 0.25, "ratio {ratio}");

    // the reported ratio is the one the counts give
    let c_upper = search.pair_count(pair.upper).unwrap() as f64;
    let c_lower = search.pair_count(pair.lower).unwrap() as f64;
    assert_relative_eq!(c_upper / c_lower, ratio);
    assert!(pair.warning().is_none());
}

#[test]
fn exhausted_budget_keeps_the_closest_radius() {
    let s = gaussian_series(300, 5);
    let points = embed(&s, 2, 1);
    let executor = AnchorExecutor::sequential();
    let search = NeighborSearch::new(&points, 1, NeighborBackend::BruteForce, &executor);

    let finder = ScalingRegionFinder::new()
        .with_target_ratio(5.123_456_789)
        .with_tolerance(0.0)
        .with_max_iterations(2);
    let pair = finder.find(&s, &search).unwrap();
    assert!(!pair.converged);
    assert_eq!(pair.iterations, 2);
    assert!(pair.lower < pair.upper);
    assert!(matches!(
        pair.warning(),
        Some(CorrSumError::ScalingSearchDidNotConverge { iterations: 2, .. })
    ));
}

#[test]
fn zero_spread_series_cannot_be_scaled() {
    let s = series(&[1.0; 40]);
    let points = embed(&s, 2, 1);
    let executor = AnchorExecutor::sequential();
    let search = NeighborSearch::new(&points, 1, NeighborBackend::BruteForce, &executor);

    let err = ScalingRegionFinder::default().find(&s, &search).unwrap_err();
    assert!(matches!(err, CorrSumError::InvalidConfiguration(_)));
}

#[test]
fn invalid_finder_settings_are_rejected() {
    let s = gaussian_series(100, 1);
    let points = embed(&s, 2, 1);
    let executor = AnchorExecutor::sequential();
    let search = NeighborSearch::new(&points, 1, NeighborBackend::BruteForce, &executor);

    for finder in [
        ScalingRegionFinder::new().with_target_ratio(1.0),
        ScalingRegionFinder::new().with_tolerance(-0.1),
        ScalingRegionFinder::new().with_max_iterations(0),
    ] {
        assert!(matches!(finder.find(&s, &search), Err(CorrSumError::InvalidConfiguration(_))));
    }
}

#[test]
fn dimension_with_scaling_uses_the_found_region() {
    let s = gaussian_series(800, 13);
    let points = embed(&s, 2, 1);
    let executor = AnchorExecutor::sequential();
    let search = NeighborSearch::new(&points, 1, NeighborBackend::BruteForce, &executor);

    let mut diagnostics = Diagnostics::default();
    let result = DimensionEstimator::with_scaling_search(ScalingRegionFinder::default())
        .estimate(&s, &search, &mut diagnostics)
        .unwrap();

    let pair = result.scaling.unwrap();
    assert_eq!(diagnostics.scaling, Some(pair));
    assert_eq!(result.samples.len(), 2);
    assert_eq!(result.samples[0].radius, pair.lower);
    assert_eq!(result.samples[1].radius, pair.upper);
    // two-dimensional Gaussian cloud
    let slope = result.slope.unwrap();
    assert!((1.5..2.5).contains(&slope), "slope {slope}");
}
