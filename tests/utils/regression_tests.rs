// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use approx::assert_abs_diff_eq;

use corrsum::estimators::utils::regression::least_squares_fit;

#[test]
fn exact_line_is_recovered() {
    let x = [0.0, 1.0, 2.0, 3.0];
    let y: Vec<f64> = x.iter().map(|v| 2.5 * v - 1.0).collect();
    let fit = least_squares_fit(&x, &y).unwrap();
    assert_abs_diff_eq!(fit.slope, 2.5, epsilon = 1e-12);
    assert_abs_diff_eq!(fit.intercept, -1.0, epsilon = 1e-12);
}

#[test]
fn noisy_points_give_least_squares_slope() {
    // slope = Sxy / Sxx = 6 / 10
    let x = [-2.0, -1.0, 0.0, 1.0, 2.0];
    let y = [-1.0, -1.0, 0.0, 1.0, 1.0];
    let fit = least_squares_fit(&x, &y).unwrap();
    assert_abs_diff_eq!(fit.slope, 0.6, epsilon = 1e-12);
    assert_abs_diff_eq!(fit.intercept, 0.0, epsilon = 1e-12);
}

#[test]
fn degenerate_inputs_give_no_fit() {
    assert!(least_squares_fit(&[], &[]).is_none());
    assert!(least_squares_fit(&[1.0], &[2.0]).is_none());
    assert!(least_squares_fit(&[1.0, 1.0, 1.0], &[0.0, 1.0, 2.0]).is_none());
}
