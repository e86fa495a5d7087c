// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use ndarray::ArrayView1;

/// Normalised error variance `mean((pred - actual)^2) / var(actual)`.
///
/// This deliberately departs from the literal `var(pred - actual) / var(actual)`:
/// the error term is taken about zero rather than about its own mean, so a constant
/// offset counts as error and the value is 0 only for exact estimates. The
/// denominator is the population variance of `actual`. `None` for empty input or
/// constant `actual`.
pub fn normalized_error_variance(predicted: ArrayView1<'_, f64>, actual: ArrayView1<'_, f64>) -> Option<f64> {
    assert_eq!(predicted.len(), actual.len(), "predicted and actual must have the same length");
    if actual.is_empty() {
        return None;
    }
    let var_actual = actual.var(0.0);
    if !(var_actual > 0.0) {
        return None;
    }
    let errors = &predicted - &actual;
    let mse = errors.mapv(|e| e * e).mean()?;
    Some(mse / var_actual)
}

/// Unweighted mean of the series values at `offset` past each neighbour's base index.
pub fn neighbor_average(series: &[f64], neighbors: impl Iterator<Item = usize>, offset: usize) -> Option<f64> {
    let (sum, count) = neighbors.fold((0.0f64, 0usize), |(s, c), j| (s + series[j + offset], c + 1));
    (count > 0).then(|| sum / count as f64)
}
