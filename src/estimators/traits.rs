// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use ndarray::Array1;

pub trait GlobalValue {
    /// The scalar summary of the result, if the mode defines one and it could be computed.
    fn global_value(&self) -> Option<f64>;
}

pub trait LocalValues: GlobalValue {
    /// Per-point estimates, aligned with the result's index sequence.
    fn local_values(&self) -> Array1<f64>;
}

/// Optional interface for results that may not carry local values.
///
/// Results that do support local values return supports_local() = true and provide
/// them via `Ok(Array1<f64>)`. Others return supports_local() = false and an Err with
/// a brief reason.
pub trait OptionalLocalValues {
    fn supports_local(&self) -> bool;
    fn local_values_opt(&self) -> Result<Array1<f64>, &'static str>;
}
