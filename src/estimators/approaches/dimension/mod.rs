// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

pub mod dimension;
pub mod scaling;

pub use dimension::{geometric_thresholds, DimensionEstimator, DimensionResult, ScalingSample};
pub use scaling::{ScalingPair, ScalingRegionFinder};
