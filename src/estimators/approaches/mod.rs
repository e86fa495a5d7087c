// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

pub mod common_nd;
pub mod dimension;
pub mod local_model;
pub mod recurrence;

// Unified re-exports so tests and users can import
// corrsum::estimators::approaches::* ergonomically.
pub use common_nd::dataset::EmbeddedPointSet;
pub use common_nd::neighbors::{NeighborBackend, NeighborSearch, NeighborSet, SelectionPolicy};
pub use common_nd::series::TimeSeries;

pub use dimension::{DimensionEstimator, DimensionResult, ScalingPair, ScalingRegionFinder, ScalingSample};
pub use local_model::{LocalModelEstimator, LocalModelResult, LocalModelScope};
pub use recurrence::{RecurrenceEstimator, RecurrenceResult};
