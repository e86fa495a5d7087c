// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

pub mod local_model;
pub mod local_model_utils;

pub use local_model::{LocalModelEstimator, LocalModelResult, LocalModelScope};
pub use local_model_utils::normalized_error_variance;
