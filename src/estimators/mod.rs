// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

pub mod approaches;
pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod parallel;
pub mod traits;
pub mod utils;

pub use config::{AnalysisConfig, AnalysisOptions, EstimationMode, EstimationModeKind, TimeLag};
pub use diagnostics::Diagnostics;
pub use engine::{analyze, Analysis, AnalysisOutput, EstimationEngine};
pub use error::{CorrSumError, Result};
pub use parallel::{CancellationToken, Parallelism};
pub use traits::{GlobalValue, LocalValues, OptionalLocalValues};
