// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

// Shared data structures for all estimation modes: the input series, the embedded
// point set with its KD-tree, and the neighbour search built on them.

pub mod dataset;
pub mod neighbors;
pub mod series;
