// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-anchor execution.
//!
//! Every quadratic pass in the crate is a map over anchor indices with no shared
//! mutable state: each anchor produces its own output slot and the caller reduces
//! the slots afterwards. [`AnchorExecutor`] runs that map either sequentially or on
//! a rayon pool (feature `parallel`) and checks a [`CancellationToken`] before each
//! anchor.

use std::num::NonZeroUsize;
use std::ops::Range;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::estimators::error::{CorrSumError, Result};

/// Shared flag that aborts a running analysis between anchors.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Degree of parallelism for anchor loops.
///
/// `threads: None` uses the rayon global pool, `Some(1)` runs on the calling
/// thread, any other value builds a dedicated pool for the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Parallelism {
    pub threads: Option<NonZeroUsize>,
}

impl Parallelism {
    pub fn sequential() -> Self {
        Self { threads: NonZeroUsize::new(1) }
    }

    /// A dedicated pool with `n` workers; `0` falls back to the global pool.
    pub fn threads(n: usize) -> Self {
        Self { threads: NonZeroUsize::new(n) }
    }

    pub fn is_sequential(&self) -> bool {
        self.threads.is_some_and(|t| t.get() == 1) || cfg!(not(feature = "parallel"))
    }
}

enum Mode {
    Sequential,
    #[cfg(feature = "parallel")]
    Global,
    #[cfg(feature = "parallel")]
    Pool(rayon::ThreadPool),
}

pub struct AnchorExecutor {
    mode: Mode,
    cancel: CancellationToken,
}

impl AnchorExecutor {
    pub fn new(parallelism: Parallelism, cancel: CancellationToken) -> Result<Self> {
        let mode = if parallelism.is_sequential() {
            Mode::Sequential
        } else {
            Self::parallel_mode(parallelism)?
        };
        Ok(Self { mode, cancel })
    }

    pub fn sequential() -> Self {
        Self { mode: Mode::Sequential, cancel: CancellationToken::new() }
    }

    #[cfg(feature = "parallel")]
    fn parallel_mode(parallelism: Parallelism) -> Result<Mode> {
        match parallelism.threads {
            None => Ok(Mode::Global),
            Some(n) => {
                let pool = rayon::ThreadPoolBuilder::new().num_threads(n.get()).build()?;
                Ok(Mode::Pool(pool))
            }
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn parallel_mode(_parallelism: Parallelism) -> Result<Mode> {
        Ok(Mode::Sequential)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn check_cancelled(&self) -> Result<()> {
        if self.cancel.is_cancelled() { Err(CorrSumError::Cancelled) } else { Ok(()) }
    }

    /// Evaluate `f` for every anchor in `anchors`, preserving anchor order.
    pub fn map<T, F>(&self, anchors: Range<usize>, f: F) -> Result<Vec<T>>
    where
        T: Send,
        F: Fn(usize) -> T + Sync + Send,
    {
        let cancel = &self.cancel;
        let guarded = |i: usize| if cancel.is_cancelled() { None } else { Some(f(i)) };

        let out: Option<Vec<T>> = match &self.mode {
            Mode::Sequential => anchors.map(guarded).collect(),
            #[cfg(feature = "parallel")]
            Mode::Global => anchors.into_par_iter().map(guarded).collect(),
            #[cfg(feature = "parallel")]
            Mode::Pool(pool) => pool.install(|| anchors.into_par_iter().map(guarded).collect()),
        };
        out.ok_or(CorrSumError::Cancelled)
    }
}
