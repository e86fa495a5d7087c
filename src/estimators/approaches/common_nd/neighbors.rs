// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Neighbour search over delay-embedded points
//!
//! All searches share one temporal exclusion rule: a candidate `j` is eligible for
//! anchor `i` only if `j != i` and `|i - j| >= time_lag`. Points close in time are
//! trivially close in state space and would bias every estimate built on top.
//!
//! Distances are Euclidean over the embedding coordinates and compared in squared
//! space (`d^2 < r^2`).
//!
//! ## Selection policies
//!
//! - **Threshold** (`r`): every eligible candidate on either side of the anchor
//!   with distance below `r`. Pair enumeration and pair counting scan forward only
//!   (`j > i`) so each unordered pair is seen once.
//! - **Nearest** (`k`): the `k` eligible candidates closest to the anchor, ties at
//!   equal distance broken by the smaller index. Anchors with fewer than `k`
//!   eligible candidates fail with `InsufficientNeighbors`; batch searches skip them.
//!
//! ## Backends
//!
//! Threshold queries run either as an exact brute-force scan or through a kiddo
//! `ImmutableKdTree` (embedding dimensions 1 to 8). Both return identical sets.
//! Nearest-neighbour selection always scans so that the tie-break rule holds.

use std::cmp::Ordering;
use std::ops::Range;

use tracing::debug;

use super::dataset::{EmbeddedPointSet, KdIndex};
use crate::estimators::error::{CorrSumError, Result};
use crate::estimators::parallel::AnchorExecutor;

/// Point count from which `NeighborBackend::Auto` switches to the KD-tree.
pub const KDTREE_MIN_POINTS: usize = 1024;
/// Largest embedding dimension served by the KD-tree backend.
pub const KDTREE_MAX_DIM: usize = 8;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NeighborBackend {
    /// KD-tree for large point sets of low dimension, brute force otherwise
    #[default]
    Auto,
    BruteForce,
    /// KD-tree whenever the dimension allows it
    KdTree,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectionPolicy {
    Threshold(f64),
    Nearest(usize),
}

impl SelectionPolicy {
    pub fn validate(&self) -> Result<()> {
        match *self {
            SelectionPolicy::Threshold(r) if !(r.is_finite() && r > 0.0) => {
                Err(CorrSumError::invalid(format!("distance threshold must be positive and finite, got {r}")))
            }
            SelectionPolicy::Nearest(0) => Err(CorrSumError::invalid("neighbour size must be at least 1")),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub index: usize,
    pub distance: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NeighborSet {
    pub anchor: usize,
    /// Sorted by index for the threshold policy, by (distance, index) for nearest
    pub neighbors: Vec<Neighbor>,
}

impl NeighborSet {
    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.neighbors.iter().map(|n| n.index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkippedAnchor {
    pub anchor: usize,
    pub required: usize,
    pub available: usize,
}

impl From<SkippedAnchor> for CorrSumError {
    fn from(s: SkippedAnchor) -> Self {
        CorrSumError::InsufficientNeighbors { anchor: s.anchor, required: s.required, available: s.available }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOutcome {
    /// One set per successfully searched anchor, in anchor order
    pub sets: Vec<NeighborSet>,
    pub skipped: Vec<SkippedAnchor>,
    /// Total neighbours over all sets. For thresholds every unordered pair with both
    /// ends among the anchors is counted twice.
    pub pair_count: u64,
}

trait RadiusIndex: Send + Sync {
    /// Eligible-agnostic radius query restricted to `candidates`, sorted by index.
    fn within(&self, anchor: usize, radius_sq: f64, candidates: Range<usize>) -> Vec<(usize, f64)>;

    fn name(&self) -> &'static str;
}

struct BruteForceIndex<'a> {
    points: &'a EmbeddedPointSet,
}

impl RadiusIndex for BruteForceIndex<'_> {
    fn within(&self, anchor: usize, radius_sq: f64, candidates: Range<usize>) -> Vec<(usize, f64)> {
        candidates
            .filter_map(|j| {
                let d2 = self.points.squared_distance(anchor, j);
                (d2 < radius_sq).then_some((j, d2))
            })
            .collect()
    }

    fn name(&self) -> &'static str {
        "brute-force"
    }
}

impl<const K: usize> RadiusIndex for KdIndex<K> {
    fn within(&self, anchor: usize, radius_sq: f64, candidates: Range<usize>) -> Vec<(usize, f64)> {
        KdIndex::within(self, anchor, radius_sq, candidates)
    }

    fn name(&self) -> &'static str {
        "kd-tree"
    }
}

fn kd_index(points: &EmbeddedPointSet) -> Option<Box<dyn RadiusIndex>> {
    macro_rules! dispatch {
        ($($k:literal),*) => {
            match points.dim() {
                $($k => {
                    let index: Box<dyn RadiusIndex> = Box::new(KdIndex::<$k>::from_point_set(points));
                    Some(index)
                })*
                _ => None,
            }
        };
    }
    dispatch!(1, 2, 3, 4, 5, 6, 7, 8)
}

fn cmp_neighbors(a: &Neighbor, b: &Neighbor) -> Ordering {
    a.distance.total_cmp(&b.distance).then(a.index.cmp(&b.index))
}

pub struct NeighborSearch<'a> {
    points: &'a EmbeddedPointSet,
    time_lag: usize,
    executor: &'a AnchorExecutor,
    index: Box<dyn RadiusIndex + 'a>,
}

impl<'a> NeighborSearch<'a> {
    pub fn new(
        points: &'a EmbeddedPointSet,
        time_lag: usize,
        backend: NeighborBackend,
        executor: &'a AnchorExecutor,
    ) -> Self {
        let use_tree = match backend {
            NeighborBackend::BruteForce => false,
            NeighborBackend::KdTree => points.dim() <= KDTREE_MAX_DIM,
            NeighborBackend::Auto => points.len() >= KDTREE_MIN_POINTS && points.dim() <= KDTREE_MAX_DIM,
        };
        let index: Box<dyn RadiusIndex + 'a> = match use_tree.then(|| kd_index(points)).flatten() {
            Some(tree) => tree,
            None => Box::new(BruteForceIndex { points }),
        };
        debug!(backend = index.name(), points = points.len(), dim = points.dim(), time_lag, "neighbour search ready");
        Self { points, time_lag, executor, index }
    }

    pub fn points(&self) -> &EmbeddedPointSet {
        self.points
    }

    pub fn backend_name(&self) -> &'static str {
        self.index.name()
    }

    /// Smallest index distance between two eligible points.
    pub fn min_separation(&self) -> usize {
        self.time_lag.max(1)
    }

    pub fn is_eligible(&self, i: usize, j: usize) -> bool {
        i.abs_diff(j) >= self.min_separation()
    }

    /// Number of unordered pairs that survive temporal exclusion.
    pub fn eligible_pair_count(&self) -> u64 {
        let n = self.points.len();
        let sep = self.min_separation();
        if n <= sep {
            return 0;
        }
        let m = (n - sep) as u64;
        m * (m + 1) / 2
    }

    fn forward_candidates(&self, anchor: usize, candidates: &Range<usize>) -> Range<usize> {
        let start = anchor.saturating_add(self.min_separation()).max(candidates.start);
        let end = candidates.end.min(self.points.len());
        start..end.max(start)
    }

    pub fn neighbor_set(&self, anchor: usize, policy: SelectionPolicy, candidates: Range<usize>) -> Result<NeighborSet> {
        policy.validate()?;
        if anchor >= self.points.len() {
            return Err(CorrSumError::invalid(format!(
                "anchor {anchor} out of range for {} points",
                self.points.len()
            )));
        }
        self.select(anchor, policy, &candidates).map_err(CorrSumError::from)
    }

    fn select(&self, anchor: usize, policy: SelectionPolicy, candidates: &Range<usize>) -> std::result::Result<NeighborSet, SkippedAnchor> {
        match policy {
            SelectionPolicy::Threshold(r) => {
                let end = candidates.end.min(self.points.len());
                let neighbors = self
                    .index
                    .within(anchor, r * r, candidates.start.min(end)..end)
                    .into_iter()
                    .filter(|&(j, _)| self.is_eligible(anchor, j))
                    .map(|(index, d2)| Neighbor { index, distance: d2.sqrt() })
                    .collect();
                Ok(NeighborSet { anchor, neighbors })
            }
            SelectionPolicy::Nearest(k) => self.nearest(anchor, k, candidates),
        }
    }

    fn nearest(&self, anchor: usize, k: usize, candidates: &Range<usize>) -> std::result::Result<NeighborSet, SkippedAnchor> {
        let end = candidates.end.min(self.points.len());
        let mut cands: Vec<Neighbor> = (candidates.start..end)
            .filter(|&j| self.is_eligible(anchor, j))
            .map(|j| Neighbor { index: j, distance: self.points.squared_distance(anchor, j) })
            .collect();
        if cands.len() < k {
            return Err(SkippedAnchor { anchor, required: k, available: cands.len() });
        }
        if cands.len() > k {
            cands.select_nth_unstable_by(k - 1, cmp_neighbors);
            cands.truncate(k);
        }
        cands.sort_unstable_by(cmp_neighbors);
        for c in cands.iter_mut() {
            c.distance = c.distance.sqrt();
        }
        Ok(NeighborSet { anchor, neighbors: cands })
    }

    /// Search every anchor in `anchors`; k-NN anchors without enough candidates are skipped.
    pub fn search(&self, anchors: Range<usize>, policy: SelectionPolicy, candidates: Range<usize>) -> Result<SearchOutcome> {
        policy.validate()?;
        let end = anchors.end.min(self.points.len());
        let results = self
            .executor
            .map(anchors.start..end.max(anchors.start), |i| self.select(i, policy, &candidates))?;

        let mut outcome = SearchOutcome::default();
        for r in results {
            match r {
                Ok(set) => {
                    outcome.pair_count += set.len() as u64;
                    outcome.sets.push(set);
                }
                Err(skipped) => outcome.skipped.push(skipped),
            }
        }
        if !outcome.skipped.is_empty() {
            debug!(skipped = outcome.skipped.len(), "anchors without enough eligible neighbours");
        }
        Ok(outcome)
    }

    /// All eligible `(i, j)` with `i < j` and distance below `radius`, ordered by `(i, j)`.
    pub fn forward_pairs(&self, radius: f64) -> Result<Vec<(usize, usize)>> {
        SelectionPolicy::Threshold(radius).validate()?;
        let n = self.points.len();
        let all = 0..n;
        let radius_sq = radius * radius;
        let per_anchor = self
            .executor
            .map(0..n, |i| self.index.within(i, radius_sq, self.forward_candidates(i, &all)))?;
        Ok(per_anchor
            .into_iter()
            .enumerate()
            .flat_map(|(i, hits)| hits.into_iter().map(move |(j, _)| (i, j)))
            .collect())
    }

    /// Eligible unordered pairs with distance below each radius, in a single pass.
    pub fn pair_counts(&self, radii: &[f64]) -> Result<Vec<u64>> {
        for &r in radii {
            SelectionPolicy::Threshold(r).validate()?;
        }
        if radii.is_empty() {
            return Ok(Vec::new());
        }

        let mut order: Vec<usize> = (0..radii.len()).collect();
        order.sort_by(|&a, &b| radii[a].total_cmp(&radii[b]));
        let sorted_sq: Vec<f64> = order.iter().map(|&k| radii[k] * radii[k]).collect();
        let max_sq = sorted_sq[sorted_sq.len() - 1];
        let n = self.points.len();
        let all = 0..n;

        let per_anchor = self.executor.map(0..n, |i| {
            let mut hist = vec![0u64; sorted_sq.len()];
            for (_, d2) in self.index.within(i, max_sq, self.forward_candidates(i, &all)) {
                // first radius whose square exceeds d2
                let slot = sorted_sq.partition_point(|&r2| r2 <= d2);
                if let Some(h) = hist.get_mut(slot) {
                    *h += 1;
                }
            }
            hist
        })?;

        let mut hist = vec![0u64; sorted_sq.len()];
        for h in per_anchor {
            for (acc, v) in hist.iter_mut().zip(h) {
                *acc += v;
            }
        }
        let mut cumulative = 0u64;
        let mut counts = vec![0u64; radii.len()];
        for (pos, &k) in order.iter().enumerate() {
            cumulative += hist[pos];
            counts[k] = cumulative;
        }
        Ok(counts)
    }

    pub fn pair_count(&self, radius: f64) -> Result<u64> {
        Ok(self.pair_counts(&[radius])?[0])
    }
}
