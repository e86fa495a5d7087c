// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use kiddo::{ImmutableKdTree, SquaredEuclidean};
use ndarray::Array2;
use std::ops::Range;

/// Squared Euclidean distance between two coordinate slices of equal length.
#[inline]
pub fn squared_euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Delay-embedded point set.
///
/// Row `i` holds the vector anchored at base index `i` of the source series, so
/// base indices and row indices coincide. Coordinates are stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedPointSet {
    coords: Vec<f64>,
    pub n: usize,
    pub dim: usize,
    pub time_step: usize,
}

impl EmbeddedPointSet {
    pub(crate) fn from_coords(coords: Vec<f64>, dim: usize, time_step: usize) -> Self {
        debug_assert!(dim >= 1 && coords.len() % dim == 0);
        let n = coords.len() / dim;
        Self { coords, n, dim, time_step }
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Offset from the base index to the last sample of a window, `(d-1)s`.
    pub fn span(&self) -> usize {
        (self.dim - 1) * self.time_step
    }

    /// Number of series samples spanned by one vector, `(d-1)s + 1`.
    pub fn window_length(&self) -> usize {
        self.span() + 1
    }

    pub fn point(&self, i: usize) -> &[f64] {
        &self.coords[i * self.dim..(i + 1) * self.dim]
    }

    pub fn squared_distance(&self, i: usize, j: usize) -> f64 {
        squared_euclidean(self.point(i), self.point(j))
    }

    pub fn distance(&self, i: usize, j: usize) -> f64 {
        self.squared_distance(i, j).sqrt()
    }

    /// Return the point set as a 2D array (points x coordinates)
    pub fn to_array2(&self) -> Array2<f64> {
        Array2::from_shape_fn((self.n, self.dim), |(r, c)| self.coords[r * self.dim + c])
    }

    fn to_points<const K: usize>(&self) -> Vec<[f64; K]> {
        assert!(self.dim == K, "point dimension must equal K");
        let mut points: Vec<[f64; K]> = Vec::with_capacity(self.n);
        for chunk in self.coords.chunks_exact(K) {
            let mut p = [0.0; K];
            p.copy_from_slice(chunk);
            points.push(p);
        }
        points
    }
}

/// KD-tree over an embedded point set for radius queries.
pub struct KdIndex<const K: usize> {
    pub points: Vec<[f64; K]>,
    pub tree: ImmutableKdTree<f64, K>,
}

impl<const K: usize> KdIndex<K> {
    pub fn from_point_set(set: &EmbeddedPointSet) -> Self {
        let points = set.to_points::<K>();
        let tree = ImmutableKdTree::new_from_slice(&points);
        Self { points, tree }
    }

    /// Points with squared distance strictly below `radius_sq` whose index lies in
    /// `candidates`, as `(index, squared distance)` sorted by index.
    ///
    /// Distances are recomputed from the stored coordinates so the cut-off matches
    /// the brute-force scan exactly.
    pub fn within(&self, anchor: usize, radius_sq: f64, candidates: Range<usize>) -> Vec<(usize, f64)> {
        let query = &self.points[anchor];
        let mut out: Vec<(usize, f64)> = self
            .tree
            .within_unsorted::<SquaredEuclidean>(query, radius_sq)
            .into_iter()
            .filter_map(|nn| {
                let j = nn.item as usize;
                if !candidates.contains(&j) {
                    return None;
                }
                let d2 = squared_euclidean(query, &self.points[j]);
                (d2 < radius_sq).then_some((j, d2))
            })
            .collect();
        out.sort_unstable_by_key(|&(j, _)| j);
        out
    }
}
