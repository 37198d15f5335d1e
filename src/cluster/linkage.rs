//! Agglomerative linkage: Ward's minimum-variance method.
//!
//! # The Algorithm (Ward, 1963)
//!
//! Start with every point in its own cluster. Repeatedly merge the two
//! clusters whose union increases the total within-cluster sum of squares
//! (SSE) the least. For clusters `A` and `B` with centroids `a`, `b`:
//!
//! ```text
//! ΔSSE(A, B) = |A|·|B| / (|A| + |B|) · ||a - b||²
//! ```
//!
//! ## Lance–Williams update
//!
//! Centroids are never materialized. Starting from squared Euclidean
//! distances, the quantity `D = 2·ΔSSE` obeys
//!
//! ```text
//! D(A∪B, C) = ((|A|+|C|)·D(A,C) + (|B|+|C|)·D(B,C) - |C|·D(A,B)) / (|A|+|B|+|C|)
//! ```
//!
//! so each merge costs O(n) row updates. Candidate pairs sit in a binary heap;
//! entries that mention a cluster which has since been merged are skipped when
//! popped. Total: O(n² log n) time, O(n²) memory.
//!
//! ## Ties
//!
//! Each cluster is keyed by the lowest original index it contains. Among
//! pairs of equal cost, the pair with the lexicographically lowest
//! `(key, key)` merges first, so identical input always yields the identical
//! tree.
//!
//! ## Heights
//!
//! The recorded merge height is `sqrt(D)`: for two singletons this is their
//! Euclidean distance. Ward heights never decrease along the merge order.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::dendrogram::{Dendrogram, Merge};
use super::traits::Clustering;
use super::util::{self, validate_points};
use crate::error::{Error, Result};

/// Linkage strategy used to build the dendrogram.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LinkageMetric {
    /// Ward's minimum-variance linkage over squared Euclidean distance.
    #[default]
    Ward,
}

impl LinkageMetric {
    /// Build a dendrogram over `data` with this linkage.
    pub fn build(self, data: &[Vec<f64>]) -> Result<Dendrogram> {
        match self {
            LinkageMetric::Ward => ward_linkage(data),
        }
    }
}

/// Ward clustering cut at a fixed number of clusters.
#[derive(Debug, Clone)]
pub struct Ward {
    n_clusters: usize,
}

impl Ward {
    /// Create a Ward clusterer that cuts the tree at `n_clusters` groups.
    pub fn new(n_clusters: usize) -> Self {
        Self { n_clusters }
    }

    /// Set the number of clusters.
    pub fn with_n_clusters(mut self, n_clusters: usize) -> Self {
        self.n_clusters = n_clusters;
        self
    }
}

impl Clustering for Ward {
    fn fit_predict(&self, data: &[Vec<f64>]) -> Result<Vec<usize>> {
        if self.n_clusters == 0 || self.n_clusters > data.len() {
            return Err(Error::InvalidClusterCount {
                requested: self.n_clusters,
                n_items: data.len(),
            });
        }
        Ok(ward_linkage(data)?.cut(self.n_clusters)?.into_labels())
    }

    fn n_clusters(&self) -> usize {
        self.n_clusters
    }
}

/// A candidate merge between the clusters living in slots `a < b`.
///
/// A slot is the lowest original index of the cluster it holds, so `(a, b)`
/// doubles as the tie-break key. `node_a`/`node_b` pin the dendrogram nodes the
/// cost was computed for; a later merge into either slot makes this stale.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    cost: f64,
    a: usize,
    b: usize,
    node_a: usize,
    node_b: usize,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    // `BinaryHeap` pops the greatest element: cheapest cost, then lowest key.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.a.cmp(&self.a))
            .then_with(|| other.b.cmp(&self.b))
    }
}

/// Build a Ward-linkage dendrogram over dense vectors.
pub fn ward_linkage(data: &[Vec<f64>]) -> Result<Dendrogram> {
    let n = data.len();
    if n < 2 {
        return Err(Error::InsufficientProteins { found: n });
    }
    validate_points(data)?;

    let mut dist = vec![0.0f64; n * n];
    for i in 0..n {
        for j in (i + 1)..n {
            let d = util::squared_euclidean(&data[i], &data[j]);
            dist[i * n + j] = d;
            dist[j * n + i] = d;
        }
    }

    let mut size = vec![1usize; n];
    let mut node: Vec<usize> = (0..n).collect();
    let mut active = vec![true; n];

    let mut heap = BinaryHeap::with_capacity(n * (n - 1) / 2);
    for a in 0..n {
        for b in (a + 1)..n {
            heap.push(Candidate {
                cost: dist[a * n + b],
                a,
                b,
                node_a: a,
                node_b: b,
            });
        }
    }

    let mut merges: Vec<Merge> = Vec::with_capacity(n - 1);
    while merges.len() < n - 1 {
        let Some(c) = heap.pop() else {
            break;
        };
        let (a, b) = (c.a, c.b);
        if !active[a] || !active[b] || node[a] != c.node_a || node[b] != c.node_b {
            continue;
        }

        let new_node = n + merges.len();
        let (size_a, size_b) = (size[a], size[b]);
        merges.push(Merge {
            left: node[a],
            right: node[b],
            distance: c.cost.sqrt(),
            size: size_a + size_b,
        });

        // The union keeps slot `a`, which still holds its lowest original index.
        let d_ab = dist[a * n + b];
        active[b] = false;
        for k in 0..n {
            if !active[k] || k == a {
                continue;
            }
            let (sa, sb, sk) = (size_a as f64, size_b as f64, size[k] as f64);
            let updated = non_negative(
                ((sa + sk) * dist[a * n + k] + (sb + sk) * dist[b * n + k] - sk * d_ab)
                    / (sa + sb + sk),
            );
            dist[a * n + k] = updated;
            dist[k * n + a] = updated;
        }
        size[a] = size_a + size_b;
        node[a] = new_node;

        for k in 0..n {
            if !active[k] || k == a {
                continue;
            }
            let (lo, hi) = if k < a { (k, a) } else { (a, k) };
            heap.push(Candidate {
                cost: dist[lo * n + hi],
                a: lo,
                b: hi,
                node_a: node[lo],
                node_b: node[hi],
            });
        }
    }

    log::debug!("ward linkage: {} leaves, {} merges", n, merges.len());
    Dendrogram::from_merges(n, merges)
}

/// Clamp rounding noise below zero, normalizing `-0.0` so ties compare equal.
#[inline]
fn non_negative(x: f64) -> f64 {
    if x > 0.0 {
        x
    } else {
        0.0
    }
}
