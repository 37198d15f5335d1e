//! Binary merge trees and flat cuts.
//!
//! Node ids follow the usual agglomerative convention: leaves are `0..n`, and
//! merge `i` creates node `n + i`. The root is the last merge, `2n - 2`.
//!
//! A cut at `k` keeps the first `n - k` merges and drops the last `k - 1`,
//! leaving exactly `k` groups. Cuts only read the tree, so any number of them
//! can be taken from one dendrogram (and concurrently).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::util::UnionFind;
use crate::error::{Error, Result};

/// One internal node of a dendrogram.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Merge {
    /// Node id of the first child (the one holding the lower leaf index).
    pub left: usize,

    /// Node id of the second child.
    pub right: usize,

    /// Merge height.
    pub distance: f64,

    /// Number of leaves under this node.
    pub size: usize,
}

/// Complete merge history over `n` leaves.
///
/// Deserialization goes through [`Dendrogram::from_merges`], so a decoded
/// tree satisfies the same invariants as a constructed one.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawDendrogram"))]
pub struct Dendrogram {
    n_leaves: usize,
    merges: Vec<Merge>,
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawDendrogram {
    n_leaves: usize,
    merges: Vec<Merge>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawDendrogram> for Dendrogram {
    type Error = Error;

    fn try_from(raw: RawDendrogram) -> Result<Self> {
        Self::from_merges(raw.n_leaves, raw.merges)
    }
}

impl Dendrogram {
    /// Assemble a dendrogram from merges in the order they were performed.
    ///
    /// Every child id must refer to a leaf or to an earlier merge, and each node
    /// may be consumed once. The merges must join everything into one root.
    pub fn from_merges(n_leaves: usize, merges: Vec<Merge>) -> Result<Self> {
        if n_leaves == 0 {
            return Err(Error::EmptyInput);
        }
        if merges.len() != n_leaves - 1 {
            return Err(Error::InvalidParameter {
                name: "merges",
                message: "must contain exactly n_leaves - 1 merges",
            });
        }

        let mut size = vec![1usize; n_leaves];
        let mut used = vec![false; 2 * n_leaves - 1];
        for (i, m) in merges.iter().enumerate() {
            let node = n_leaves + i;
            if m.left >= node || m.right >= node || m.left == m.right {
                return Err(Error::InvalidParameter {
                    name: "merges",
                    message: "children must be distinct earlier nodes",
                });
            }
            if used[m.left] || used[m.right] {
                return Err(Error::InvalidParameter {
                    name: "merges",
                    message: "a node was merged twice",
                });
            }
            used[m.left] = true;
            used[m.right] = true;
            if m.size != size[m.left] + size[m.right] {
                return Err(Error::InvalidParameter {
                    name: "merges",
                    message: "size must equal the sum of child sizes",
                });
            }
            size.push(m.size);
        }

        Ok(Self { n_leaves, merges })
    }

    /// Number of leaves (clustered items).
    pub fn n_leaves(&self) -> usize {
        self.n_leaves
    }

    /// Merges in the order they were performed.
    pub fn merges(&self) -> &[Merge] {
        &self.merges
    }

    /// Root node id.
    pub fn root(&self) -> usize {
        2 * self.n_leaves - 2
    }

    /// Merge heights, in merge order.
    pub fn heights(&self) -> Vec<f64> {
        self.merges.iter().map(|m| m.distance).collect()
    }

    /// Number of leaves under `node`, or `None` if the id is out of range.
    pub fn node_size(&self, node: usize) -> Option<usize> {
        if node < self.n_leaves {
            Some(1)
        } else {
            self.merges.get(node - self.n_leaves).map(|m| m.size)
        }
    }

    /// Partition the leaves into exactly `k` groups.
    pub fn cut(&self, k: usize) -> Result<ClusterCut> {
        let n = self.n_leaves;
        if k == 0 || k > n {
            return Err(Error::InvalidClusterCount {
                requested: k,
                n_items: n,
            });
        }

        // Any leaf under a node stands in for that node in the union-find.
        let mut leaf_of: Vec<usize> = (0..n).collect();
        leaf_of.reserve(self.merges.len());
        for m in &self.merges {
            leaf_of.push(leaf_of[m.left]);
        }

        let mut uf = UnionFind::new(n);
        for m in &self.merges[..n - k] {
            uf.union(leaf_of[m.left], leaf_of[m.right]);
        }

        // Number clusters in order of first appearance.
        let mut root_label = vec![usize::MAX; n];
        let mut labels = Vec::with_capacity(n);
        let mut next = 0usize;
        for leaf in 0..n {
            let root = uf.find(leaf);
            if root_label[root] == usize::MAX {
                root_label[root] = next;
                next += 1;
            }
            labels.push(root_label[root]);
        }
        debug_assert_eq!(next, k);

        Ok(ClusterCut { k, labels })
    }
}

/// A flat partition taken from a dendrogram.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClusterCut {
    k: usize,
    labels: Vec<usize>,
}

impl ClusterCut {
    /// Number of clusters.
    pub fn n_clusters(&self) -> usize {
        self.k
    }

    /// Cluster label per leaf, in `0..k`.
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Leaf indices per cluster, each list in ascending order.
    pub fn members(&self) -> Vec<Vec<usize>> {
        let mut out = vec![Vec::new(); self.k];
        for (leaf, &label) in self.labels.iter().enumerate() {
            out[label].push(leaf);
        }
        out
    }

    pub(crate) fn into_labels(self) -> Vec<usize> {
        self.labels
    }
}
