//! Automatic cluster-count selection.
//!
//! The dendrogram is cut at every `k` in `k_min..=k_max`, each cut is scored
//! with the Davies–Bouldin index in the space the tree was built from, and the
//! lowest score wins. Equal scores prefer the smaller `k`.
//!
//! `k = 1` is never a candidate: the index needs two clusters to compare. `k`
//! is also capped at `n - 1`, since `n` singletons have zero scatter and would
//! trivially score 0.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::assignment::ClusterAssignment;
use crate::cluster::{
    davies_bouldin_with_tolerance, Dendrogram, LinkageMetric, DEFAULT_DEGENERATE_TOLERANCE,
};
use crate::error::{Error, Result};

/// Upper bound for the default `k_max`.
pub const DEFAULT_MAX_CLUSTERS: usize = 10;

/// Search-range and scoring options.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SelectionConfig {
    /// Smallest candidate cluster count. Must be at least 2.
    pub k_min: usize,

    /// Largest candidate cluster count; `None` means `min(10, n - 1)`.
    pub k_max: Option<usize>,

    /// Linkage used to build the dendrogram.
    pub linkage: LinkageMetric,

    /// Centroid distances at or below this make a cut degenerate.
    pub degenerate_tolerance: f64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            k_min: 2,
            k_max: None,
            linkage: LinkageMetric::Ward,
            degenerate_tolerance: DEFAULT_DEGENERATE_TOLERANCE,
        }
    }
}

impl SelectionConfig {
    /// Create a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the smallest candidate cluster count.
    pub fn with_k_min(mut self, k_min: usize) -> Self {
        self.k_min = k_min;
        self
    }

    /// Set the largest candidate cluster count.
    pub fn with_k_max(mut self, k_max: usize) -> Self {
        self.k_max = Some(k_max);
        self
    }

    /// Set both bounds at once.
    pub fn with_range(self, k_min: usize, k_max: usize) -> Self {
        self.with_k_min(k_min).with_k_max(k_max)
    }

    /// Set the linkage.
    pub fn with_linkage(mut self, linkage: LinkageMetric) -> Self {
        self.linkage = linkage;
        self
    }

    /// Set the coincident-centroid tolerance.
    pub fn with_degenerate_tolerance(mut self, tolerance: f64) -> Self {
        self.degenerate_tolerance = tolerance;
        self
    }

    /// Concrete `(k_min, k_max)` for `n_proteins`, or `InvalidRange`.
    pub fn resolve_range(&self, n_proteins: usize) -> Result<(usize, usize)> {
        let k_max = self
            .k_max
            .unwrap_or_else(|| DEFAULT_MAX_CLUSTERS.min(n_proteins.saturating_sub(1)));
        let k_min = self.k_min;

        if k_min < 2 || k_min > k_max || k_max >= n_proteins {
            return Err(Error::InvalidRange {
                k_min,
                k_max,
                n_proteins,
            });
        }
        Ok((k_min, k_max))
    }

    fn validate_tolerance(&self) -> Result<()> {
        if !(self.degenerate_tolerance >= 0.0 && self.degenerate_tolerance.is_finite()) {
            return Err(Error::InvalidParameter {
                name: "degenerate_tolerance",
                message: "must be finite and non-negative",
            });
        }
        Ok(())
    }
}

/// Outcome of a cluster-count search.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Selection {
    /// The winning partition.
    pub assignment: ClusterAssignment,

    /// `(k, score)` for every candidate, ascending in `k`. Degenerate cuts
    /// score `f64::INFINITY`.
    pub scores: Vec<(usize, f64)>,
}

impl Selection {
    /// The selected cluster count.
    pub fn k(&self) -> usize {
        self.assignment.n_clusters()
    }

    /// Davies–Bouldin score of the selected cut.
    pub fn score(&self) -> f64 {
        self.assignment.score()
    }
}

/// Picks the cluster count that minimizes the Davies–Bouldin index.
#[derive(Debug, Clone, Default)]
pub struct ClusterCountSelector {
    config: SelectionConfig,
}

impl ClusterCountSelector {
    /// Create a selector.
    pub fn new(config: SelectionConfig) -> Self {
        Self { config }
    }

    /// Access the configuration.
    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    /// Score every candidate cut of `dendrogram` and return the best.
    ///
    /// `features` are the vectors the dendrogram was built from and
    /// `accessions` label its leaves, both in leaf order.
    pub fn select(
        &self,
        dendrogram: &Dendrogram,
        features: &[Vec<f64>],
        accessions: &[String],
    ) -> Result<Selection> {
        let n = dendrogram.n_leaves();
        for len in [features.len(), accessions.len()] {
            if len != n {
                return Err(Error::DimensionMismatch {
                    expected: n,
                    found: len,
                });
            }
        }

        let (k_min, k_max) = self.config.resolve_range(n)?;
        self.config.validate_tolerance()?;

        let scores = self.score_range(dendrogram, features, k_min, k_max)?;

        let mut best: Option<(usize, f64)> = None;
        for &(k, score) in &scores {
            if !score.is_finite() {
                log::warn!("cut at k={k} is degenerate; skipping");
                continue;
            }
            log::debug!("davies-bouldin k={k}: {score:.6}");
            if best.map_or(true, |(_, b)| score < b) {
                best = Some((k, score));
            }
        }

        let (k, score) = best.ok_or(Error::NoValidCutFound { k_min, k_max })?;
        log::info!("selected k={k} (davies-bouldin {score:.6}) from {k_min}..={k_max}");

        let labels = dendrogram.cut(k)?.into_labels();
        let assignment = ClusterAssignment::new(accessions.to_vec(), labels, score)?;
        Ok(Selection { assignment, scores })
    }

    fn score_range(
        &self,
        dendrogram: &Dendrogram,
        features: &[Vec<f64>],
        k_min: usize,
        k_max: usize,
    ) -> Result<Vec<(usize, f64)>> {
        let tolerance = self.config.degenerate_tolerance;
        let score_k = |k: usize| -> Result<(usize, f64)> {
            let cut = dendrogram.cut(k)?;
            let score = davies_bouldin_with_tolerance(features, cut.labels(), tolerance)?;
            Ok((k, score))
        };

        #[cfg(feature = "parallel")]
        {
            (k_min..=k_max).into_par_iter().map(score_k).collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            (k_min..=k_max).map(score_k).collect()
        }
    }
}
