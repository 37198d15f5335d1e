//! Cluster-validity scoring.
//!
//! # Davies–Bouldin index (Davies & Bouldin, 1979)
//!
//! For clusters `i` with centroid `c_i` and scatter `s_i` (mean Euclidean
//! distance of members to `c_i`):
//!
//! ```text
//! R_ij = (s_i + s_j) / ||c_i - c_j||
//! D_i  = max_{j != i} R_ij
//! DB   = mean_i D_i
//! ```
//!
//! Lower is better: tight clusters far from their nearest neighbour score low.
//!
//! ## Degenerate cuts
//!
//! When two centroids coincide the ratio is undefined. Rather than dividing by
//! zero (or returning 0 the way some libraries do), such a cut scores
//! `f64::INFINITY`, which a minimizing search never prefers over a finite
//! score. A partition with fewer than two clusters is scored the same way.

use super::util::{self, validate_points};
use crate::error::{Error, Result};

/// Centroid distances at or below this are treated as coincident.
pub const DEFAULT_DEGENERATE_TOLERANCE: f64 = 1e-12;

/// Davies–Bouldin index of `labels` over `data`.
///
/// Uses [`DEFAULT_DEGENERATE_TOLERANCE`]. See [`davies_bouldin_with_tolerance`].
pub fn davies_bouldin(data: &[Vec<f64>], labels: &[usize]) -> Result<f64> {
    davies_bouldin_with_tolerance(data, labels, DEFAULT_DEGENERATE_TOLERANCE)
}

/// Davies–Bouldin index with an explicit coincident-centroid tolerance.
///
/// Labels need not be contiguous; only labels that occur are clusters.
/// Returns `f64::INFINITY` for degenerate partitions.
pub fn davies_bouldin_with_tolerance(
    data: &[Vec<f64>],
    labels: &[usize],
    tolerance: f64,
) -> Result<f64> {
    let d = validate_points(data)?;
    if labels.len() != data.len() {
        return Err(Error::DimensionMismatch {
            expected: data.len(),
            found: labels.len(),
        });
    }
    if !(tolerance >= 0.0 && tolerance.is_finite()) {
        return Err(Error::InvalidParameter {
            name: "degenerate_tolerance",
            message: "must be finite and non-negative",
        });
    }

    // Compact labels to 0..k in order of first appearance.
    let mut compact: Vec<usize> = Vec::with_capacity(labels.len());
    let mut seen: Vec<(usize, usize)> = Vec::new();
    for &label in labels {
        let id = match seen.iter().find(|(l, _)| *l == label) {
            Some(&(_, id)) => id,
            None => {
                seen.push((label, seen.len()));
                seen.len() - 1
            }
        };
        compact.push(id);
    }
    let k = seen.len();
    if k < 2 {
        return Ok(f64::INFINITY);
    }

    let mut centroids = vec![vec![0.0f64; d]; k];
    let mut counts = vec![0usize; k];
    for (point, &c) in data.iter().zip(&compact) {
        counts[c] += 1;
        for (acc, x) in centroids[c].iter_mut().zip(point) {
            *acc += x;
        }
    }
    for (centroid, &count) in centroids.iter_mut().zip(&counts) {
        for x in centroid.iter_mut() {
            *x /= count as f64;
        }
    }

    let mut scatter = vec![0.0f64; k];
    for (point, &c) in data.iter().zip(&compact) {
        scatter[c] += util::euclidean(point, &centroids[c]);
    }
    for (s, &count) in scatter.iter_mut().zip(&counts) {
        *s /= count as f64;
    }

    let mut worst = vec![0.0f64; k];
    for i in 0..k {
        for j in (i + 1)..k {
            let separation = util::euclidean(&centroids[i], &centroids[j]);
            if separation <= tolerance {
                return Ok(f64::INFINITY);
            }
            let r = (scatter[i] + scatter[j]) / separation;
            worst[i] = worst[i].max(r);
            worst[j] = worst[j].max(r);
        }
    }

    Ok(worst.iter().sum::<f64>() / k as f64)
}
