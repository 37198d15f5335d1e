//! Hierarchical clustering in a dense feature space.
//!
//! This module provides the clustering half of the pipeline: a linkage that
//! builds a full merge tree, flat cuts of that tree, and a validity index used
//! to compare cuts at different cluster counts.
//!
//! ## Ward linkage
//!
//! Agglomerative: every point starts alone and the pair of clusters whose
//! merge adds the least within-cluster variance is joined, until one cluster
//! remains.
//!
//! **Objective** (greedy, per step): minimize the increase of
//!
//! ```text
//! J = Σ_k Σ_{x ∈ C_k} ||x - μ_k||²
//! ```
//!
//! **Properties**:
//! - Produces compact, roughly spherical clusters
//! - Deterministic; ties resolved by lowest point index
//! - Heights are monotone, so every cut is well defined
//!
//! ## Cuts
//!
//! The tree is built once. [`Dendrogram::cut`] turns it into a `k`-way
//! partition in near-linear time, for any `k` in `1..=n`.
//!
//! ## Validity
//!
//! [`davies_bouldin`] scores a partition by comparing cluster scatter to
//! centroid separation. Lower is better.
//!
//! ## Usage
//!
//! ```rust
//! use protclump::cluster::{davies_bouldin, ward_linkage, Clustering, Ward};
//!
//! let data = vec![
//!     vec![0.0, 0.0],
//!     vec![0.1, 0.1],
//!     vec![10.0, 10.0],
//!     vec![10.1, 10.1],
//! ];
//!
//! // Fixed k through the common trait.
//! let labels = Ward::new(2).fit_predict(&data).unwrap();
//! assert_eq!(labels[0], labels[1]);
//! assert_ne!(labels[0], labels[2]);
//!
//! // Build once, cut many times.
//! let tree = ward_linkage(&data).unwrap();
//! assert_eq!(tree.merges().len(), 3);
//! let cut = tree.cut(2).unwrap();
//! let score = davies_bouldin(&data, cut.labels()).unwrap();
//! assert!(score < 0.1);
//! ```

mod dendrogram;
mod linkage;
mod traits;
mod util;
mod validity;

pub use dendrogram::{ClusterCut, Dendrogram, Merge};
pub use linkage::{ward_linkage, LinkageMetric, Ward};
pub use traits::Clustering;
pub use validity::{davies_bouldin, davies_bouldin_with_tolerance, DEFAULT_DEGENERATE_TOLERANCE};
