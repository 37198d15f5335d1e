//! Correlation-space clustering of protein abundance tables.
//!
//! `protclump` groups co-regulated proteins. Given a samples × proteins
//! abundance table it:
//!
//! 1. correlates every pair of proteins ([`CorrelationMatrix`]), Pearson by
//!    default, Spearman or Kendall on request;
//! 2. treats each protein's correlation row as its feature vector;
//! 3. builds a Ward-linkage [`Dendrogram`] over those vectors;
//! 4. cuts the tree at every candidate `k` and keeps the cut with the lowest
//!    Davies–Bouldin index ([`ClusterCountSelector`]);
//! 5. returns a [`ClusterAssignment`] (accession → cluster id).
//!
//! [`AnnotationSummary`] then intersects the clusters with a caller-supplied
//! accession → GO-term mapping.
//!
//! ```rust
//! use protclump::{analyze, AbundanceTable, AnalysisConfig};
//!
//! let accessions = ["P05067", "P06733", "P08238", "O00468-6", "Q15149-4"]
//!     .iter()
//!     .map(|s| s.to_string())
//!     .collect();
//! let table = AbundanceTable::new(
//!     accessions,
//!     vec![
//!         1.0, 2.0, 3.0, 9.0, 17.5, //
//!         2.0, 3.1, 4.2, 7.0, 14.8, //
//!         3.0, 4.0, 6.1, 5.2, 9.9, //
//!         4.0, 5.2, 7.9, 2.9, 6.3, //
//!         5.0, 5.9, 9.8, 1.0, 1.9, //
//!     ],
//! )
//! .unwrap();
//!
//! let analysis = analyze(&table, &AnalysisConfig::default()).unwrap();
//! let assignment = analysis.assignment();
//! assert_eq!(assignment.n_clusters(), 2);
//! assert_eq!(assignment.cluster_of("P05067"), assignment.cluster_of("P08238"));
//! assert_ne!(assignment.cluster_of("P05067"), assignment.cluster_of("O00468-6"));
//! ```
//!
//! Everything is deterministic: the same table and configuration give
//! bit-identical assignments and scores, with or without the `parallel`
//! feature.

#![forbid(unsafe_code)]

pub mod annotation;
pub mod assignment;
pub mod cluster;
pub mod correlation;
pub mod error;
pub mod pipeline;
pub mod select;
pub mod table;

pub use annotation::{AnnotationSummary, ClusterAnnotation};
pub use assignment::ClusterAssignment;
pub use cluster::{
    davies_bouldin, ward_linkage, ClusterCut, Clustering, Dendrogram, LinkageMetric, Merge, Ward,
};
pub use correlation::{CorrelationMatrix, CorrelationMethod};
pub use error::{Error, Result};
pub use pipeline::{analyze, Analysis, AnalysisConfig};
pub use select::{ClusterCountSelector, Selection, SelectionConfig};
pub use table::AbundanceTable;
