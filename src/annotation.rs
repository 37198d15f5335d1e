//! Per-cluster annotation bookkeeping.
//!
//! Given a cluster assignment and a protein → term-set mapping (typically GO
//! terms), report for each cluster the union of its members' terms, the terms
//! no other cluster has, and how many of those cluster-specific terms each
//! member carries. Pure set arithmetic; no enrichment statistics.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::assignment::ClusterAssignment;

static NO_TERMS: BTreeSet<String> = BTreeSet::new();

fn terms_of<'a>(
    annotations: &'a HashMap<String, BTreeSet<String>>,
    accession: &str,
) -> &'a BTreeSet<String> {
    annotations.get(accession).unwrap_or(&NO_TERMS)
}

/// Annotation view of one cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterAnnotation {
    /// Cluster id.
    pub cluster: usize,

    /// Member accessions, in column order.
    pub proteins: Vec<String>,

    /// Union of the members' terms.
    pub terms: BTreeSet<String>,

    /// Terms carried by members of this cluster and by no protein elsewhere.
    pub specific_terms: BTreeSet<String>,

    /// Per member: how many of its terms are in `specific_terms`.
    pub protein_specific_counts: BTreeMap<String, usize>,
}

impl ClusterAnnotation {
    /// Number of member proteins having each count of cluster-specific terms.
    pub fn count_histogram(&self) -> BTreeMap<usize, usize> {
        let mut hist = BTreeMap::new();
        for &count in self.protein_specific_counts.values() {
            *hist.entry(count).or_insert(0) += 1;
        }
        hist
    }
}

/// Annotation view of every cluster in an assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationSummary {
    clusters: Vec<ClusterAnnotation>,
}

impl AnnotationSummary {
    /// Intersect each cluster's membership with `annotations`.
    ///
    /// Proteins missing from `annotations` contribute no terms.
    pub fn compute(
        assignment: &ClusterAssignment,
        annotations: &HashMap<String, BTreeSet<String>>,
    ) -> Self {
        let members = assignment.clusters();
        let unions: Vec<BTreeSet<String>> = members
            .iter()
            .map(|proteins| {
                proteins
                    .iter()
                    .flat_map(|p| terms_of(annotations, p).iter().cloned())
                    .collect()
            })
            .collect();

        let mut clusters = Vec::with_capacity(members.len());
        for (cluster, proteins) in members.iter().enumerate() {
            let mut specific = unions[cluster].clone();
            for (other, terms) in unions.iter().enumerate() {
                if other != cluster {
                    specific.retain(|t| !terms.contains(t));
                }
            }

            let protein_specific_counts = proteins
                .iter()
                .map(|p| {
                    let count = terms_of(annotations, p).intersection(&specific).count();
                    ((*p).to_string(), count)
                })
                .collect();

            clusters.push(ClusterAnnotation {
                cluster,
                proteins: proteins.iter().map(|p| (*p).to_string()).collect(),
                terms: unions[cluster].clone(),
                specific_terms: specific,
                protein_specific_counts,
            });
        }

        log::debug!(
            "annotation summary: {} clusters, {} distinct terms",
            clusters.len(),
            unions.iter().flatten().collect::<BTreeSet<_>>().len()
        );

        Self { clusters }
    }

    /// One entry per cluster id.
    pub fn clusters(&self) -> &[ClusterAnnotation] {
        &self.clusters
    }

    /// Union of every cluster's terms.
    pub fn all_terms(&self) -> BTreeSet<&str> {
        self.clusters
            .iter()
            .flat_map(|c| c.terms.iter().map(String::as_str))
            .collect()
    }
}
