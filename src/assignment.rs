//! The terminal artifact: which cluster each protein belongs to.

use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Protein accession → cluster id, at a chosen cluster count.
///
/// Cluster ids are `0..n_clusters()`, numbered by first appearance in
/// accession order. `score` is the Davies–Bouldin index of this partition.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "RawAssignment", into = "RawAssignment")
)]
pub struct ClusterAssignment {
    accessions: Vec<String>,
    index: HashMap<String, usize>,
    labels: Vec<usize>,
    n_clusters: usize,
    score: f64,
}

/// Wire form of [`ClusterAssignment`]; decoding re-runs its validation.
#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
struct RawAssignment {
    accessions: Vec<String>,
    labels: Vec<usize>,
    n_clusters: usize,
    score: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawAssignment> for ClusterAssignment {
    type Error = Error;

    fn try_from(raw: RawAssignment) -> Result<Self> {
        let assignment = Self::new(raw.accessions, raw.labels, raw.score)?;
        if assignment.n_clusters != raw.n_clusters {
            return Err(Error::InvalidParameter {
                name: "n_clusters",
                message: "must equal the number of distinct labels",
            });
        }
        Ok(assignment)
    }
}

#[cfg(feature = "serde")]
impl From<ClusterAssignment> for RawAssignment {
    fn from(a: ClusterAssignment) -> Self {
        Self {
            accessions: a.accessions,
            labels: a.labels,
            n_clusters: a.n_clusters,
            score: a.score,
        }
    }
}

impl ClusterAssignment {
    /// Pair accessions with labels.
    ///
    /// Accessions must be distinct. Labels must cover exactly `0..n_clusters`,
    /// with no empty cluster.
    pub fn new(accessions: Vec<String>, labels: Vec<usize>, score: f64) -> Result<Self> {
        if accessions.is_empty() {
            return Err(Error::EmptyInput);
        }
        if accessions.len() != labels.len() {
            return Err(Error::DimensionMismatch {
                expected: accessions.len(),
                found: labels.len(),
            });
        }

        let mut index = HashMap::with_capacity(accessions.len());
        for (i, accession) in accessions.iter().enumerate() {
            if index.insert(accession.clone(), i).is_some() {
                return Err(Error::DuplicateAccession {
                    accession: accession.clone(),
                });
            }
        }

        let n_clusters = labels.iter().max().map_or(0, |&m| m + 1);
        let mut populated = vec![false; n_clusters];
        for &label in &labels {
            populated[label] = true;
        }
        if populated.iter().any(|&p| !p) {
            return Err(Error::InvalidParameter {
                name: "labels",
                message: "every cluster id below the maximum must be used",
            });
        }

        Ok(Self {
            accessions,
            index,
            labels,
            n_clusters,
            score,
        })
    }

    /// Number of proteins.
    pub fn len(&self) -> usize {
        self.accessions.len()
    }

    /// Always `false`: an assignment covers at least one protein.
    pub fn is_empty(&self) -> bool {
        self.accessions.is_empty()
    }

    /// Number of clusters (the selected `k`).
    pub fn n_clusters(&self) -> usize {
        self.n_clusters
    }

    /// Davies–Bouldin index of this partition.
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Accessions in column order.
    pub fn accessions(&self) -> &[String] {
        &self.accessions
    }

    /// Cluster id per protein, aligned with [`accessions`](Self::accessions).
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Cluster of `accession`, if it was clustered.
    pub fn cluster_of(&self, accession: &str) -> Option<usize> {
        self.index.get(accession).map(|&i| self.labels[i])
    }

    /// `(accession, cluster)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.accessions
            .iter()
            .map(String::as_str)
            .zip(self.labels.iter().copied())
    }

    /// Accessions in `cluster`, in column order. Empty if out of range.
    pub fn members(&self, cluster: usize) -> Vec<&str> {
        self.iter()
            .filter(|&(_, c)| c == cluster)
            .map(|(a, _)| a)
            .collect()
    }

    /// Members of every cluster, indexed by cluster id.
    pub fn clusters(&self) -> Vec<Vec<&str>> {
        let mut out = vec![Vec::new(); self.n_clusters];
        for (accession, cluster) in self.iter() {
            out[cluster].push(accession);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ClusterAssignment {
        ClusterAssignment::new(
            vec!["P05067".into(), "O00468-6".into(), "P08238".into()],
            vec![0, 1, 0],
            0.25,
        )
        .unwrap()
    }

    #[test]
    fn test_lookup_and_iteration() {
        let a = sample();
        assert_eq!(a.len(), 3);
        assert!(!a.is_empty());
        assert_eq!(a.n_clusters(), 2);
        assert_eq!(a.score(), 0.25);
        assert_eq!(a.cluster_of("O00468-6"), Some(1));
        assert_eq!(a.cluster_of("Q99999"), None);
        assert_eq!(a.members(0), vec!["P05067", "P08238"]);
        assert!(a.members(5).is_empty());
        assert_eq!(a.clusters(), vec![vec!["P05067", "P08238"], vec!["O00468-6"]]);

        let pairs: Vec<(&str, usize)> = a.iter().collect();
        assert_eq!(pairs[1], ("O00468-6", 1));
    }

    #[test]
    fn test_equality_is_structural() {
        assert_eq!(sample(), sample());
        let other = ClusterAssignment::new(
            vec!["P05067".into(), "O00468-6".into(), "P08238".into()],
            vec![0, 0, 1],
            0.25,
        )
        .unwrap();
        assert_ne!(sample(), other);
    }

    #[test]
    fn test_rejects_bad_labels() {
        assert!(ClusterAssignment::new(vec!["A".into()], vec![0, 1], 0.0).is_err());
        assert!(ClusterAssignment::new(vec!["A".into(), "B".into()], vec![0, 2], 0.0).is_err());
        assert_eq!(
            ClusterAssignment::new(Vec::new(), Vec::new(), 0.0).unwrap_err(),
            Error::EmptyInput
        );
        assert_eq!(
            ClusterAssignment::new(vec!["A".into(), "A".into()], vec![0, 1], 0.0).unwrap_err(),
            Error::DuplicateAccession {
                accession: "A".to_string()
            }
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_validates() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert!(!json.contains("index"));
        let back: ClusterAssignment = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sample());
        assert_eq!(back.cluster_of("P08238"), Some(0));

        let gap = r#"{"accessions":["A","B"],"labels":[0,5],"n_clusters":1,"score":0.0}"#;
        assert!(serde_json::from_str::<ClusterAssignment>(gap).is_err());

        let wrong_k = r#"{"accessions":["A","B"],"labels":[0,1],"n_clusters":3,"score":0.0}"#;
        assert!(serde_json::from_str::<ClusterAssignment>(wrong_k).is_err());
    }
}
