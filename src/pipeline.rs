//! One-call analysis: abundance table → correlation space → Ward tree →
//! selected cluster assignment.
//!
//! Each stage consumes the previous stage's complete output. The intermediate
//! artifacts are kept on [`Analysis`] so callers can inspect the correlation
//! matrix, the tree, or the whole score curve, not just the winning cut.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::assignment::ClusterAssignment;
use crate::cluster::Dendrogram;
use crate::correlation::{CorrelationMatrix, CorrelationMethod};
use crate::error::{Error, Result};
use crate::select::{ClusterCountSelector, Selection, SelectionConfig};
use crate::table::AbundanceTable;

/// Options for [`analyze`].
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AnalysisConfig {
    /// Correlation coefficient for the feature space.
    pub correlation: CorrelationMethod,

    /// Cluster-count search.
    pub selection: SelectionConfig,
}

impl AnalysisConfig {
    /// Create a config with defaults (Pearson, `k` in `2..=min(10, n - 1)`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the correlation coefficient.
    pub fn with_correlation(mut self, method: CorrelationMethod) -> Self {
        self.correlation = method;
        self
    }

    /// Set the cluster-count search options.
    pub fn with_selection(mut self, selection: SelectionConfig) -> Self {
        self.selection = selection;
        self
    }
}

/// Everything [`analyze`] computed.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Protein × protein correlations; its rows are the feature vectors.
    pub correlations: CorrelationMatrix,

    /// Merge tree over the feature vectors.
    pub dendrogram: Dendrogram,

    /// Winning assignment and the score of every candidate `k`.
    pub selection: Selection,
}

impl Analysis {
    /// The selected assignment.
    pub fn assignment(&self) -> &ClusterAssignment {
        &self.selection.assignment
    }

    /// `(k, score)` for every candidate.
    pub fn scores(&self) -> &[(usize, f64)] {
        &self.selection.scores
    }
}

/// Cluster the proteins of `table` by correlation profile.
pub fn analyze(table: &AbundanceTable, config: &AnalysisConfig) -> Result<Analysis> {
    let n_proteins = table.n_proteins();
    if n_proteins < 2 {
        return Err(Error::InsufficientProteins { found: n_proteins });
    }
    // Range errors surface before any expensive stage runs.
    config.selection.resolve_range(n_proteins)?;

    log::debug!(
        "analyzing {} proteins x {} samples",
        n_proteins,
        table.n_samples()
    );

    let correlations = CorrelationMatrix::from_table(table, config.correlation)?;
    let features = correlations.feature_vectors();
    let dendrogram = config.selection.linkage.build(&features)?;
    let selection = ClusterCountSelector::new(config.selection.clone()).select(
        &dendrogram,
        &features,
        correlations.accessions(),
    )?;

    Ok(Analysis {
        correlations,
        dendrogram,
        selection,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_group_table() -> AbundanceTable {
        // A, B, C rise together; D and E fall.
        let accessions = ["P05067", "P06733", "P08238", "O00468-6", "Q15149-4"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let values = vec![
            1.0, 2.0, 3.0, 9.0, 17.5, //
            2.0, 3.1, 4.2, 7.0, 14.8, //
            3.0, 4.0, 6.1, 5.2, 9.9, //
            4.0, 5.2, 7.9, 2.9, 6.3, //
            5.0, 5.9, 9.8, 1.0, 1.9, //
        ];
        AbundanceTable::new(accessions, values).unwrap()
    }

    #[test]
    fn test_analyze_recovers_groups() {
        let analysis = analyze(&two_group_table(), &AnalysisConfig::default()).unwrap();
        let a = analysis.assignment();

        assert_eq!(a.n_clusters(), 2);
        assert_eq!(a.labels(), &[0, 0, 0, 1, 1]);
        assert_eq!(analysis.scores().len(), 3);
        assert_eq!(analysis.dendrogram.merges().len(), 4);
        assert_eq!(analysis.correlations.n_proteins(), 5);
    }

    #[test]
    fn test_range_checked_before_correlation() {
        // The degenerate column would fail correlation; the range fails first.
        let table = AbundanceTable::new(
            vec!["A".into(), "B".into(), "C".into()],
            vec![1.0, 1.0, 2.0, 2.0, 1.0, 3.0],
        )
        .unwrap();
        let config =
            AnalysisConfig::new().with_selection(SelectionConfig::new().with_range(2, 5));
        assert!(matches!(
            analyze(&table, &config),
            Err(Error::InvalidRange { k_max: 5, .. })
        ));
    }

    #[test]
    fn test_single_protein() {
        let table = AbundanceTable::new(vec!["A".into()], vec![1.0, 2.0]).unwrap();
        assert_eq!(
            analyze(&table, &AnalysisConfig::default()).unwrap_err(),
            Error::InsufficientProteins { found: 1 }
        );
    }

    #[test]
    fn test_spearman_config() {
        let config = AnalysisConfig::new().with_correlation(CorrelationMethod::Spearman);
        let analysis = analyze(&two_group_table(), &config).unwrap();
        assert_eq!(analysis.correlations.method(), CorrelationMethod::Spearman);
        assert_eq!(analysis.assignment().labels(), &[0, 0, 0, 1, 1]);
    }
}
