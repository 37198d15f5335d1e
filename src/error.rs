use thiserror::Error;

/// Errors returned by the correlation, clustering and selection stages.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Input slice is empty.
    #[error("empty input")]
    EmptyInput,

    /// Fewer than two samples; correlation is undefined.
    #[error("insufficient samples: correlation needs at least 2, found {found}")]
    InsufficientSamples {
        /// Number of samples in the table.
        found: usize,
    },

    /// Fewer than two proteins; there is nothing to cluster.
    #[error("insufficient proteins: clustering needs at least 2, found {found}")]
    InsufficientProteins {
        /// Number of proteins (feature vectors).
        found: usize,
    },

    /// A protein column has zero variance, so its correlation is undefined.
    #[error("degenerate protein {accession}: constant across all samples")]
    DegenerateProtein {
        /// Accession of the offending column.
        accession: String,
    },

    /// Every candidate cut in the search range scored as undefined.
    #[error("no valid cut found for cluster counts {k_min}..={k_max}")]
    NoValidCutFound {
        /// Smallest candidate cluster count.
        k_min: usize,
        /// Largest candidate cluster count.
        k_max: usize,
    },

    /// The cluster-count search range is unusable for this dataset.
    #[error(
        "invalid range {k_min}..={k_max} for {n_proteins} proteins \
         (need 2 <= k_min <= k_max <= n_proteins - 1)"
    )]
    InvalidRange {
        /// Requested lower bound.
        k_min: usize,
        /// Requested (or defaulted) upper bound.
        k_max: usize,
        /// Number of proteins being clustered.
        n_proteins: usize,
    },

    /// The same accession appears twice in the column list.
    #[error("duplicate accession {accession}")]
    DuplicateAccession {
        /// The repeated accession.
        accession: String,
    },

    /// A cell is missing (encoded as NaN, or absent from a row).
    #[error("missing value for {accession} in sample {sample}")]
    MissingValue {
        /// Sample (row) index.
        sample: usize,
        /// Protein accession (column).
        accession: String,
    },

    /// A cell is negative or infinite.
    #[error("invalid value {value} for {accession} in sample {sample}")]
    InvalidValue {
        /// Sample (row) index.
        sample: usize,
        /// Protein accession (column).
        accession: String,
        /// The rejected value.
        value: f64,
    },

    /// Row-major values do not split into whole rows.
    #[error("{n_values} values do not fill whole rows of {n_proteins} proteins")]
    RaggedValues {
        /// Number of values supplied.
        n_values: usize,
        /// Number of proteins (row width).
        n_proteins: usize,
    },

    /// A row carries an accession that the first row did not.
    #[error("sample {sample} has unexpected accession {accession}")]
    InconsistentColumns {
        /// Sample (row) index.
        sample: usize,
        /// The unexpected accession.
        accession: String,
    },

    /// Points in a dataset have inconsistent dimensionality.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected dimensionality.
        expected: usize,
        /// Found dimensionality.
        found: usize,
    },

    /// Requested cluster count is incompatible with the dataset.
    #[error("invalid cluster count: requested {requested}, but dataset has {n_items} items")]
    InvalidClusterCount {
        /// Requested number of clusters.
        requested: usize,
        /// Number of items in the dataset.
        n_items: usize,
    },

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
