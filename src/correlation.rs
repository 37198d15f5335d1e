//! Protein × protein correlation matrices.
//!
//! Clustering does not run on raw abundances. Each protein is represented by
//! its row of the correlation matrix, so two proteins land close together when
//! they correlate the same way with *every other* protein, not just with each
//! other. That row is the protein's feature vector.
//!
//! ## Coefficients
//!
//! - **Pearson**: linear correlation of the raw measurements.
//! - **Spearman**: Pearson over fractional ranks (ties share the mean rank).
//!   Robust to the heavy right tail typical of intensity data.
//! - **Kendall** (tau-b): pair concordance with tie correction. O(N²) per
//!   protein pair, so only sensible for modest sample counts.
//!
//! A protein whose measurement is constant across samples has no defined
//! correlation under any of these; it is rejected by accession instead of
//! leaking `NaN` into the feature space.

use std::collections::HashMap;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::table::AbundanceTable;

/// Correlation coefficient used to build the feature space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CorrelationMethod {
    /// Pearson product-moment correlation.
    #[default]
    Pearson,
    /// Spearman rank correlation.
    Spearman,
    /// Kendall's tau-b.
    Kendall,
}

/// Symmetric correlation matrix with unit diagonal, indexed by accession.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    accessions: Vec<String>,
    index: HashMap<String, usize>,
    values: Vec<f64>,
    method: CorrelationMethod,
}

impl CorrelationMatrix {
    /// Correlate every pair of protein columns across the table's samples.
    pub fn from_table(table: &AbundanceTable, method: CorrelationMethod) -> Result<Self> {
        let n_samples = table.n_samples();
        if n_samples < 2 {
            return Err(Error::InsufficientSamples { found: n_samples });
        }

        let p = table.n_proteins();
        let mut columns: Vec<Vec<f64>> = Vec::with_capacity(p);
        for col in 0..p {
            let column = table.column(col);
            if is_constant(&column) {
                return Err(Error::DegenerateProtein {
                    accession: table.accessions()[col].clone(),
                });
            }
            columns.push(column);
        }

        log::debug!("correlating {p} proteins over {n_samples} samples ({method:?})");

        let upper = match method {
            CorrelationMethod::Pearson => {
                let z = standardize_all(&columns, table.accessions())?;
                upper_triangle(p, |i, j| dot(&z[i], &z[j]))
            }
            CorrelationMethod::Spearman => {
                let ranks: Vec<Vec<f64>> = columns.iter().map(|c| fractional_ranks(c)).collect();
                let z = standardize_all(&ranks, table.accessions())?;
                upper_triangle(p, |i, j| dot(&z[i], &z[j]))
            }
            CorrelationMethod::Kendall => {
                upper_triangle(p, |i, j| kendall_tau_b(&columns[i], &columns[j]))
            }
        };

        let mut values = vec![0.0f64; p * p];
        for (i, row) in upper.into_iter().enumerate() {
            values[i * p + i] = 1.0;
            for (offset, r) in row.into_iter().enumerate() {
                let j = i + 1 + offset;
                let r = r.clamp(-1.0, 1.0);
                values[i * p + j] = r;
                values[j * p + i] = r;
            }
        }

        Ok(Self {
            accessions: table.accessions().to_vec(),
            index: table.index().clone(),
            values,
            method,
        })
    }

    /// Number of proteins (matrix order).
    pub fn n_proteins(&self) -> usize {
        self.accessions.len()
    }

    /// Accessions labelling both axes.
    pub fn accessions(&self) -> &[String] {
        &self.accessions
    }

    /// Coefficient the matrix was built with.
    pub fn method(&self) -> CorrelationMethod {
        self.method
    }

    /// Entry at (`i`, `j`).
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.n_proteins() + j]
    }

    /// Entry for a pair of accessions.
    pub fn between(&self, a: &str, b: &str) -> Option<f64> {
        let i = *self.index.get(a)?;
        let j = *self.index.get(b)?;
        Some(self.get(i, j))
    }

    /// Feature vector of protein `i`: its correlation row.
    pub fn feature_vector(&self, i: usize) -> &[f64] {
        let p = self.n_proteins();
        &self.values[i * p..(i + 1) * p]
    }

    /// All feature vectors, one per protein, in column order.
    pub fn feature_vectors(&self) -> Vec<Vec<f64>> {
        (0..self.n_proteins())
            .map(|i| self.feature_vector(i).to_vec())
            .collect()
    }
}

/// Evaluate `f(i, j)` for every `j > i`, one row per `i`.
fn upper_triangle<F>(p: usize, f: F) -> Vec<Vec<f64>>
where
    F: Fn(usize, usize) -> f64 + Sync,
{
    let row = |i: usize| ((i + 1)..p).map(|j| f(i, j)).collect::<Vec<f64>>();

    #[cfg(feature = "parallel")]
    {
        (0..p).into_par_iter().map(row).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        (0..p).map(row).collect()
    }
}

fn is_constant(column: &[f64]) -> bool {
    column.windows(2).all(|w| w[0] == w[1])
}

/// Center and scale each column to unit norm, so a dot product is Pearson's r.
fn standardize_all(columns: &[Vec<f64>], accessions: &[String]) -> Result<Vec<Vec<f64>>> {
    columns
        .iter()
        .zip(accessions)
        .map(|(column, accession)| {
            standardize(column).ok_or_else(|| Error::DegenerateProtein {
                accession: accession.clone(),
            })
        })
        .collect()
}

fn standardize(column: &[f64]) -> Option<Vec<f64>> {
    let n = column.len() as f64;
    let mean = column.iter().sum::<f64>() / n;
    let mut centered: Vec<f64> = column.iter().map(|x| x - mean).collect();
    let norm = centered.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm == 0.0 || !norm.is_finite() {
        return None;
    }
    for x in &mut centered {
        *x /= norm;
    }
    Some(centered)
}

#[inline]
fn dot(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// 1-based ranks; tied values get the mean of the ranks they span.
fn fractional_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]).then(a.cmp(&b)));

    let mut ranks = vec![0.0f64; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // Positions start..end hold ranks start+1..=end.
        let rank = (start + end + 1) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = rank;
        }
        start = end;
    }
    ranks
}

fn kendall_tau_b(x: &[f64], y: &[f64]) -> f64 {
    debug_assert_eq!(x.len(), y.len());
    let n = x.len();
    let mut concordant = 0i64;
    let mut discordant = 0i64;
    let mut ties_x = 0i64;
    let mut ties_y = 0i64;

    for i in 0..n {
        for j in (i + 1)..n {
            let dx = x[i].total_cmp(&x[j]) as i64;
            let dy = y[i].total_cmp(&y[j]) as i64;
            match (dx, dy) {
                (0, 0) => {}
                (0, _) => ties_x += 1,
                (_, 0) => ties_y += 1,
                _ if dx == dy => concordant += 1,
                _ => discordant += 1,
            }
        }
    }

    let untied_x = concordant + discordant + ties_x;
    let untied_y = concordant + discordant + ties_y;
    let denom = ((untied_x * untied_y) as f64).sqrt();
    if denom == 0.0 {
        return 0.0;
    }
    (concordant - discordant) as f64 / denom
}

#[cfg(test)]
#[allow(clippy::needless_range_loop)]
mod tests {
    use super::*;

    fn table(accessions: &[&str], rows: &[&[f64]]) -> AbundanceTable {
        let values: Vec<f64> = rows.iter().flat_map(|r| r.iter().copied()).collect();
        AbundanceTable::new(accessions.iter().map(|s| s.to_string()).collect(), values).unwrap()
    }

    fn sample_table() -> AbundanceTable {
        table(
            &["P98160", "O00468-6", "Q15149-4", "P08238", "P06733"],
            &[
                &[1.53, 2.53, 0.94, 2.93, 4.95],
                &[1.89, 3.17, 0.82, 3.50, 3.65],
                &[1.19, 2.59, 0.62, 2.72, 7.69],
                &[1.45, 2.61, 0.93, 3.23, 3.69],
                &[1.65, 2.38, 0.67, 1.95, 4.29],
            ],
        )
    }

    #[test]
    fn test_pearson_symmetric_unit_diagonal() {
        let m = CorrelationMatrix::from_table(&sample_table(), CorrelationMethod::Pearson).unwrap();
        let p = m.n_proteins();
        assert_eq!(p, 5);
        for i in 0..p {
            assert_eq!(m.get(i, i), 1.0);
            for j in 0..p {
                assert_eq!(m.get(i, j), m.get(j, i));
                assert!((-1.0..=1.0).contains(&m.get(i, j)));
            }
        }
    }

    #[test]
    fn test_pearson_known_values() {
        // B = 2A + 1 (perfect), C reversed.
        let t = table(
            &["A", "B", "C"],
            &[&[1.0, 3.0, 3.0], &[2.0, 5.0, 2.0], &[3.0, 7.0, 1.0]],
        );
        let m = CorrelationMatrix::from_table(&t, CorrelationMethod::Pearson).unwrap();
        assert!((m.get(0, 1) - 1.0).abs() < 1e-12);
        assert!((m.get(0, 2) + 1.0).abs() < 1e-12);
        assert_eq!(m.between("A", "C"), Some(m.get(0, 2)));
        assert_eq!(m.between("C", "A"), m.between("A", "C"));
        assert_eq!(m.between("A", "Z"), None);
    }

    #[test]
    fn test_spearman_is_rank_based() {
        // Monotone but nonlinear: Spearman is exactly 1, Pearson is not.
        let t = table(
            &["A", "B"],
            &[&[1.0, 1.0], &[2.0, 4.0], &[3.0, 9.0], &[4.0, 100.0]],
        );
        let s = CorrelationMatrix::from_table(&t, CorrelationMethod::Spearman).unwrap();
        let p = CorrelationMatrix::from_table(&t, CorrelationMethod::Pearson).unwrap();
        assert!((s.get(0, 1) - 1.0).abs() < 1e-12);
        assert!(p.get(0, 1) < 0.99);
    }

    #[test]
    fn test_kendall_tau_b() {
        let t = table(
            &["A", "B", "C"],
            &[&[1.0, 4.0, 1.0], &[2.0, 3.0, 3.0], &[3.0, 2.0, 2.0], &[4.0, 1.0, 4.0]],
        );
        let m = CorrelationMatrix::from_table(&t, CorrelationMethod::Kendall).unwrap();
        assert!((m.get(0, 1) + 1.0).abs() < 1e-12);
        // A vs C: pairs (1,3,2,4) -> 5 concordant, 1 discordant.
        assert!((m.get(0, 2) - 4.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_fractional_ranks_ties() {
        assert_eq!(fractional_ranks(&[10.0, 20.0, 10.0, 30.0]), vec![1.5, 3.0, 1.5, 4.0]);
    }

    #[test]
    fn test_insufficient_samples() {
        let t = table(&["A", "B"], &[&[1.0, 2.0]]);
        for method in [
            CorrelationMethod::Pearson,
            CorrelationMethod::Spearman,
            CorrelationMethod::Kendall,
        ] {
            assert_eq!(
                CorrelationMatrix::from_table(&t, method).unwrap_err(),
                Error::InsufficientSamples { found: 1 }
            );
        }
    }

    #[test]
    fn test_degenerate_protein_named() {
        let t = table(
            &["P05067", "O00468-6", "P08238"],
            &[&[1.0, 5.0, 2.0], &[2.0, 5.0, 1.0], &[3.0, 5.0, 7.0]],
        );
        for method in [
            CorrelationMethod::Pearson,
            CorrelationMethod::Spearman,
            CorrelationMethod::Kendall,
        ] {
            assert_eq!(
                CorrelationMatrix::from_table(&t, method).unwrap_err(),
                Error::DegenerateProtein {
                    accession: "O00468-6".to_string()
                }
            );
        }
    }

    #[test]
    fn test_feature_vectors_are_rows() {
        let m = CorrelationMatrix::from_table(&sample_table(), CorrelationMethod::Pearson).unwrap();
        let features = m.feature_vectors();
        assert_eq!(features.len(), 5);
        for (i, f) in features.iter().enumerate() {
            assert_eq!(f.len(), 5);
            assert_eq!(f.as_slice(), m.feature_vector(i));
            assert_eq!(f[i], 1.0);
        }
    }

    #[test]
    fn test_identical_columns_identical_features() {
        let t = table(
            &["A", "B", "C"],
            &[&[1.0, 1.0, 9.0], &[2.0, 2.0, 4.0], &[4.0, 4.0, 5.0]],
        );
        let m = CorrelationMatrix::from_table(&t, CorrelationMethod::Pearson).unwrap();
        // A and B differ only at their own diagonal positions.
        assert_eq!(m.get(0, 2).to_bits(), m.get(1, 2).to_bits());
    }
}
