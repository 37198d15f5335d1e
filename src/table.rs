//! Typed samples × proteins abundance table.
//!
//! Columns are protein accessions (e.g. `"P05067"` or isoform-suffixed
//! `"O00468-6"`), rows are labelled samples. Values are stored densely in
//! row-major order; the accession order is fixed at construction and the
//! accession → column lookup is built once. Samples without explicit labels
//! are labelled by their row index.
//!
//! Missing cells are rejected rather than imputed: a `NaN` cell, or a row that
//! lacks one of the accessions, is an error. Imputation, if wanted, is the
//! caller's job before the table is built.

use std::collections::{BTreeMap, HashMap};

use crate::error::{Error, Result};

/// Dense abundance matrix with labelled protein columns.
#[derive(Debug, Clone, PartialEq)]
pub struct AbundanceTable {
    accessions: Vec<String>,
    index: HashMap<String, usize>,
    samples: Vec<String>,
    values: Vec<f64>,
}

impl AbundanceTable {
    /// Build a table from a column order and row-major values.
    ///
    /// `values.len()` must be a multiple of `accessions.len()`; each chunk of
    /// that length is one sample.
    pub fn new(accessions: Vec<String>, values: Vec<f64>) -> Result<Self> {
        if accessions.is_empty() {
            return Err(Error::EmptyInput);
        }

        let n_proteins = accessions.len();
        if values.len() % n_proteins != 0 {
            return Err(Error::RaggedValues {
                n_values: values.len(),
                n_proteins,
            });
        }

        let mut index = HashMap::with_capacity(n_proteins);
        for (col, accession) in accessions.iter().enumerate() {
            if index.insert(accession.clone(), col).is_some() {
                return Err(Error::DuplicateAccession {
                    accession: accession.clone(),
                });
            }
        }

        for (i, &value) in values.iter().enumerate() {
            check_cell(i / n_proteins, &accessions[i % n_proteins], value)?;
        }

        Ok(Self {
            samples: (0..values.len() / n_proteins).map(|s| s.to_string()).collect(),
            accessions,
            index,
            values,
        })
    }

    /// Replace the default row-index sample labels.
    pub fn with_sample_labels(mut self, samples: Vec<String>) -> Result<Self> {
        if samples.len() != self.samples.len() {
            return Err(Error::DimensionMismatch {
                expected: self.samples.len(),
                found: samples.len(),
            });
        }
        self.samples = samples;
        Ok(self)
    }

    /// Build a table from label-indexed rows, one map per sample.
    ///
    /// Columns are the first row's accessions in sorted order. Every later row
    /// must carry exactly the same accession set.
    pub fn from_rows<I, K>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = HashMap<K, f64>>,
        K: AsRef<str>,
    {
        Self::collect_rows(rows.into_iter())
    }

    /// Like [`from_rows`](Self::from_rows), with a label per sample.
    pub fn from_labeled_rows<I, S, K>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, HashMap<K, f64>)>,
        S: Into<String>,
        K: AsRef<str>,
    {
        let mut samples = Vec::new();
        let table = Self::collect_rows(rows.into_iter().map(|(label, row)| {
            samples.push(label.into());
            row
        }))?;
        table.with_sample_labels(samples)
    }

    fn collect_rows<K: AsRef<str>>(
        mut rows: impl Iterator<Item = HashMap<K, f64>>,
    ) -> Result<Self> {
        let first = rows.next().ok_or(Error::EmptyInput)?;

        let first: BTreeMap<&str, f64> = first.iter().map(|(k, &v)| (k.as_ref(), v)).collect();
        let accessions: Vec<String> = first.keys().map(|k| (*k).to_string()).collect();
        let mut values: Vec<f64> = first.values().copied().collect();

        for (offset, row) in rows.enumerate() {
            let sample = offset + 1;
            for key in row.keys() {
                let key = key.as_ref();
                if !first.contains_key(key) {
                    return Err(Error::InconsistentColumns {
                        sample,
                        accession: key.to_string(),
                    });
                }
            }

            let lookup: HashMap<&str, f64> = row.iter().map(|(k, &v)| (k.as_ref(), v)).collect();
            for accession in &accessions {
                let value = lookup
                    .get(accession.as_str())
                    .copied()
                    .ok_or_else(|| Error::MissingValue {
                        sample,
                        accession: accession.clone(),
                    })?;
                values.push(value);
            }
        }

        Self::new(accessions, values)
    }

    /// Protein accessions in column order.
    pub fn accessions(&self) -> &[String] {
        &self.accessions
    }

    /// Column index of `accession`, if present.
    pub fn column_of(&self, accession: &str) -> Option<usize> {
        self.index.get(accession).copied()
    }

    pub(crate) fn index(&self) -> &HashMap<String, usize> {
        &self.index
    }

    /// Sample labels in row order.
    pub fn sample_labels(&self) -> &[String] {
        &self.samples
    }

    /// Row index of the sample labelled `label`, if present.
    pub fn sample_of(&self, label: &str) -> Option<usize> {
        self.samples.iter().position(|s| s == label)
    }

    /// Number of samples (rows).
    pub fn n_samples(&self) -> usize {
        self.samples.len()
    }

    /// Number of proteins (columns).
    pub fn n_proteins(&self) -> usize {
        self.accessions.len()
    }

    /// Value at (`sample`, `col`).
    #[inline]
    pub fn get(&self, sample: usize, col: usize) -> f64 {
        self.values[sample * self.n_proteins() + col]
    }

    /// One sample as a slice in column order.
    pub fn row(&self, sample: usize) -> &[f64] {
        let p = self.n_proteins();
        &self.values[sample * p..(sample + 1) * p]
    }

    /// One protein's measurements across all samples.
    pub fn column(&self, col: usize) -> Vec<f64> {
        (0..self.n_samples()).map(|s| self.get(s, col)).collect()
    }
}

fn check_cell(sample: usize, accession: &str, value: f64) -> Result<()> {
    if value.is_nan() {
        return Err(Error::MissingValue {
            sample,
            accession: accession.to_string(),
        });
    }
    if !value.is_finite() || value < 0.0 {
        return Err(Error::InvalidValue {
            sample,
            accession: accession.to_string(),
            value,
        });
    }
    Ok(())
}
