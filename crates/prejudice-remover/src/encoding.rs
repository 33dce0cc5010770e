//! Kamishima input matrix
//!
//! `train_pr.py` takes the last column as the class and the second-to-last
//! as the sensitive feature; everything before them is a non-sensitive
//! feature. Both class and sensitive values must be integers.

use fairlab_core::{ColumnRoles, Dataset, FeaturePolicy, Label};
use fairlab_ports::{ModelError, ModelResult};
use std::fmt::Write as _;

/// One encoded sample
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedRow {
    pub features: Vec<f64>,
    pub sensitive: Label,
    pub label: Label,
}

/// Dataset laid out the way the external tools expect it
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedMatrix {
    feature_names: Vec<String>,
    rows: Vec<EncodedRow>,
}

impl EncodedMatrix {
    /// Reorder `dataset` into `[features..., sensitive, label]`
    ///
    /// Features keep their header order. Non-finite values and non-integral
    /// sensitive/label values are rejected.
    pub fn encode(
        dataset: &Dataset,
        roles: &ColumnRoles,
        policy: FeaturePolicy,
    ) -> ModelResult<Self> {
        roles.validate(dataset)?;
        if dataset.is_empty() {
            return Err(ModelError::Encoding("dataset has no rows".to_string()));
        }

        let feature_names: Vec<String> = dataset
            .feature_columns(roles, policy)
            .into_iter()
            .map(str::to_string)
            .collect();
        let feature_idx: Vec<usize> = feature_names
            .iter()
            .filter_map(|name| dataset.column_index(name))
            .collect();
        let sensitive_idx = column(dataset, &roles.sensitive)?;
        let label_idx = column(dataset, &roles.label)?;

        let mut rows = Vec::with_capacity(dataset.len());
        for (i, row) in dataset.rows().iter().enumerate() {
            let mut features = Vec::with_capacity(feature_idx.len());
            for (&idx, name) in feature_idx.iter().zip(&feature_names) {
                features.push(finite(row[idx], i, name)?);
            }
            rows.push(EncodedRow {
                features,
                sensitive: integral(row[sensitive_idx], i, &roles.sensitive)?,
                label: integral(row[label_idx], i, &roles.label)?,
            });
        }

        Ok(Self {
            feature_names,
            rows,
        })
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn feature_count(&self) -> usize {
        self.feature_names.len()
    }

    pub fn rows(&self) -> &[EncodedRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whitespace-separated text, one newline-terminated line per row, no header
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(self.rows.len() * (self.feature_count() + 2) * 8);
        for row in &self.rows {
            for value in &row.features {
                // Debug formatting is the shortest round-trip form and keeps `.0`
                let _ = write!(out, "{:?} ", value);
            }
            let _ = writeln!(out, "{} {}", row.sensitive, row.label);
        }
        out
    }
}

fn column(dataset: &Dataset, name: &str) -> ModelResult<usize> {
    dataset
        .column_index(name)
        .ok_or_else(|| ModelError::Encoding(format!("missing column {}", name)))
}

fn finite(value: f64, row: usize, column: &str) -> ModelResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ModelError::Encoding(format!(
            "non-numeric value {} in column {} at row {}",
            value, column, row
        )))
    }
}

fn integral(value: f64, row: usize, column: &str) -> ModelResult<Label> {
    let value = finite(value, row, column)?;
    if value.fract() != 0.0 || value.abs() > (1u64 << 53) as f64 {
        return Err(ModelError::Encoding(format!(
            "column {} must hold integer class values, got {} at row {}",
            column, value, row
        )));
    }
    Ok(value as Label)
}
