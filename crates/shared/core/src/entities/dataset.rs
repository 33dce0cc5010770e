use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::roles::ColumnRoles;
use crate::values::Label;

/// Errors raised while building or reshaping a dataset
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DatasetError {
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Duplicate column: {0}")]
    DuplicateColumn(String),

    #[error("Dataset declares no protected attribute")]
    NoProtectedAttribute,

    #[error("Dataset declares no label column")]
    NoLabel,

    #[error("Row {row} has {found} values, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Column {0} cannot be both the sensitive attribute and the label")]
    SameColumnRoles(String),

    #[error("Got {found} labels for {expected} rows")]
    LabelCountMismatch { expected: usize, found: usize },
}

/// Which columns are kept out of the feature block when encoding
///
/// The selected sensitive attribute and label are always excluded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeaturePolicy {
    /// Exclude every declared protected attribute and every declared label
    #[default]
    ExcludeDeclared,
    /// Exclude only the selected sensitive attribute and label
    ExcludeSelected,
}

/// Tabular dataset with named numeric columns
///
/// Rows keep insertion order. Every row has exactly one value per column.
/// Protected attributes and labels are declared by name and must be columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDataset")]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<f64>>,
    protected_attribute_names: Vec<String>,
    label_names: Vec<String>,
}

/// Unchecked wire form; deserialized datasets go through [`Dataset::new`]
#[derive(Deserialize)]
struct RawDataset {
    columns: Vec<String>,
    #[serde(default)]
    rows: Vec<Vec<f64>>,
    protected_attribute_names: Vec<String>,
    label_names: Vec<String>,
}

impl TryFrom<RawDataset> for Dataset {
    type Error = DatasetError;

    fn try_from(raw: RawDataset) -> Result<Self, Self::Error> {
        Dataset::new(raw.columns, raw.protected_attribute_names, raw.label_names)?
            .with_rows(raw.rows)
    }
}

impl Dataset {
    /// Create an empty dataset with the given header and column metadata
    pub fn new(
        columns: Vec<String>,
        protected_attribute_names: Vec<String>,
        label_names: Vec<String>,
    ) -> Result<Self, DatasetError> {
        for (i, column) in columns.iter().enumerate() {
            if columns[..i].contains(column) {
                return Err(DatasetError::DuplicateColumn(column.clone()));
            }
        }
        if protected_attribute_names.is_empty() {
            return Err(DatasetError::NoProtectedAttribute);
        }
        if label_names.is_empty() {
            return Err(DatasetError::NoLabel);
        }
        if let Some(unknown) = protected_attribute_names
            .iter()
            .chain(label_names.iter())
            .find(|name| !columns.contains(name))
        {
            return Err(DatasetError::UnknownColumn(unknown.clone()));
        }

        Ok(Self {
            columns,
            rows: Vec::new(),
            protected_attribute_names,
            label_names,
        })
    }

    /// Append a row; values are in header order
    pub fn push_row(&mut self, values: Vec<f64>) -> Result<(), DatasetError> {
        if values.len() != self.columns.len() {
            return Err(DatasetError::RaggedRow {
                row: self.rows.len(),
                expected: self.columns.len(),
                found: values.len(),
            });
        }
        self.rows.push(values);
        Ok(())
    }

    /// Builder-style variant of [`Dataset::push_row`] for many rows
    pub fn with_rows<I>(mut self, rows: I) -> Result<Self, DatasetError>
    where
        I: IntoIterator<Item = Vec<f64>>,
    {
        for row in rows {
            self.push_row(row)?;
        }
        Ok(self)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn protected_attribute_names(&self) -> &[String] {
        &self.protected_attribute_names
    }

    pub fn label_names(&self) -> &[String] {
        &self.label_names
    }

    /// Position of a column in the header
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Value of `column` in row `row`
    pub fn value(&self, row: usize, column: &str) -> Option<f64> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| r[idx])
    }

    /// All values of a column, in row order
    pub fn column_values(&self, name: &str) -> Option<Vec<f64>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|r| r[idx]).collect())
    }

    /// Feature columns (in header order) for the given roles and policy
    pub fn feature_columns(&self, roles: &ColumnRoles, policy: FeaturePolicy) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| **c != roles.sensitive && **c != roles.label)
            .filter(|c| match policy {
                FeaturePolicy::ExcludeSelected => true,
                FeaturePolicy::ExcludeDeclared => {
                    !self.protected_attribute_names.contains(c) && !self.label_names.contains(c)
                }
            })
            .map(String::as_str)
            .collect()
    }

    /// Copy of this dataset with the `label` column replaced by `labels`
    pub fn with_labels(&self, label: &str, labels: &[Label]) -> Result<Self, DatasetError> {
        let idx = self
            .column_index(label)
            .ok_or_else(|| DatasetError::UnknownColumn(label.to_string()))?;
        if labels.len() != self.rows.len() {
            return Err(DatasetError::LabelCountMismatch {
                expected: self.rows.len(),
                found: labels.len(),
            });
        }

        let mut relabeled = self.clone();
        for (row, value) in relabeled.rows.iter_mut().zip(labels) {
            row[idx] = *value as f64;
        }
        Ok(relabeled)
    }
}
