//! Predictor output schema
//!
//! `predict_lr.py` writes one headerless line per sample:
//!
//! | idx | column            |
//! |-----|-------------------|
//! | 0   | true class        |
//! | 1   | predicted class   |
//! | 2   | sensitive feature |
//! | 3   | p(class 0)        |
//! | 4   | p(class 1)        |
//!
//! Extra trailing columns are ignored. The echo columns (0 and 2) are
//! checked against the encoded input so a shifted layout fails loudly
//! instead of being misread.

use crate::encoding::EncodedMatrix;
use fairlab_core::{ClassScores, Label, Prediction, Predictions};
use fairlab_ports::{ModelError, ModelResult};

/// Named positions in a predictor output row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputColumn {
    TrueLabel,
    PredictedLabel,
    Sensitive,
    ProbClass0,
    ProbClass1,
}

impl OutputColumn {
    pub const ALL: [OutputColumn; 5] = [
        OutputColumn::TrueLabel,
        OutputColumn::PredictedLabel,
        OutputColumn::Sensitive,
        OutputColumn::ProbClass0,
        OutputColumn::ProbClass1,
    ];

    pub fn index(self) -> usize {
        match self {
            OutputColumn::TrueLabel => 0,
            OutputColumn::PredictedLabel => 1,
            OutputColumn::Sensitive => 2,
            OutputColumn::ProbClass0 => 3,
            OutputColumn::ProbClass1 => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            OutputColumn::TrueLabel => "true_label",
            OutputColumn::PredictedLabel => "predicted_label",
            OutputColumn::Sensitive => "sensitive",
            OutputColumn::ProbClass0 => "prob_class_0",
            OutputColumn::ProbClass1 => "prob_class_1",
        }
    }
}

/// One parsed output line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputRow {
    pub true_label: Label,
    pub predicted: Label,
    pub sensitive: Label,
    pub scores: ClassScores,
}

/// Parser and validator for predictor output
#[derive(Debug, Clone, Copy)]
pub struct OutputSchema {
    /// Allowed slack when checking `p0 + p1 == 1`
    pub probability_tolerance: f64,
}

impl Default for OutputSchema {
    fn default() -> Self {
        Self {
            probability_tolerance: 1e-4,
        }
    }
}

impl OutputSchema {
    pub const MIN_COLUMNS: usize = OutputColumn::ALL.len();

    /// Parse output text; blank lines and `#` comments are skipped
    pub fn parse(&self, text: &str) -> ModelResult<Vec<OutputRow>> {
        let mut rows = Vec::new();
        for (lineno, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let values = line
                .split_whitespace()
                .map(|v| v.parse::<f64>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| {
                    ModelError::Decoding(format!("line {}: unparsable value ({})", lineno + 1, e))
                })?;
            if values.len() < Self::MIN_COLUMNS {
                return Err(ModelError::Decoding(format!(
                    "line {}: expected at least {} columns, found {}",
                    lineno + 1,
                    Self::MIN_COLUMNS,
                    values.len()
                )));
            }

            let at = |col: OutputColumn| values[col.index()];
            let class = |col: OutputColumn| -> ModelResult<Label> {
                let v = at(col);
                if v.is_finite() && v.fract() == 0.0 {
                    Ok(v as Label)
                } else {
                    Err(ModelError::Decoding(format!(
                        "line {}: {} must be an integer class, got {}",
                        lineno + 1,
                        col.name(),
                        v
                    )))
                }
            };

            let row = OutputRow {
                true_label: class(OutputColumn::TrueLabel)?,
                predicted: class(OutputColumn::PredictedLabel)?,
                sensitive: class(OutputColumn::Sensitive)?,
                scores: [at(OutputColumn::ProbClass0), at(OutputColumn::ProbClass1)],
            };
            self.check_scores(&row.scores, lineno + 1)?;
            rows.push(row);
        }
        Ok(rows)
    }

    /// Parse output text and match it row-by-row against the encoded input
    pub fn decode(&self, text: &str, input: &EncodedMatrix) -> ModelResult<Predictions> {
        let rows = self.parse(text)?;
        if rows.is_empty() {
            return Err(ModelError::Decoding("predictor output is empty".to_string()));
        }
        if rows.len() != input.len() {
            return Err(ModelError::Decoding(format!(
                "predictor returned {} rows for {} input rows",
                rows.len(),
                input.len()
            )));
        }

        for (i, (out, sent)) in rows.iter().zip(input.rows()).enumerate() {
            if out.true_label != sent.label || out.sensitive != sent.sensitive {
                return Err(ModelError::Decoding(format!(
                    "row {}: echoed (label, sensitive) = ({}, {}) but input was ({}, {})",
                    i, out.true_label, out.sensitive, sent.label, sent.sensitive
                )));
            }
        }

        Ok(rows
            .into_iter()
            .map(|r| Prediction::new(r.predicted, r.scores))
            .collect())
    }

    fn check_scores(&self, scores: &ClassScores, line: usize) -> ModelResult<()> {
        let in_range = scores
            .iter()
            .all(|p| p.is_finite() && (0.0..=1.0).contains(p));
        if !in_range || (scores[0] + scores[1] - 1.0).abs() > self.probability_tolerance {
            return Err(ModelError::Decoding(format!(
                "line {}: invalid class probabilities {:?}",
                line, scores
            )));
        }
        Ok(())
    }
}
