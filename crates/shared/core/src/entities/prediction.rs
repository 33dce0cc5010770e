use serde::{Deserialize, Serialize};

use crate::values::{ClassScores, Label};

/// Output of a classifier for one input row
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: Label,
    pub scores: ClassScores,
}

impl Prediction {
    pub fn new(label: Label, scores: ClassScores) -> Self {
        Self { label, scores }
    }
}

/// Predictions in input row order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Predictions(Vec<Prediction>);

impl Predictions {
    pub fn new(predictions: Vec<Prediction>) -> Self {
        Self(predictions)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, row: usize) -> Option<&Prediction> {
        self.0.get(row)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Prediction> {
        self.0.iter()
    }

    /// Predicted labels, one per row
    pub fn labels(&self) -> Vec<Label> {
        self.0.iter().map(|p| p.label).collect()
    }

    /// Score vectors, one per row
    pub fn scores(&self) -> Vec<ClassScores> {
        self.0.iter().map(|p| p.scores).collect()
    }

    pub fn into_inner(self) -> Vec<Prediction> {
        self.0
    }
}

impl FromIterator<Prediction> for Predictions {
    fn from_iter<I: IntoIterator<Item = Prediction>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Predictions {
    type Item = &'a Prediction;
    type IntoIter = std::slice::Iter<'a, Prediction>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
