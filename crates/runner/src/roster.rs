//! Model roster - fit several classifiers, query one at a time
//!
//! Models are registered with a descriptive name and an alias; the alias
//! is what a study participant sees, so the underlying technique stays
//! hidden. Fitting is sequential and stops at the first failure.

use crate::error::{Result, RunnerError};
use crate::selector::ModelSelector;
use fairlab_core::{Dataset, Label, Predictions};
use fairlab_ports::FairClassifier;
use log::info;
use std::time::Duration;
use tokio::time::Instant;

/// A registered model
pub struct RosterEntry {
    name: String,
    alias: String,
    model: Box<dyn FairClassifier>,
}

impl RosterEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn model(&self) -> &dyn FairClassifier {
        self.model.as_ref()
    }

    fn matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name) || self.alias.eq_ignore_ascii_case(name)
    }
}

/// How long one model took to fit
#[derive(Debug, Clone, PartialEq)]
pub struct FitReport {
    pub name: String,
    pub elapsed: Duration,
}

/// Answer to a query against one model
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOutcome {
    pub name: String,
    pub alias: String,
    pub predictions: Predictions,
}

impl QueryOutcome {
    /// Label for the first row; single-entry queries only have one
    pub fn first_label(&self) -> Option<Label> {
        self.predictions.get(0).map(|p| p.label)
    }
}

/// Ordered collection of classifiers
#[derive(Default)]
pub struct ModelRoster {
    entries: Vec<RosterEntry>,
}

impl ModelRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a model; names and aliases must be unique across the roster
    pub fn register(
        &mut self,
        name: impl Into<String>,
        alias: impl Into<String>,
        model: Box<dyn FairClassifier>,
    ) -> Result<&mut Self> {
        let name = name.into();
        let alias = alias.into();
        if let Some(taken) = [&name, &alias]
            .into_iter()
            .find(|candidate| self.entries.iter().any(|e| e.matches(candidate)))
        {
            return Err(RunnerError::DuplicateModel(taken.clone()));
        }

        info!("Registered model '{}' as '{}'", name, alias);
        self.entries.push(RosterEntry { name, alias, model });
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    pub fn aliases(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.alias.as_str()).collect()
    }

    /// Look up a model by index, letter, name or alias
    pub fn get(&self, selector: &ModelSelector) -> Result<&RosterEntry> {
        let found = match selector {
            ModelSelector::Index(i) => self.entries.get(*i),
            ModelSelector::Name(name) => self.entries.iter().find(|e| e.matches(name)),
        };
        found.ok_or_else(|| RunnerError::UnknownModel(describe(selector)))
    }

    /// Fit every model on `dataset`, in registration order
    pub async fn fit_all(&mut self, dataset: &Dataset) -> Result<Vec<FitReport>> {
        if self.entries.is_empty() {
            return Err(RunnerError::EmptyRoster);
        }

        let mut reports = Vec::with_capacity(self.entries.len());
        for entry in &mut self.entries {
            let started = Instant::now();
            entry
                .model
                .fit(dataset)
                .await
                .map_err(|source| RunnerError::Model {
                    name: entry.name.clone(),
                    source,
                })?;
            let elapsed = started.elapsed();
            info!(
                "Fitted '{}' ({}) on {} rows in {:?}",
                entry.name,
                entry.model.name(),
                dataset.len(),
                elapsed
            );
            reports.push(FitReport {
                name: entry.name.clone(),
                elapsed,
            });
        }

        info!("All {} models fitted", reports.len());
        Ok(reports)
    }

    /// Run `dataset` through the selected model
    pub async fn query(
        &self,
        selector: &ModelSelector,
        dataset: &Dataset,
    ) -> Result<QueryOutcome> {
        let entry = self.get(selector)?;
        let predictions = entry
            .model
            .predict(dataset)
            .await
            .map_err(|source| RunnerError::Model {
                name: entry.name.clone(),
                source,
            })?;

        info!(
            "Query against '{}' returned {} predictions",
            entry.alias,
            predictions.len()
        );
        Ok(QueryOutcome {
            name: entry.name.clone(),
            alias: entry.alias.clone(),
            predictions,
        })
    }
}

fn describe(selector: &ModelSelector) -> String {
    match selector {
        ModelSelector::Index(i) => format!("#{}", i),
        ModelSelector::Name(name) => name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use fairlab_core::Prediction;
    use fairlab_ports::{ModelError, ModelResult};

    /// Predicts the majority label seen during fit
    #[derive(Default)]
    struct MajorityClassifier {
        majority: Option<Label>,
    }

    #[async_trait]
    impl FairClassifier for MajorityClassifier {
        async fn fit(&mut self, dataset: &Dataset) -> ModelResult<()> {
            let label = &dataset.label_names()[0];
            let values = dataset.column_values(label).unwrap_or_default();
            let ones = values.iter().filter(|v| **v == 1.0).count();
            self.majority = Some(if ones * 2 >= values.len() { 1 } else { 0 });
            Ok(())
        }

        async fn predict(&self, dataset: &Dataset) -> ModelResult<Predictions> {
            let label = self
                .majority
                .ok_or_else(|| ModelError::Precondition("not fitted".to_string()))?;
            let score = if label == 1 { [0.0, 1.0] } else { [1.0, 0.0] };
            Ok((0..dataset.len())
                .map(|_| Prediction::new(label, score))
                .collect())
        }

        fn is_trained(&self) -> bool {
            self.majority.is_some()
        }

        fn name(&self) -> &str {
            "Majority"
        }
    }

    struct FailingClassifier;

    #[async_trait]
    impl FairClassifier for FailingClassifier {
        async fn fit(&mut self, _dataset: &Dataset) -> ModelResult<()> {
            Err(ModelError::Encoding("unsupported column".to_string()))
        }

        async fn predict(&self, _dataset: &Dataset) -> ModelResult<Predictions> {
            Err(ModelError::Precondition("never fitted".to_string()))
        }

        fn is_trained(&self) -> bool {
            false
        }
    }

    fn dataset() -> Dataset {
        let cols = ["age", "sex", "income"].iter().map(|s| s.to_string()).collect();
        Dataset::new(cols, vec!["sex".into()], vec!["income".into()])
            .unwrap()
            .with_rows(vec![
                vec![30.0, 0.0, 1.0],
                vec![40.0, 1.0, 1.0],
                vec![50.0, 1.0, 0.0],
            ])
            .unwrap()
    }

    fn roster() -> ModelRoster {
        let mut roster = ModelRoster::new();
        roster
            .register("Plain", "Albatross", Box::new(MajorityClassifier::default()))
            .unwrap()
            .register("Debiased", "Beaver", Box::new(MajorityClassifier::default()))
            .unwrap();
        roster
    }

    #[test]
    fn test_lookup_by_index_letter_and_alias() {
        let roster = roster();
        let by = |s: &str| roster.get(&s.parse().unwrap()).unwrap().name().to_string();

        assert_eq!(by("0"), "Plain");
        assert_eq!(by("b"), "Debiased");
        assert_eq!(by("albatross"), "Plain");
        assert_eq!(by("Debiased"), "Debiased");
        assert!(matches!(
            roster.get(&ModelSelector::Index(7)),
            Err(RunnerError::UnknownModel(s)) if s == "#7"
        ));
        assert_eq!(roster.aliases(), vec!["Albatross", "Beaver"]);
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut roster = roster();
        let err = roster
            .register("Other", "beaver", Box::new(MajorityClassifier::default()))
            .err();
        assert!(matches!(err, Some(RunnerError::DuplicateModel(s)) if s == "beaver"));
        assert_eq!(roster.len(), 2);
    }

    #[tokio::test]
    async fn test_fit_all_then_query() {
        let mut roster = roster();
        let reports = roster.fit_all(&dataset()).await.unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].name, "Plain");
        assert!(roster.entries().iter().all(|e| e.model().is_trained()));

        let outcome = roster
            .query(&ModelSelector::Name("Beaver".into()), &dataset())
            .await
            .unwrap();
        assert_eq!(outcome.name, "Debiased");
        assert_eq!(outcome.predictions.len(), 3);
        assert_eq!(outcome.first_label(), Some(1));
    }

    #[tokio::test]
    async fn test_query_before_fit_surfaces_model_error() {
        let roster = roster();
        let err = roster.query(&ModelSelector::Index(0), &dataset()).await.unwrap_err();
        assert!(matches!(
            err,
            RunnerError::Model { name, source: ModelError::Precondition(_) } if name == "Plain"
        ));
    }

    #[tokio::test]
    async fn test_fit_all_stops_at_first_failure() {
        let mut roster = ModelRoster::new();
        roster
            .register("Broken", "Chameleon", Box::new(FailingClassifier))
            .unwrap()
            .register("Plain", "Dragonfly", Box::new(MajorityClassifier::default()))
            .unwrap();

        let err = roster.fit_all(&dataset()).await.unwrap_err();
        assert!(matches!(err, RunnerError::Model { ref name, .. } if name == "Broken"));
        assert!(!roster.entries()[1].model().is_trained());
    }

    #[tokio::test]
    async fn test_empty_roster() {
        let mut roster = ModelRoster::new();
        assert!(matches!(
            roster.fit_all(&dataset()).await,
            Err(RunnerError::EmptyRoster)
        ));
    }
}
