use serde::{Deserialize, Serialize};

use super::dataset::{Dataset, DatasetError};

/// The sensitive attribute and label a model is trained against
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnRoles {
    pub sensitive: String,
    pub label: String,
}

/// Roles resolved against a dataset, remembering which ones were defaulted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoles {
    pub roles: ColumnRoles,
    pub defaulted_sensitive: bool,
    pub defaulted_label: bool,
}

impl ColumnRoles {
    pub fn new(sensitive: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            sensitive: sensitive.into(),
            label: label.into(),
        }
    }

    /// Resolve requested roles against a dataset
    ///
    /// An absent or empty request falls back to the first declared protected
    /// attribute / first declared label. Explicit names must be columns.
    pub fn resolve(
        dataset: &Dataset,
        sensitive: Option<&str>,
        label: Option<&str>,
    ) -> Result<ResolvedRoles, DatasetError> {
        let (sensitive, defaulted_sensitive) =
            pick(dataset, sensitive, dataset.protected_attribute_names())
                .ok_or(DatasetError::NoProtectedAttribute)??;
        let (label, defaulted_label) =
            pick(dataset, label, dataset.label_names()).ok_or(DatasetError::NoLabel)??;

        let roles = ColumnRoles { sensitive, label };
        roles.validate(dataset)?;

        Ok(ResolvedRoles {
            roles,
            defaulted_sensitive,
            defaulted_label,
        })
    }

    /// Check that both columns exist in `dataset` and are distinct
    pub fn validate(&self, dataset: &Dataset) -> Result<(), DatasetError> {
        if self.sensitive == self.label {
            return Err(DatasetError::SameColumnRoles(self.label.clone()));
        }
        for name in [&self.sensitive, &self.label] {
            if dataset.column_index(name).is_none() {
                return Err(DatasetError::UnknownColumn(name.clone()));
            }
        }
        Ok(())
    }
}

fn pick(
    dataset: &Dataset,
    requested: Option<&str>,
    declared: &[String],
) -> Option<Result<(String, bool), DatasetError>> {
    match requested.filter(|name| !name.is_empty()) {
        Some(name) if dataset.column_index(name).is_some() => Some(Ok((name.to_string(), false))),
        Some(name) => Some(Err(DatasetError::UnknownColumn(name.to_string()))),
        None => declared.first().map(|first| Ok((first.clone(), true))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Dataset {
        let names = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Dataset::new(
            names(&["age", "race", "sex", "income"]),
            names(&["race", "sex"]),
            names(&["income"]),
        )
        .unwrap()
    }

    #[test]
    fn test_defaults_to_first_declared() {
        let resolved = ColumnRoles::resolve(&dataset(), None, Some("")).unwrap();
        assert_eq!(resolved.roles, ColumnRoles::new("race", "income"));
        assert!(resolved.defaulted_sensitive);
        assert!(resolved.defaulted_label);
    }

    #[test]
    fn test_explicit_roles_are_kept() {
        let resolved = ColumnRoles::resolve(&dataset(), Some("sex"), Some("income")).unwrap();
        assert_eq!(resolved.roles, ColumnRoles::new("sex", "income"));
        assert!(!resolved.defaulted_sensitive);
        assert!(!resolved.defaulted_label);
    }

    #[test]
    fn test_unknown_explicit_role_rejected() {
        let err = ColumnRoles::resolve(&dataset(), Some("gender"), None).unwrap_err();
        assert_eq!(err, DatasetError::UnknownColumn("gender".to_string()));

        let err = ColumnRoles::new("sex", "salary").validate(&dataset()).unwrap_err();
        assert_eq!(err, DatasetError::UnknownColumn("salary".to_string()));
    }

    #[test]
    fn test_sensitive_and_label_must_differ() {
        let err = ColumnRoles::resolve(&dataset(), Some("income"), Some("income")).unwrap_err();
        assert_eq!(err, DatasetError::SameColumnRoles("income".to_string()));

        let err = ColumnRoles::new("sex", "sex").validate(&dataset()).unwrap_err();
        assert_eq!(err, DatasetError::SameColumnRoles("sex".to_string()));
    }
}
