//! Adapter configuration
//!
//! Both structs deserialize with `#[serde(default)]`, so a JSON file only
//! needs the fields it overrides.

use fairlab_core::FeaturePolicy;
use fairlab_ports::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// How to reach the external Kamishima scripts and where to put their files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Interpreter used to run the scripts
    pub interpreter: String,
    /// Directory holding `train_script` and `predict_script`
    pub script_dir: PathBuf,
    pub train_script: String,
    pub predict_script: String,
    /// Directory for per-call scratch matrices (system temp dir if unset)
    pub work_dir: Option<PathBuf>,
    /// Directory for persisted model files (`work_dir` if unset)
    pub model_dir: Option<PathBuf>,
    /// Upper bound on a single tool run, in ms (unbounded if unset)
    pub timeout_ms: Option<u64>,
    /// Treat any stderr output from a successful run as a failure
    pub fail_on_stderr: bool,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            interpreter: "python".to_string(),
            script_dir: PathBuf::from("kamfadm-2012ecmlpkdd"),
            train_script: "train_pr.py".to_string(),
            predict_script: "predict_lr.py".to_string(),
            work_dir: None,
            model_dir: None,
            timeout_ms: None,
            fail_on_stderr: false,
        }
    }
}

impl ToolConfig {
    pub fn train_script_path(&self) -> PathBuf {
        self.script_dir.join(&self.train_script)
    }

    pub fn predict_script_path(&self) -> PathBuf {
        self.script_dir.join(&self.predict_script)
    }

    pub fn work_dir(&self) -> PathBuf {
        self.work_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    pub fn model_dir(&self) -> PathBuf {
        self.model_dir.clone().unwrap_or_else(|| self.work_dir())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    pub fn validate(&self) -> ModelResult<()> {
        if self.interpreter.trim().is_empty() {
            return Err(ModelError::InvalidConfig(
                "interpreter must not be empty".to_string(),
            ));
        }
        if self.timeout_ms == Some(0) {
            return Err(ModelError::InvalidConfig(
                "timeout_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Prejudice remover parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrejudiceRemoverConfig {
    /// Fairness penalty (regularization strength), must be >= 0
    pub eta: f64,
    /// Protected attribute to regularize against (first declared if unset)
    pub sensitive_attr: Option<String>,
    /// Label column (first declared if unset)
    pub class_attr: Option<String>,
    pub feature_policy: FeaturePolicy,
    pub tool: ToolConfig,
}

impl Default for PrejudiceRemoverConfig {
    fn default() -> Self {
        Self {
            eta: 1.0,
            sensitive_attr: None,
            class_attr: None,
            feature_policy: FeaturePolicy::default(),
            tool: ToolConfig::default(),
        }
    }
}

impl PrejudiceRemoverConfig {
    pub fn with_eta(eta: f64) -> Self {
        Self {
            eta,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> ModelResult<()> {
        validate_eta(self.eta)?;
        self.tool.validate()
    }

    pub fn from_json_str(json: &str) -> ModelResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ModelError::InvalidConfig(format!("malformed config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> ModelResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            ModelError::InvalidConfig(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&json)
    }
}

pub(crate) fn validate_eta(eta: f64) -> ModelResult<()> {
    if !eta.is_finite() || eta < 0.0 {
        return Err(ModelError::InvalidConfig(format!(
            "eta must be a finite value >= 0, got {}",
            eta
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_point_at_kamishima_scripts() {
        let config = ToolConfig::default();
        assert_eq!(
            config.train_script_path(),
            PathBuf::from("kamfadm-2012ecmlpkdd/train_pr.py")
        );
        assert_eq!(
            config.predict_script_path(),
            PathBuf::from("kamfadm-2012ecmlpkdd/predict_lr.py")
        );
        assert_eq!(config.timeout(), None);
        assert_eq!(config.model_dir(), config.work_dir());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = PrejudiceRemoverConfig::from_json_str(
            r#"{ "eta": 25.0, "sensitive_attr": "race", "tool": { "timeout_ms": 30000 } }"#,
        )
        .unwrap();

        assert_eq!(config.eta, 25.0);
        assert_eq!(config.sensitive_attr.as_deref(), Some("race"));
        assert_eq!(config.class_attr, None);
        assert_eq!(config.feature_policy, FeaturePolicy::ExcludeDeclared);
        assert_eq!(config.tool.interpreter, "python");
        assert_eq!(config.tool.timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_feature_policy_from_json() {
        let config =
            PrejudiceRemoverConfig::from_json_str(r#"{ "feature_policy": "exclude_selected" }"#)
                .unwrap();
        assert_eq!(config.feature_policy, FeaturePolicy::ExcludeSelected);
    }

    #[test]
    fn test_rejects_negative_or_non_finite_eta() {
        assert!(matches!(
            PrejudiceRemoverConfig::with_eta(-0.5).validate(),
            Err(ModelError::InvalidConfig(_))
        ));
        assert!(matches!(
            PrejudiceRemoverConfig::with_eta(f64::NAN).validate(),
            Err(ModelError::InvalidConfig(_))
        ));
        assert!(PrejudiceRemoverConfig::with_eta(0.0).validate().is_ok());
    }

    #[test]
    fn test_rejects_malformed_json_and_zero_timeout() {
        assert!(matches!(
            PrejudiceRemoverConfig::from_json_str("{ eta: "),
            Err(ModelError::InvalidConfig(_))
        ));
        assert!(matches!(
            PrejudiceRemoverConfig::from_json_str(r#"{ "tool": { "timeout_ms": 0 } }"#),
            Err(ModelError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_from_missing_file() {
        let err = PrejudiceRemoverConfig::from_json_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ModelError::InvalidConfig(msg) if msg.contains("cannot read")));
    }
}
