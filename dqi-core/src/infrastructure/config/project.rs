// dqi-core/src/infrastructure/config/project.rs

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};
use validator::Validate;

use crate::domain::quality::ImportPolicy;
use crate::infrastructure::error::InfrastructureError;

pub const CONFIG_CANDIDATES: [&str; 2] = ["dqi_project_conf.yaml", "dqi.yaml"];

#[derive(Debug, Deserialize, Serialize, Validate, Clone, PartialEq)]
pub struct DqiConfig {
    #[serde(default = "default_name")]
    pub name: String,

    #[validate(length(min = 1, message = "database_path cannot be empty"))]
    #[serde(rename = "database-path", alias = "database_path", default = "default_database_path")]
    pub database_path: String,

    #[validate(nested)]
    #[serde(default)]
    pub import: ImportConfig,

    #[validate(nested)]
    #[serde(default)]
    pub listing: ListingConfig,

    #[validate(nested)]
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Deserialize, Serialize, Validate, Clone, Default, PartialEq)]
pub struct ImportConfig {
    #[serde(rename = "reject-ungraded", alias = "reject_ungraded", default)]
    pub reject_ungraded: bool,
}

#[derive(Debug, Deserialize, Serialize, Validate, Clone, PartialEq)]
pub struct ListingConfig {
    #[validate(range(min = 1, max = 10000))]
    #[serde(rename = "default-limit", alias = "default_limit", default = "default_limit")]
    pub default_limit: usize,
}

#[derive(Debug, Deserialize, Serialize, Validate, Clone, PartialEq)]
pub struct ReportConfig {
    #[validate(length(min = 1))]
    #[serde(rename = "output-path", alias = "output_path", default = "default_report_path")]
    pub output_path: String,
}

impl Default for DqiConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            database_path: default_database_path(),
            import: ImportConfig::default(),
            listing: ListingConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_path: default_report_path(),
        }
    }
}

impl DqiConfig {
    pub fn import_policy(&self) -> ImportPolicy {
        ImportPolicy {
            reject_ungraded: self.import.reject_ungraded,
        }
    }
}

fn default_name() -> String {
    "dqi".to_string()
}
fn default_database_path() -> String {
    "dqi.duckdb".to_string()
}
fn default_limit() -> usize {
    50
}
fn default_report_path() -> String {
    "target/report_card.json".to_string()
}

// --- LOADER ---

#[instrument(skip(project_dir))]
pub fn load_project_config(project_dir: &Path) -> Result<DqiConfig, InfrastructureError> {
    let config_path = find_main_config(project_dir)?;
    info!(path = ?config_path, "Loading project configuration");

    let content = fs::read_to_string(&config_path)?;
    let mut config: DqiConfig = if content.trim().is_empty() {
        DqiConfig::default()
    } else {
        serde_yaml::from_str(&content)?
    };

    // Override via Variables d'Environnement (Pattern 'Layering')
    // Permet de faire: DQI_DATABASE_PATH=/tmp/dqi.duckdb dqi grade
    apply_env_overrides(&mut config)?;

    config.validate()?;
    Ok(config)
}

/// Same as `load_project_config`, but a project without a configuration
/// file runs on defaults (environment overrides still apply).
pub fn load_config_or_default(project_dir: &Path) -> Result<DqiConfig, InfrastructureError> {
    match load_project_config(project_dir) {
        Err(InfrastructureError::ConfigNotFound(msg)) => {
            info!("{msg}; using defaults");
            let mut config = DqiConfig::default();
            apply_env_overrides(&mut config)?;
            config.validate()?;
            Ok(config)
        }
        other => other,
    }
}

fn find_main_config(root: &Path) -> Result<PathBuf, InfrastructureError> {
    for filename in CONFIG_CANDIDATES {
        let p = root.join(filename);
        if p.exists() {
            return Ok(p);
        }
    }
    Err(InfrastructureError::ConfigNotFound(format!(
        "No configuration file found in {:?}. Checked: {:?}",
        root, CONFIG_CANDIDATES
    )))
}

fn apply_env_overrides(config: &mut DqiConfig) -> Result<(), InfrastructureError> {
    apply_overrides(
        config,
        std::env::var("DQI_DATABASE_PATH").ok(),
        std::env::var("DQI_REJECT_UNGRADED").ok(),
    )
}

fn apply_overrides(
    config: &mut DqiConfig,
    database_path: Option<String>,
    reject_ungraded: Option<String>,
) -> Result<(), InfrastructureError> {
    if let Some(val) = database_path {
        info!(old = ?config.database_path, new = ?val, "Overriding database path via ENV");
        config.database_path = val;
    }
    if let Some(val) = reject_ungraded {
        let parsed = match val.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" => true,
            "0" | "false" | "no" | "" => false,
            other => {
                return Err(InfrastructureError::ConfigError(format!(
                    "DQI_REJECT_UNGRADED must be a boolean, got '{other}'"
                )));
            }
        };
        info!(new = parsed, "Overriding import.reject-ungraded via ENV");
        config.import.reject_ungraded = parsed;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_reported() -> Result<()> {
        let dir = tempdir()?;
        let err = find_main_config(dir.path()).unwrap_err();
        assert!(matches!(err, InfrastructureError::ConfigNotFound(_)));
        Ok(())
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() -> Result<()> {
        let dir = tempdir()?;
        let config = load_config_or_default(dir.path())?;
        assert_eq!(config.name, "dqi");
        assert_eq!(config.listing.default_limit, 50);
        Ok(())
    }

    #[test]
    fn test_partial_file_keeps_defaults() -> Result<()> {
        let dir = tempdir()?;
        fs::write(
            dir.path().join("dqi.yaml"),
            "name: tuva_demo\nimport:\n  reject-ungraded: true\n",
        )?;
        let config: DqiConfig =
            serde_yaml::from_str(&fs::read_to_string(find_main_config(dir.path())?)?)?;
        assert_eq!(config.name, "tuva_demo");
        assert!(config.import_policy().reject_ungraded);
        assert_eq!(config.database_path, "dqi.duckdb");
        assert_eq!(config.listing.default_limit, 50);
        assert_eq!(config.report.output_path, "target/report_card.json");
        Ok(())
    }

    #[test]
    fn test_invalid_values_fail_validation() -> Result<()> {
        let config: DqiConfig = serde_yaml::from_str("database-path: ''\nlisting:\n  default-limit: 0\n")?;
        let errors = config.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("database_path"));
        assert!(errors.errors().contains_key("listing"));
        Ok(())
    }

    #[test]
    fn test_overrides_apply_on_top_of_file() -> Result<()> {
        let mut config = DqiConfig::default();
        apply_overrides(&mut config, Some("/tmp/other.duckdb".into()), Some("TRUE".into()))?;
        assert_eq!(config.database_path, "/tmp/other.duckdb");
        assert!(config.import.reject_ungraded);

        let err = apply_overrides(&mut config, None, Some("maybe".into())).unwrap_err();
        assert!(matches!(err, InfrastructureError::ConfigError(_)));
        Ok(())
    }

    #[test]
    fn test_malformed_yaml_is_an_error() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("dqi_project_conf.yaml"), "listing: [oops")?;
        assert!(matches!(
            load_project_config(dir.path()),
            Err(InfrastructureError::YamlError(_))
        ));
        Ok(())
    }
}
