//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading office
//! configurations from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{
    AcademicConfig, AcademicSettings, OfficeConfig, Organization, OrganizationConfig,
    PayrollConfig, PayrollSettings,
};

/// Loads and provides access to office configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── organization.yaml   # Letterhead for receipts and salary slips
/// ├── academic.yaml       # Pass mark and student code prefix
/// └── payroll.yaml        # Working days, hours per day, staff code prefix
/// ```
///
/// `organization.yaml` is required. The other two files are optional and
/// fall back to the built-in defaults (35% pass mark, 26 working days,
/// 8 hours per day).
///
/// # Example
///
/// ```no_run
/// use tuition_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// println!("Letterhead: {}", loader.organization().name);
/// println!("Pass mark: {}%", loader.academic().pass_percentage);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: OfficeConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if `organization.yaml` is missing, or if any present
    /// file contains invalid YAML.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let organization =
            Self::load_yaml::<OrganizationConfig>(&path.join("organization.yaml"))?.organization;

        let academic = Self::load_optional::<AcademicConfig>(&path.join("academic.yaml"))?
            .map(|c| c.academic)
            .unwrap_or_default();

        let payroll = Self::load_optional::<PayrollConfig>(&path.join("payroll.yaml"))?
            .map(|c| c.payroll)
            .unwrap_or_default();

        if payroll.hours_per_day.is_sign_negative() {
            return Err(EngineError::ConfigParseError {
                path: path.join("payroll.yaml").display().to_string(),
                message: "hours_per_day cannot be negative".to_string(),
            });
        }

        tracing::debug!(
            organization = %organization.name,
            pass_percentage = %academic.pass_percentage,
            working_days = payroll.default_working_days,
            "Loaded office configuration"
        );

        Ok(Self {
            config: OfficeConfig::new(organization, academic, payroll),
        })
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: OfficeConfig) -> Self {
        Self { config }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads a YAML file if it exists.
    fn load_optional<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<Option<T>> {
        if !path.exists() {
            return Ok(None);
        }
        Self::load_yaml(path).map(Some)
    }

    /// Returns the underlying office configuration.
    pub fn config(&self) -> &OfficeConfig {
        &self.config
    }

    /// Returns the letterhead.
    pub fn organization(&self) -> &Organization {
        self.config.organization()
    }

    /// Returns the academic settings.
    pub fn academic(&self) -> &AcademicSettings {
        self.config.academic()
    }

    /// Returns the payroll settings.
    pub fn payroll(&self) -> &PayrollSettings {
        self.config.payroll()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn config_path() -> &'static str {
        "./config/default"
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.organization().name, "Diamond Tuitions");
        assert_eq!(loader.academic().pass_percentage, Decimal::new(35, 0));
        assert_eq!(loader.payroll().default_working_days, 26);
        assert_eq!(loader.payroll().hours_per_day, Decimal::new(8, 0));
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("organization.yaml"));
            }
            other => panic!("Expected ConfigNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_optional_files_fall_back_to_defaults() {
        let dir = std::env::temp_dir().join(format!("tuition-config-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("organization.yaml"),
            "organization:\n  name: Test Center\n  address: 1 Main St\n  phone: '123'\n",
        )
        .unwrap();

        let loader = ConfigLoader::load(&dir).unwrap();
        assert_eq!(loader.organization().name, "Test Center");
        assert_eq!(loader.payroll().default_working_days, 26);
        assert_eq!(loader.academic().student_code_prefix, "DT-");

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_invalid_yaml_returns_parse_error() {
        let dir = std::env::temp_dir().join(format!("tuition-config-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("organization.yaml"), "organization: [unclosed").unwrap();

        let result = ConfigLoader::load(&dir);
        assert!(matches!(result, Err(EngineError::ConfigParseError { .. })));

        fs::remove_dir_all(&dir).ok();
    }
}
