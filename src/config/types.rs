//! Configuration types for the tuition office.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Letterhead printed on receipts and salary slips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    /// The organization's name.
    pub name: String,
    /// Optional tagline under the name.
    #[serde(default)]
    pub tagline: Option<String>,
    /// Postal address.
    pub address: String,
    /// Contact phone.
    pub phone: String,
    /// Optional contact email.
    #[serde(default)]
    pub email: Option<String>,
}

/// `organization.yaml` file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct OrganizationConfig {
    /// The letterhead.
    pub organization: Organization,
}

/// Academic settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcademicSettings {
    /// Percentage at or above which a student passes.
    #[serde(default = "default_pass_percentage")]
    pub pass_percentage: Decimal,
    /// Prefix for generated student codes.
    #[serde(default = "default_student_code_prefix")]
    pub student_code_prefix: String,
}

/// `academic.yaml` file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct AcademicConfig {
    /// Academic settings.
    pub academic: AcademicSettings,
}

/// Payroll settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollSettings {
    /// Working days in a pay period when the operator does not override it.
    #[serde(default = "default_working_days")]
    pub default_working_days: u32,
    /// Hours paid per effective day for hourly staff.
    #[serde(default = "default_hours_per_day")]
    pub hours_per_day: Decimal,
    /// Prefix for generated staff codes.
    #[serde(default = "default_staff_code_prefix")]
    pub staff_code_prefix: String,
    /// How many random codes to try before giving up on a collision.
    #[serde(default = "default_code_attempts")]
    pub code_attempts: u32,
}

/// `payroll.yaml` file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct PayrollConfig {
    /// Payroll settings.
    pub payroll: PayrollSettings,
}

fn default_pass_percentage() -> Decimal {
    Decimal::new(35, 0)
}

fn default_student_code_prefix() -> String {
    "DT-".to_string()
}

fn default_working_days() -> u32 {
    26
}

fn default_hours_per_day() -> Decimal {
    Decimal::new(8, 0)
}

fn default_staff_code_prefix() -> String {
    "DT-S-".to_string()
}

fn default_code_attempts() -> u32 {
    10
}

impl Default for AcademicSettings {
    fn default() -> Self {
        Self {
            pass_percentage: default_pass_percentage(),
            student_code_prefix: default_student_code_prefix(),
        }
    }
}

impl Default for PayrollSettings {
    fn default() -> Self {
        Self {
            default_working_days: default_working_days(),
            hours_per_day: default_hours_per_day(),
            staff_code_prefix: default_staff_code_prefix(),
            code_attempts: default_code_attempts(),
        }
    }
}

impl Default for Organization {
    fn default() -> Self {
        Self {
            name: "Tuition Center".to_string(),
            tagline: None,
            address: String::new(),
            phone: String::new(),
            email: None,
        }
    }
}

/// The complete office configuration loaded from YAML files.
#[derive(Debug, Clone, Default)]
pub struct OfficeConfig {
    organization: Organization,
    academic: AcademicSettings,
    payroll: PayrollSettings,
}

impl OfficeConfig {
    /// Creates a new OfficeConfig from its component parts.
    pub fn new(
        organization: Organization,
        academic: AcademicSettings,
        payroll: PayrollSettings,
    ) -> Self {
        Self {
            organization,
            academic,
            payroll,
        }
    }

    /// Returns the letterhead.
    pub fn organization(&self) -> &Organization {
        &self.organization
    }

    /// Returns the academic settings.
    pub fn academic(&self) -> &AcademicSettings {
        &self.academic
    }

    /// Returns the payroll settings.
    pub fn payroll(&self) -> &PayrollSettings {
        &self.payroll
    }
}
