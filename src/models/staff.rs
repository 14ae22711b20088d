//! Staff model and salary configuration.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::student::{ActiveStatus, require_text};
use crate::error::{EngineError, EngineResult};

/// How a staff member's basic salary is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SalaryType {
    /// Basic salary is a monthly figure, pro-rated over working days.
    #[default]
    Monthly,
    /// Basic salary is paid per effective day.
    Daily,
    /// Basic salary is paid per hour of an effective day.
    Hourly,
}

/// Staff gender as captured on the staff form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    /// Male.
    Male,
    /// Female.
    Female,
    /// Other or undisclosed.
    Other,
}

/// A staff member as stored in the `staff` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Staff {
    /// Store-assigned identifier.
    #[serde(default)]
    pub id: String,
    /// Human-facing code, e.g. `DT-S-4821`.
    pub staff_code: String,
    /// Full name.
    pub full_name: String,
    /// Gender.
    pub gender: Gender,
    /// Contact phone number.
    pub phone: String,
    /// Optional contact email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Postal address.
    #[serde(default)]
    pub address: String,
    /// Job role: Teacher, Admin, Accountant...
    pub role: String,
    /// Optional qualification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualification: Option<String>,
    /// Date the staff member joined.
    pub joining_date: NaiveDate,
    /// How `basic_salary` is expressed.
    #[serde(default)]
    pub salary_type: SalaryType,
    /// Basic salary in rupees.
    #[serde(default)]
    pub basic_salary: Decimal,
    /// Employment status.
    #[serde(default)]
    pub status: ActiveStatus,
    /// When the record was created in the store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Staff {
    /// Returns true if the staff member is currently employed.
    pub fn is_active(&self) -> bool {
        self.status == ActiveStatus::Active
    }
}

/// The staff form: everything needed to create a [`Staff`] record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStaff {
    /// Full name.
    pub full_name: String,
    /// Gender.
    pub gender: Gender,
    /// Contact phone number.
    pub phone: String,
    /// Optional contact email.
    #[serde(default)]
    pub email: Option<String>,
    /// Postal address.
    #[serde(default)]
    pub address: String,
    /// Job role.
    pub role: String,
    /// Optional qualification.
    #[serde(default)]
    pub qualification: Option<String>,
    /// Date the staff member joined.
    pub joining_date: NaiveDate,
    /// How `basic_salary` is expressed.
    #[serde(default)]
    pub salary_type: SalaryType,
    /// Basic salary in rupees.
    pub basic_salary: Decimal,
    /// Initial status.
    #[serde(default)]
    pub status: ActiveStatus,
}

impl NewStaff {
    /// Rejects forms with blank required fields or a negative salary.
    pub fn validate(&self) -> EngineResult<()> {
        require_text("fullName", &self.full_name)?;
        require_text("phone", &self.phone)?;
        require_text("role", &self.role)?;
        if self.basic_salary < Decimal::ZERO {
            return Err(EngineError::validation("basicSalary", "cannot be negative"));
        }
        Ok(())
    }

    /// Builds the stored staff record once a code has been issued.
    pub fn into_staff(self, staff_code: String) -> Staff {
        Staff {
            id: String::new(),
            staff_code,
            full_name: self.full_name.trim().to_string(),
            gender: self.gender,
            phone: self.phone.trim().to_string(),
            email: self.email,
            address: self.address,
            role: self.role.trim().to_string(),
            qualification: self.qualification,
            joining_date: self.joining_date,
            salary_type: self.salary_type,
            basic_salary: self.basic_salary,
            status: self.status,
            created_at: None,
        }
    }
}
