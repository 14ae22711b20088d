//! Student model and admission input.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Whether a student or staff member is currently enrolled/employed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ActiveStatus {
    /// Currently enrolled or employed.
    #[default]
    Active,
    /// Left, suspended or otherwise not current.
    Inactive,
}

impl ActiveStatus {
    /// Returns the opposite status.
    pub fn toggled(self) -> Self {
        match self {
            ActiveStatus::Active => ActiveStatus::Inactive,
            ActiveStatus::Inactive => ActiveStatus::Active,
        }
    }
}

/// A student as stored in the `students` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    /// Store-assigned identifier.
    #[serde(default)]
    pub id: String,
    /// Human-facing code printed on receipts (e.g. `DT-4821`).
    pub student_code: String,
    /// Full name of the student.
    pub full_name: String,
    /// Contact phone number.
    pub phone: String,
    /// Optional contact email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Optional postal address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Optional parent or guardian name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_name: Option<String>,
    /// Class/standard the student attends.
    pub grade: String,
    /// Enrollment status.
    #[serde(default)]
    pub status: ActiveStatus,
    /// Date of admission.
    pub admission_date: NaiveDate,
    /// When the record was created in the store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// The admission form: everything needed to create a [`Student`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentAdmission {
    /// Full name of the student.
    pub full_name: String,
    /// Contact phone number.
    pub phone: String,
    /// Optional contact email.
    #[serde(default)]
    pub email: Option<String>,
    /// Optional postal address.
    #[serde(default)]
    pub address: Option<String>,
    /// Optional parent or guardian name.
    #[serde(default)]
    pub parent_name: Option<String>,
    /// Class/standard the student joins.
    pub grade: String,
    /// Initial status, `Active` unless stated.
    #[serde(default)]
    pub status: ActiveStatus,
    /// Date of admission.
    pub admission_date: NaiveDate,
}

impl StudentAdmission {
    /// Rejects forms with blank required fields.
    pub fn validate(&self) -> EngineResult<()> {
        require_text("fullName", &self.full_name)?;
        require_text("phone", &self.phone)?;
        require_text("grade", &self.grade)?;
        Ok(())
    }

    /// Builds the stored student once a code has been issued.
    pub fn into_student(self, student_code: String) -> Student {
        Student {
            id: String::new(),
            student_code,
            full_name: self.full_name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: self.email,
            address: self.address,
            parent_name: self.parent_name,
            grade: self.grade.trim().to_string(),
            status: self.status,
            admission_date: self.admission_date,
            created_at: None,
        }
    }
}

/// Fails with a validation error when `value` is blank.
pub(crate) fn require_text(field: &str, value: &str) -> EngineResult<()> {
    if value.trim().is_empty() {
        return Err(EngineError::validation(field, "is required"));
    }
    Ok(())
}
