//! Staff salary record and its payment state machine.
//!
//! ```text
//! [nonexistent] --generate--> Unpaid --mark_paid--> Paid (terminal)
//! ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::period::MonthName;
use crate::error::{EngineError, EngineResult};

/// Whether a generated salary has been paid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PaymentStatus {
    /// Generated, awaiting payment.
    #[default]
    Unpaid,
    /// Paid out. Terminal.
    Paid,
}

/// One (staff, month, year) payroll record from the `staff_salary` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffSalary {
    /// Store key.
    #[serde(default)]
    pub id: String,
    /// The staff member being paid.
    pub staff_id: String,
    /// Staff name snapshot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staff_name: Option<String>,
    /// Pay month.
    pub month: MonthName,
    /// Pay year.
    pub year: i32,
    /// Working days in the period.
    pub total_working_days: u32,
    /// Days marked present.
    pub present_days: u32,
    /// Days marked half day.
    pub half_days: u32,
    /// Days not paid (absent, leave or unrecognized).
    pub absent_days: u32,
    /// Basic salary snapshot.
    pub basic_salary: Decimal,
    /// Always zero; kept for schema compatibility.
    pub deductions: Decimal,
    /// Amount payable.
    pub net_salary: Decimal,
    /// Payment state.
    #[serde(default)]
    pub payment_status: PaymentStatus,
    /// When the salary was paid out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
    /// When the record was generated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl StaffSalary {
    /// Deterministic key for a (staff, month, year) period.
    pub fn key_for(staff_id: &str, month: MonthName, year: i32) -> String {
        format!("{}_{}_{}", staff_id, month, year)
    }

    /// The key this record is stored under.
    pub fn idempotency_key(&self) -> String {
        Self::key_for(&self.staff_id, self.month, self.year)
    }

    /// Returns true once the salary has been paid.
    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }

    /// Moves an unpaid salary to paid and stamps `paid_at`.
    ///
    /// Fails with [`EngineError::InvalidTransition`] if it is already paid.
    pub fn mark_paid(&mut self, at: DateTime<Utc>) -> EngineResult<()> {
        if self.is_paid() {
            return Err(EngineError::InvalidTransition {
                id: self.id.clone(),
                message: "salary is already paid".to_string(),
            });
        }
        self.payment_status = PaymentStatus::Paid;
        self.paid_at = Some(at);
        Ok(())
    }
}
