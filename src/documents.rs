//! Data for printed documents.
//!
//! A fee receipt and a salary slip are each assembled from one stored record
//! plus the letterhead from configuration. Layout and rendering happen
//! elsewhere; these structs are exactly what a renderer consumes.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::Organization;
use crate::models::{FeeMonth, MonthName, Payment, StaffSalary};

/// Printed when a legacy payment has no receipt number.
pub const MISSING_RECEIPT_NUMBER: &str = "N/A";

/// Everything printed on a fee receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptData {
    pub letterhead: Organization,
    pub receipt_number: String,
    pub payment_date: NaiveDate,
    pub student_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_code: Option<String>,
    pub grade: String,
    /// Line item description, e.g. "Tuition Fee".
    pub description: String,
    pub fee_month: FeeMonth,
    pub fee_year: i32,
    /// `"<feeMonth> <feeYear>"` as shown in the table.
    pub period_label: String,
    pub amount: Decimal,
}

impl ReceiptData {
    pub fn from_payment(payment: &Payment, letterhead: &Organization) -> Self {
        let description = match payment.fee_month {
            FeeMonth::Admission => "Admission Fee",
            FeeMonth::Month(_) => "Tuition Fee",
        };
        Self {
            letterhead: letterhead.clone(),
            receipt_number: payment
                .receipt_number
                .clone()
                .unwrap_or_else(|| MISSING_RECEIPT_NUMBER.to_string()),
            payment_date: payment.payment_date,
            student_name: payment.student_name.clone(),
            student_code: payment.student_code.clone(),
            grade: payment.grade.clone(),
            description: description.to_string(),
            fee_month: payment.fee_month,
            fee_year: payment.fee_year,
            period_label: format!("{} {}", payment.fee_month, payment.fee_year),
            amount: payment.amount,
        }
    }
}

/// Everything printed on a salary slip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalarySlipData {
    pub letterhead: Organization,
    pub staff_name: String,
    pub month: MonthName,
    pub year: i32,
    pub total_working_days: u32,
    pub present_days: u32,
    pub half_days: u32,
    pub basic_salary: Decimal,
    pub net_salary: Decimal,
}

impl SalarySlipData {
    /// Builds the slip. `staff_name` fills in when the salary record has no
    /// name snapshot.
    pub fn from_salary(salary: &StaffSalary, staff_name: &str, letterhead: &Organization) -> Self {
        Self {
            letterhead: letterhead.clone(),
            staff_name: salary
                .staff_name
                .clone()
                .unwrap_or_else(|| staff_name.to_string()),
            month: salary.month,
            year: salary.year,
            total_working_days: salary.total_working_days,
            present_days: salary.present_days,
            half_days: salary.half_days,
            basic_salary: salary.basic_salary,
            net_salary: salary.net_salary,
        }
    }
}
