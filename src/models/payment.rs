//! Fee payment model.
//!
//! A [`Payment`] is one fee-collection event. It is immutable once stored.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::period::FeeMonth;
use super::student::require_text;
use crate::error::{EngineError, EngineResult};

/// A fee payment as stored in the `payments` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    /// Store-assigned identifier.
    #[serde(default)]
    pub id: String,
    /// The paying student's id.
    pub student_id: String,
    /// Student name at the time of payment.
    pub student_name: String,
    /// Student code at the time of payment, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_code: Option<String>,
    /// Student grade at the time of payment.
    pub grade: String,
    /// The month (or admission) this fee covers.
    pub fee_month: FeeMonth,
    /// The year this fee covers.
    pub fee_year: i32,
    /// Amount collected in rupees.
    pub amount: Decimal,
    /// Date the money was received.
    pub payment_date: NaiveDate,
    /// Receipt number printed on the receipt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_number: Option<String>,
    /// Free-text remarks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    /// When the record was created in the store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Payment {
    /// Rejects payments with a missing student, blank grade or non-positive amount.
    pub fn validate(&self) -> EngineResult<()> {
        require_text("studentId", &self.student_id)?;
        require_text("studentName", &self.student_name)?;
        require_text("grade", &self.grade)?;
        if self.amount <= Decimal::ZERO {
            return Err(EngineError::validation("amount", "must be greater than zero"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payment(amount: Decimal) -> Payment {
        Payment {
            id: String::new(),
            student_id: "stu_1".to_string(),
            student_name: "Priya".to_string(),
            student_code: None,
            grade: "10".to_string(),
            fee_month: FeeMonth::Admission,
            fee_year: 2026,
            amount,
            payment_date: NaiveDate::from_ymd_opt(2026, 6, 2).unwrap(),
            receipt_number: None,
            remarks: None,
            created_at: None,
        }
    }

    #[test]
    fn test_zero_amount_rejected() {
        assert!(payment(Decimal::ZERO).validate().is_err());
        assert!(payment(Decimal::new(1500, 0)).validate().is_ok());
    }

    #[test]
    fn test_deserialize_numeric_amount() {
        let json = r#"{
            "studentId": "stu_1",
            "studentName": "Priya",
            "grade": "10",
            "feeMonth": "July",
            "feeYear": 2026,
            "amount": 1500,
            "paymentDate": "2026-07-05"
        }"#;
        let payment: Payment = serde_json::from_str(json).unwrap();
        assert_eq!(payment.amount, Decimal::new(1500, 0));
        assert_eq!(payment.fee_month.to_string(), "July");
        assert!(payment.receipt_number.is_none());
    }
}
