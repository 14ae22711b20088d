//! Fee collection and receipts.

use chrono::Datelike;
use serde_json::Value;
use tracing::info;

use super::{from_record, from_records, random_digits, require, to_document};
use crate::config::OfficeConfig;
use crate::documents::ReceiptData;
use crate::error::EngineResult;
use crate::models::Payment;
use crate::store::{Collection, Order, RecordStore};

/// Reads and writes the `payments` collection.
pub struct FeeService<'a> {
    store: &'a dyn RecordStore,
    config: &'a OfficeConfig,
}

/// `RCP-<year>-<5 digits>`.
pub(crate) fn receipt_number(year: i32) -> String {
    format!("RCP-{}-{}", year, random_digits(10_000))
}

impl<'a> FeeService<'a> {
    pub fn new(store: &'a dyn RecordStore, config: &'a OfficeConfig) -> Self {
        Self { store, config }
    }

    /// Records a payment, issuing a receipt number when none was given.
    /// Payments are never edited afterwards.
    pub fn record_payment(&self, mut payment: Payment) -> EngineResult<Payment> {
        payment.validate()?;
        if payment
            .receipt_number
            .as_deref()
            .is_none_or(|n| n.trim().is_empty())
        {
            payment.receipt_number = Some(receipt_number(payment.payment_date.year()));
        }
        let id = self.store.insert(Collection::Payments, to_document(&payment)?)?;
        info!(
            payment_id = %id,
            student_id = %payment.student_id,
            fee_month = %payment.fee_month,
            fee_year = payment.fee_year,
            amount = %payment.amount,
            "Payment recorded"
        );
        require(self.store, Collection::Payments, &id)
    }

    /// Every payment, newest first.
    pub fn all_payments(&self) -> EngineResult<Vec<Payment>> {
        from_records(self.store.list(Collection::Payments, Some(Order::CreatedAtDesc))?)
    }

    /// One student's payments, newest first.
    pub fn payments_for_student(&self, student_id: &str) -> EngineResult<Vec<Payment>> {
        from_records(self.store.query_equal(
            Collection::Payments,
            "studentId",
            &Value::String(student_id.to_string()),
            Some(Order::CreatedAtDesc),
        )?)
    }

    pub fn get_payment(&self, id: &str) -> EngineResult<Option<Payment>> {
        self.store
            .get_by_id(Collection::Payments, id)?
            .map(from_record)
            .transpose()
    }

    /// Receipt data for a stored payment.
    pub fn receipt(&self, payment_id: &str) -> EngineResult<Option<ReceiptData>> {
        Ok(self
            .get_payment(payment_id)?
            .map(|p| ReceiptData::from_payment(&p, self.config.organization())))
    }
}
