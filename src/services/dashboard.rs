//! Office dashboard.

use chrono::NaiveDate;

use super::from_records;
use crate::calculation::{DashboardSummary, build_dashboard};
use crate::error::EngineResult;
use crate::models::{Payment, Student};
use crate::store::{Collection, Order, RecordStore};

/// Loads what the dashboard needs and computes its figures.
pub struct DashboardService<'a> {
    store: &'a dyn RecordStore,
}

impl<'a> DashboardService<'a> {
    pub fn new(store: &'a dyn RecordStore) -> Self {
        Self { store }
    }

    pub fn summary(&self, today: NaiveDate) -> EngineResult<DashboardSummary> {
        let students: Vec<Student> = from_records(self.store.list(Collection::Students, None)?)?;
        let payments: Vec<Payment> =
            from_records(self.store.list(Collection::Payments, Some(Order::CreatedAtDesc))?)?;
        let exams = self.store.list(Collection::Exams, None)?.len();
        Ok(build_dashboard(&students, &payments, exams, today))
    }
}
