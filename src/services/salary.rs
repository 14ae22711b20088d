//! Salary generation and payment.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::info;

use super::attendance::AttendanceService;
use super::{from_record, from_records, require, to_document};
use crate::calculation::{
    AttendanceSummary, PayrollCalculation, PayrollInput, calculate_salary_with, payroll_days,
    tally,
};
use crate::config::OfficeConfig;
use crate::documents::SalarySlipData;
use crate::error::{EngineError, EngineResult};
use crate::models::{MonthName, PaymentStatus, Staff, StaffSalary};
use crate::store::{Collection, Document, Order, RecordStore};

/// A freshly generated salary with the attendance and calculation behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedSalary {
    pub salary: StaffSalary,
    pub attendance: AttendanceSummary,
    pub calculation: PayrollCalculation,
}

/// Reads and writes the `staff_salary` collection.
pub struct SalaryService<'a> {
    store: &'a dyn RecordStore,
    config: &'a OfficeConfig,
}

impl<'a> SalaryService<'a> {
    pub fn new(store: &'a dyn RecordStore, config: &'a OfficeConfig) -> Self {
        Self { store, config }
    }

    /// Generates (or regenerates) a staff member's salary for a month.
    ///
    /// The record is keyed `{staffId}_{month}_{year}`. An unpaid record for
    /// the period is recomputed in place; a paid one is final and generation
    /// fails with `InvalidTransition`. `working_days` defaults to the
    /// configured working days.
    pub fn generate(
        &self,
        staff_id: &str,
        month: MonthName,
        year: i32,
        working_days: Option<u32>,
    ) -> EngineResult<GeneratedSalary> {
        let staff: Staff = require(self.store, Collection::Staff, staff_id)?;
        let key = StaffSalary::key_for(staff_id, month, year);

        let payroll = self.config.payroll();
        let total_working_days = working_days.unwrap_or(payroll.default_working_days);

        let records = AttendanceService::new(self.store).month_records(staff_id, month, year)?;
        let attendance = tally(&records);
        let days = payroll_days(&attendance);

        let input = PayrollInput {
            basic_salary: staff.basic_salary,
            salary_type: staff.salary_type,
            present_days: days.present_days,
            half_days: days.half_days,
            total_working_days,
        };
        let calculation = calculate_salary_with(&input, payroll.hours_per_day, 1)?;

        let salary = StaffSalary {
            id: key.clone(),
            staff_id: staff.id.clone(),
            staff_name: Some(staff.full_name.clone()),
            month,
            year,
            total_working_days,
            present_days: days.present_days,
            half_days: days.half_days,
            absent_days: days.absent_days,
            basic_salary: staff.basic_salary,
            deductions: calculation.deductions,
            net_salary: calculation.net_salary,
            payment_status: PaymentStatus::Unpaid,
            paid_at: None,
            created_at: None,
        };
        // Checked inside the store write so a concurrent mark_paid is never
        // overwritten back to Unpaid.
        let written = self.store.upsert_unless(
            Collection::StaffSalary,
            &key,
            "paymentStatus",
            &json!(PaymentStatus::Paid),
            to_document(&salary)?,
        )?;
        if !written {
            return Err(EngineError::InvalidTransition {
                id: key,
                message: "salary is already paid and cannot be regenerated".to_string(),
            });
        }

        info!(
            salary_id = %key,
            staff_id = %staff_id,
            rule = %calculation.audit_step.rule_id,
            net_salary = %calculation.net_salary,
            "Salary generated"
        );

        Ok(GeneratedSalary {
            salary: require(self.store, Collection::StaffSalary, &key)?,
            attendance,
            calculation,
        })
    }

    /// Moves an unpaid salary to paid.
    pub fn mark_paid(&self, salary_id: &str) -> EngineResult<StaffSalary> {
        let mut salary: StaffSalary = require(self.store, Collection::StaffSalary, salary_id)?;
        salary.mark_paid(Utc::now())?;

        let mut patch = Document::new();
        patch.insert("paymentStatus".to_string(), json!(salary.payment_status));
        patch.insert("paidAt".to_string(), serde_json::to_value(salary.paid_at)?);
        self.store.update(Collection::StaffSalary, salary_id, patch)?;

        info!(salary_id = %salary_id, net_salary = %salary.net_salary, "Salary paid");
        Ok(salary)
    }

    pub fn get(&self, salary_id: &str) -> EngineResult<Option<StaffSalary>> {
        self.store
            .get_by_id(Collection::StaffSalary, salary_id)?
            .map(from_record)
            .transpose()
    }

    /// One staff member's salaries, newest first.
    pub fn history(&self, staff_id: &str) -> EngineResult<Vec<StaffSalary>> {
        from_records(self.store.query_equal(
            Collection::StaffSalary,
            "staffId",
            &Value::String(staff_id.to_string()),
            Some(Order::CreatedAtDesc),
        )?)
    }

    /// Every salary generated for a month.
    pub fn monthly(&self, month: MonthName, year: i32) -> EngineResult<Vec<StaffSalary>> {
        let salaries: Vec<StaffSalary> = from_records(self.store.query_equal(
            Collection::StaffSalary,
            "month",
            &Value::String(month.to_string()),
            Some(Order::CreatedAtAsc),
        )?)?;
        Ok(salaries.into_iter().filter(|s| s.year == year).collect())
    }

    /// Slip data for a stored salary.
    pub fn slip(&self, salary_id: &str) -> EngineResult<Option<SalarySlipData>> {
        let Some(salary) = self.get(salary_id)? else {
            return Ok(None);
        };
        let staff_name = match &salary.staff_name {
            Some(name) => name.clone(),
            None => self
                .store
                .get_by_id(Collection::Staff, &salary.staff_id)?
                .map(from_record::<Staff>)
                .transpose()?
                .map(|s| s.full_name)
                .unwrap_or_default(),
        };
        Ok(Some(SalarySlipData::from_salary(
            &salary,
            &staff_name,
            self.config.organization(),
        )))
    }
}
