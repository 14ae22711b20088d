//! Staff attendance marking and summaries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use super::{from_records, to_document};
use crate::calculation::{
    AttendanceSummary, canonical_per_day, duplicate_day_warnings, filter_month, recent_months,
    tally,
};
use crate::error::{EngineError, EngineResult};
use crate::models::{AttendanceStatus, MonthName, StaffAttendance};
use crate::store::{BatchOp, Collection, Order, RecordStore};

/// One row of the daily attendance sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceMark {
    pub staff_id: String,
    #[serde(default)]
    pub staff_name: Option<String>,
    pub status: AttendanceStatus,
}

/// Reads and writes the `staff_attendance` collection.
pub struct AttendanceService<'a> {
    store: &'a dyn RecordStore,
}

impl<'a> AttendanceService<'a> {
    pub fn new(store: &'a dyn RecordStore) -> Self {
        Self { store }
    }

    /// Marks a whole day in one atomic write.
    ///
    /// Records are keyed `{staffId}_{date}`, so marking a day again replaces
    /// the earlier status. Only `Present`, `Absent` and `Half Day` may be
    /// written.
    pub fn mark_day(&self, date: NaiveDate, marks: Vec<AttendanceMark>) -> EngineResult<Vec<StaffAttendance>> {
        let mut records = Vec::with_capacity(marks.len());
        let mut ops = Vec::with_capacity(marks.len());
        for mark in marks {
            if mark.staff_id.trim().is_empty() {
                return Err(EngineError::validation("staffId", "is required"));
            }
            if !mark.status.is_markable() {
                return Err(EngineError::validation(
                    "status",
                    format!("'{:?}' cannot be marked for staff '{}'", mark.status, mark.staff_id),
                ));
            }
            let mut record = StaffAttendance {
                id: String::new(),
                staff_id: mark.staff_id,
                staff_name: mark.staff_name,
                date,
                status: mark.status,
                created_at: None,
            };
            record.id = record.idempotency_key();
            ops.push(BatchOp::Upsert {
                collection: Collection::StaffAttendance,
                key: record.id.clone(),
                record: to_document(&record)?,
            });
            records.push(record);
        }

        self.store.batch_write(ops)?;
        info!(date = %date, marked = records.len(), "Attendance marked");
        Ok(records)
    }

    /// Every record for one day.
    pub fn for_date(&self, date: NaiveDate) -> EngineResult<Vec<StaffAttendance>> {
        from_records(self.store.query_equal(
            Collection::StaffAttendance,
            "date",
            &Value::String(date.format("%Y-%m-%d").to_string()),
            None,
        )?)
    }

    /// Every record for one staff member, oldest first.
    pub fn for_staff(&self, staff_id: &str) -> EngineResult<Vec<StaffAttendance>> {
        from_records(self.store.query_equal(
            Collection::StaffAttendance,
            "staffId",
            &Value::String(staff_id.to_string()),
            Some(Order::CreatedAtAsc),
        )?)
    }

    /// One authoritative record per day for a staff member's month.
    pub fn month_records(&self, staff_id: &str, month: MonthName, year: i32) -> EngineResult<Vec<StaffAttendance>> {
        let records = filter_month(&self.for_staff(staff_id)?, month, year);
        for warning in duplicate_day_warnings(&records) {
            warn!(staff_id = %staff_id, code = %warning.code, "{}", warning.message);
        }
        Ok(canonical_per_day(&records))
    }

    pub fn monthly_summary(&self, staff_id: &str, month: MonthName, year: i32) -> EngineResult<AttendanceSummary> {
        Ok(tally(&self.month_records(staff_id, month, year)?))
    }

    /// Tally over the last `months` calendar months up to `today`.
    pub fn recent_summary(&self, staff_id: &str, today: NaiveDate, months: u32) -> EngineResult<AttendanceSummary> {
        let records = canonical_per_day(&self.for_staff(staff_id)?);
        Ok(tally(&recent_months(&records, today, months)))
    }

    /// How many staff are marked present on `date`.
    pub fn present_count(&self, date: NaiveDate) -> EngineResult<usize> {
        Ok(self
            .for_date(date)?
            .iter()
            .filter(|r| r.status == AttendanceStatus::Present)
            .count())
    }
}
