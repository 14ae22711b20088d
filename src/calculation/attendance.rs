//! Attendance aggregation.
//!
//! Tallies daily attendance records into status buckets for payroll and for
//! the staff profile breakdown. Tallying never fails: legacy `Leave` records
//! get their own bucket and unknown statuses land in `unrecognized`.

use std::collections::HashMap;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{AttendanceStatus, AuditWarning, MonthName, StaffAttendance};

/// Counts of attendance records per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSummary {
    /// Records marked present.
    pub present: u32,
    /// Records marked absent.
    pub absent: u32,
    /// Records marked half day.
    pub half_day: u32,
    /// Legacy leave records.
    pub leave: u32,
    /// Records with a status this engine does not know.
    pub unrecognized: u32,
    /// All records counted.
    pub total: u32,
}

/// The attendance figures a salary record is computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollDays {
    /// Full days worked.
    pub present_days: u32,
    /// Half days worked.
    pub half_days: u32,
    /// Days not paid: absent, leave or unrecognized.
    pub absent_days: u32,
}

/// Counts every record given into its status bucket.
///
/// No deduplication happens here; a day marked twice is counted twice. Use
/// [`canonical_per_day`] first when the input may hold re-marked days.
///
/// ```
/// use tuition_engine::calculation::tally;
/// use tuition_engine::models::{AttendanceStatus, StaffAttendance};
/// use chrono::NaiveDate;
///
/// let mark = |day, status| StaffAttendance {
///     id: String::new(),
///     staff_id: "st_1".to_string(),
///     staff_name: None,
///     date: NaiveDate::from_ymd_opt(2026, 3, day).unwrap(),
///     status,
///     created_at: None,
/// };
/// let summary = tally(&[
///     mark(2, AttendanceStatus::Present),
///     mark(3, AttendanceStatus::HalfDay),
///     mark(4, AttendanceStatus::Unrecognized),
/// ]);
/// assert_eq!(summary.present, 1);
/// assert_eq!(summary.half_day, 1);
/// assert_eq!(summary.unrecognized, 1);
/// ```
pub fn tally(records: &[StaffAttendance]) -> AttendanceSummary {
    records
        .iter()
        .fold(AttendanceSummary::default(), |mut summary, record| {
            match record.status {
                AttendanceStatus::Present => summary.present += 1,
                AttendanceStatus::Absent => summary.absent += 1,
                AttendanceStatus::HalfDay => summary.half_day += 1,
                AttendanceStatus::Leave => summary.leave += 1,
                AttendanceStatus::Unrecognized => summary.unrecognized += 1,
            }
            summary.total += 1;
            summary
        })
}

/// Maps a summary onto the figures payroll needs. Leave and unrecognized
/// statuses are unpaid and count as absent days.
pub fn payroll_days(summary: &AttendanceSummary) -> PayrollDays {
    PayrollDays {
        present_days: summary.present,
        half_days: summary.half_day,
        absent_days: summary.absent + summary.leave + summary.unrecognized,
    }
}

/// Keeps one authoritative record per (staff, date).
///
/// The record with the latest `created_at` wins; when timestamps tie or are
/// missing, the one later in the input wins. Output is ordered by staff id,
/// then date.
pub fn canonical_per_day(records: &[StaffAttendance]) -> Vec<StaffAttendance> {
    let mut latest: HashMap<(&str, NaiveDate), &StaffAttendance> = HashMap::new();

    for record in records {
        let key = (record.staff_id.as_str(), record.date);
        match latest.get(&key) {
            Some(current) if current.created_at > record.created_at => {}
            _ => {
                latest.insert(key, record);
            }
        }
    }

    let mut kept: Vec<StaffAttendance> = latest.into_values().cloned().collect();
    kept.sort_by(|a, b| a.staff_id.cmp(&b.staff_id).then(a.date.cmp(&b.date)));
    kept
}

/// One warning per (staff, date) that appears more than once.
pub fn duplicate_day_warnings(records: &[StaffAttendance]) -> Vec<AuditWarning> {
    let mut counts: HashMap<(&str, NaiveDate), u32> = HashMap::new();
    for record in records {
        *counts.entry((record.staff_id.as_str(), record.date)).or_insert(0) += 1;
    }

    let mut duplicates: Vec<((&str, NaiveDate), u32)> =
        counts.into_iter().filter(|(_, n)| *n > 1).collect();
    duplicates.sort();

    duplicates
        .into_iter()
        .map(|((staff_id, date), n)| AuditWarning {
            code: "DUPLICATE_ATTENDANCE".to_string(),
            message: format!("{} marked {} times for staff '{}'", date, n, staff_id),
        })
        .collect()
}

/// First and last day of a month.
pub fn month_bounds(month: MonthName, year: i32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month.number(), 1)?;
    let last = first.checked_add_months(Months::new(1))?.pred_opt()?;
    Some((first, last))
}

/// Records dated within the given month.
pub fn filter_month(records: &[StaffAttendance], month: MonthName, year: i32) -> Vec<StaffAttendance> {
    match month_bounds(month, year) {
        Some((first, last)) => records
            .iter()
            .filter(|r| r.date >= first && r.date <= last)
            .cloned()
            .collect(),
        None => Vec::new(),
    }
}

/// Records from the last `months` calendar months, counting the month of
/// `today` as the first. Zero months keeps everything.
pub fn recent_months(records: &[StaffAttendance], today: NaiveDate, months: u32) -> Vec<StaffAttendance> {
    if months == 0 {
        return records.to_vec();
    }
    let start = today
        .with_day(1)
        .and_then(|d| d.checked_sub_months(Months::new(months - 1)));
    match start {
        Some(start) => records
            .iter()
            .filter(|r| r.date >= start && r.date <= today)
            .cloned()
            .collect(),
        None => records.to_vec(),
    }
}
