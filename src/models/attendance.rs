//! Staff attendance model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A day's attendance status.
///
/// Current write paths only produce `Present`, `Absent` and `Half Day`.
/// Historical records may still carry `Leave`, and anything else read from
/// the store lands in `Unrecognized` instead of failing the read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttendanceStatus {
    /// Worked the full day.
    Present,
    /// Did not work.
    Absent,
    /// Worked half the day.
    #[serde(rename = "Half Day")]
    HalfDay,
    /// On leave (legacy value).
    Leave,
    /// Any status string this engine does not know.
    ///
    /// The original text is not kept: the value serializes back as
    /// `"Unrecognized"`, so writing such a record replaces its status.
    #[serde(other)]
    Unrecognized,
}

impl AttendanceStatus {
    /// Returns true if the status may be written by the marking workflow.
    pub fn is_markable(&self) -> bool {
        matches!(
            self,
            AttendanceStatus::Present | AttendanceStatus::Absent | AttendanceStatus::HalfDay
        )
    }
}

/// One (staff, date) attendance record from the `staff_attendance` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffAttendance {
    /// Store key.
    #[serde(default)]
    pub id: String,
    /// The staff member.
    pub staff_id: String,
    /// Staff name snapshot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staff_name: Option<String>,
    /// The day being marked.
    pub date: NaiveDate,
    /// The status for that day.
    pub status: AttendanceStatus,
    /// When the record was written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl StaffAttendance {
    /// Deterministic key so re-marking a day replaces the earlier mark.
    pub fn idempotency_key(&self) -> String {
        format!("{}_{}", self.staff_id, self.date.format("%Y-%m-%d"))
    }
}
