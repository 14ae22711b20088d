//! Request types for the tuition office API.
//!
//! Record-creating endpoints accept the model forms directly
//! ([`StudentAdmission`](crate::models::StudentAdmission),
//! [`NewStaff`](crate::models::NewStaff), [`Payment`](crate::models::Payment),
//! [`Exam`](crate::models::Exam)). The types here cover the remaining bodies
//! and query strings.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::PayrollInput;
use crate::models::{Exam, MarksEntry, MonthName, StaffAttendance};
use crate::services::{AttendanceMark, NewMark};

/// Request body for `POST /payroll/calculate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollRequest {
    #[serde(flatten)]
    pub input: PayrollInput,
    /// Overrides the configured hours per day for hourly staff.
    #[serde(default)]
    pub hours_per_day: Option<Decimal>,
}

/// Request body for `POST /exams/analytics`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamAnalyticsRequest {
    /// The exam being analysed.
    pub exam: Exam,
    /// Every marks entry recorded against it.
    #[serde(default)]
    pub entries: Vec<MarksEntry>,
    /// Overrides the configured pass mark.
    #[serde(default)]
    pub pass_percentage: Option<Decimal>,
}

/// Request body for `POST /attendance/summary`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceSummaryRequest {
    pub records: Vec<StaffAttendance>,
}

/// Request body for `POST /attendance`: one day's sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkAttendanceRequest {
    pub date: NaiveDate,
    pub marks: Vec<AttendanceMark>,
}

/// Request body for `PUT /exams/:id/marks`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveMarksRequest {
    pub marks: Vec<NewMark>,
}

/// Request body for `POST /staff/:id/salary`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateSalaryRequest {
    pub month: MonthName,
    pub year: i32,
    /// Defaults to the configured working days.
    #[serde(default)]
    pub total_working_days: Option<u32>,
}

/// `?month=&year=` on the attendance summary. Both or neither.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PeriodQuery {
    pub month: Option<MonthName>,
    pub year: Option<i32>,
}

/// `?month=&year=` on the salary list.
#[derive(Debug, Clone, Deserialize)]
pub struct MonthQuery {
    pub month: MonthName,
    pub year: i32,
}

/// `?series=` on the progression view.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeriesQuery {
    pub series: Option<String>,
}

/// `?active=true` on the staff list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActiveQuery {
    #[serde(default)]
    pub active: bool,
}

/// `?grade=` on the exam list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GradeQuery {
    pub grade: Option<String>,
}
