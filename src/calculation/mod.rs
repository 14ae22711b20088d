//! Calculation logic for the tuition office.
//!
//! Pure functions over records already loaded from the store: percentage,
//! grading and pass/fail rules, per-exam analytics and rankings, student
//! progression across an exam series, attendance tallies, salary
//! calculation and the dashboard figures. Nothing here touches the store.

mod attendance;
mod dashboard;
mod exam_analytics;
mod grading;
mod payroll;
mod progression;
mod rounding;

pub use attendance::{
    AttendanceSummary, PayrollDays, canonical_per_day, duplicate_day_warnings, filter_month,
    month_bounds, payroll_days, recent_months, tally,
};
pub use dashboard::{
    DashboardSummary, FeeBucket, GradeCount, RECENT_PAYMENT_LIMIT, build_dashboard,
    fees_by_month, month_collection, students_by_grade,
};
pub use exam_analytics::{
    ExamAnalytics, StudentResult, StudentTotal, SubjectAverage, analyze_exam, class_average,
    pass_rate, rank, student_total, student_totals, subject_average,
};
pub use grading::{
    DEFAULT_PASS_PERCENTAGE, LetterGrade, PassStatus, grade, pass_status, pass_status_with,
    percentage,
};
pub use payroll::{
    DEFAULT_HOURS_PER_DAY, DEFAULT_WORKING_DAYS, PayrollCalculation, PayrollInput,
    calculate_salary, calculate_salary_with, effective_days,
};
pub use progression::{
    ProgressionPoint, SubjectScore, exam_series_names, series_progression, series_sittings,
    sitting_dates, subject_breakdown,
};
pub use rounding::round_whole;
