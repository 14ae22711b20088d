//! Office dashboard figures.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{ActiveStatus, FeeMonth, MonthName, Payment, Student};

/// How many payments the dashboard lists.
pub const RECENT_PAYMENT_LIMIT: usize = 5;

/// Fees collected under one chart label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeBucket {
    /// Three-letter month label, or `Adm` for admission fees.
    pub label: String,
    /// Sum of amounts.
    pub amount: Decimal,
}

/// Head count for one grade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeCount {
    /// The grade (class).
    pub grade: String,
    /// Students enrolled in it.
    pub count: u32,
}

/// Everything shown on the office dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_students: u32,
    pub active_students: u32,
    pub inactive_students: u32,
    pub total_exams: u32,
    pub payment_count: u32,
    pub total_collected: Decimal,
    /// The month whose collection is reported below.
    pub current_month: MonthName,
    pub current_year: i32,
    pub current_month_collection: Decimal,
    pub current_month_payment_count: u32,
    /// Collection per fee month label, in first-seen order.
    pub fees_by_month: Vec<FeeBucket>,
    /// Students per grade, in first-seen order.
    pub students_by_grade: Vec<GradeCount>,
    /// The first few payments as given, expected newest first.
    pub recent_payments: Vec<Payment>,
}

/// Sums payments by the short label of their fee month.
pub fn fees_by_month(payments: &[Payment]) -> Vec<FeeBucket> {
    let mut buckets: Vec<FeeBucket> = Vec::new();
    for payment in payments {
        let label = payment.fee_month.short_label();
        match buckets.iter_mut().find(|b| b.label == label) {
            Some(bucket) => bucket.amount += payment.amount,
            None => buckets.push(FeeBucket {
                label,
                amount: payment.amount,
            }),
        }
    }
    buckets
}

/// Payments whose fee month and year match the given month.
pub fn month_collection(payments: &[Payment], month: MonthName, year: i32) -> (Decimal, u32) {
    payments
        .iter()
        .filter(|p| p.fee_month == FeeMonth::Month(month) && p.fee_year == year)
        .fold((Decimal::ZERO, 0), |(sum, n), p| (sum + p.amount, n + 1))
}

/// Counts students per grade.
pub fn students_by_grade(students: &[Student]) -> Vec<GradeCount> {
    let mut counts: Vec<GradeCount> = Vec::new();
    for student in students {
        match counts.iter_mut().find(|c| c.grade == student.grade) {
            Some(entry) => entry.count += 1,
            None => counts.push(GradeCount {
                grade: student.grade.clone(),
                count: 1,
            }),
        }
    }
    counts
}

/// Builds the dashboard for `today`.
///
/// `payments` should be ordered newest first so `recent_payments` makes
/// sense; the totals do not depend on order.
pub fn build_dashboard(
    students: &[Student],
    payments: &[Payment],
    total_exams: usize,
    today: NaiveDate,
) -> DashboardSummary {
    let active_students = students
        .iter()
        .filter(|s| s.status == ActiveStatus::Active)
        .count() as u32;
    let current_month = MonthName::of(today);
    let (current_month_collection, current_month_payment_count) =
        month_collection(payments, current_month, today.year());

    DashboardSummary {
        total_students: students.len() as u32,
        active_students,
        inactive_students: students.len() as u32 - active_students,
        total_exams: total_exams as u32,
        payment_count: payments.len() as u32,
        total_collected: payments.iter().map(|p| p.amount).sum(),
        current_month,
        current_year: today.year(),
        current_month_collection,
        current_month_payment_count,
        fees_by_month: fees_by_month(payments),
        students_by_grade: students_by_grade(students),
        recent_payments: payments.iter().take(RECENT_PAYMENT_LIMIT).cloned().collect(),
    }
}
