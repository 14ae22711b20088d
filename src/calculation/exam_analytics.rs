//! Exam datasheet analytics.
//!
//! This module turns the mark entries of one exam into per-student totals,
//! percentages, grades, pass/fail and rank, plus class-level figures: class
//! average, pass rate, highest/lowest totals and per-subject averages.
//!
//! Everything here is recomputed from the entries on every call.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Exam, MarksEntry};

use super::grading::{LetterGrade, PassStatus, grade, pass_status_with, percentage};
use super::rounding::{ratio_or_zero, round_whole};

/// One student's summed marks for an exam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentTotal {
    /// The student.
    pub student_id: String,
    /// Name snapshot from the first entry seen.
    pub student_name: String,
    /// Sum of marks over the subjects present.
    pub total: Decimal,
    /// Subjects the student has an entry for, in entry order.
    pub subjects: Vec<String>,
}

/// A student's row in the exam result sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentResult {
    /// 1-based rank by total, ties in entry order.
    pub rank: usize,
    /// The student.
    pub student_id: String,
    /// Student name.
    pub student_name: String,
    /// Sum of marks obtained.
    pub total: Decimal,
    /// `round(total / (max_marks * subject_count) * 100)`.
    pub percentage: Decimal,
    /// Letter grade for the percentage.
    pub grade: LetterGrade,
    /// Pass/fail against the pass mark.
    pub pass_status: PassStatus,
    /// Exam subjects with no entry for this student. Each counts as zero.
    pub missing_subjects: Vec<String>,
}

/// Average marks for one subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectAverage {
    /// Subject name.
    pub subject: String,
    /// Rounded mean of marks obtained, 0 when nobody has an entry.
    pub average: Decimal,
    /// Number of entries averaged.
    pub entries: usize,
}

/// Class-level analytics for one exam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamAnalytics {
    /// The exam analysed (empty when rendering an absent exam).
    pub exam_id: String,
    /// The exam's series name.
    pub exam_name: String,
    /// Highest possible total per student.
    pub max_total: Decimal,
    /// Students with at least one entry.
    pub student_count: usize,
    /// Class average as a whole percentage.
    pub class_average: Decimal,
    /// Percentage of students passing, rounded.
    pub pass_rate: Decimal,
    /// Highest student total.
    pub highest: Option<Decimal>,
    /// Lowest student total.
    pub lowest: Option<Decimal>,
    /// Averages for each exam subject, in exam order.
    pub subject_averages: Vec<SubjectAverage>,
    /// Result rows ordered by rank.
    pub results: Vec<StudentResult>,
}

impl ExamAnalytics {
    /// The empty view rendered when an exam or its entries are absent.
    pub fn empty() -> Self {
        Self {
            exam_id: String::new(),
            exam_name: String::new(),
            max_total: Decimal::ZERO,
            student_count: 0,
            class_average: Decimal::ZERO,
            pass_rate: Decimal::ZERO,
            highest: None,
            lowest: None,
            subject_averages: Vec::new(),
            results: Vec::new(),
        }
    }
}

/// Sums marks obtained over the entries given. Absent subjects add nothing.
pub fn student_total<'a>(entries: impl IntoIterator<Item = &'a MarksEntry>) -> Decimal {
    entries.into_iter().map(|e| e.marks_obtained).sum()
}

/// Groups entries by student, keeping the order in which students first appear.
pub fn student_totals(entries: &[MarksEntry]) -> Vec<StudentTotal> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<StudentTotal> = Vec::new();

    for entry in entries {
        let slot = *index.entry(entry.student_id.as_str()).or_insert_with(|| {
            totals.push(StudentTotal {
                student_id: entry.student_id.clone(),
                student_name: entry.student_name.clone(),
                total: Decimal::ZERO,
                subjects: Vec::new(),
            });
            totals.len() - 1
        });
        let student = &mut totals[slot];
        student.total += entry.marks_obtained;
        student.subjects.push(entry.subject.clone());
    }

    totals
}

/// `round(mean(totals) / max_total * 100)`; 0 for no students or a zero denominator.
pub fn class_average(totals: &[Decimal], max_total: Decimal) -> Decimal {
    if totals.is_empty() {
        return Decimal::ZERO;
    }
    let mean = totals.iter().copied().sum::<Decimal>() / Decimal::from(totals.len());
    percentage(mean, max_total)
}

/// Rounded mean of marks for `subject` across the entries that have it.
pub fn subject_average(entries: &[MarksEntry], subject: &str) -> SubjectAverage {
    let marks: Vec<Decimal> = entries
        .iter()
        .filter(|e| e.subject == subject)
        .map(|e| e.marks_obtained)
        .collect();
    let sum: Decimal = marks.iter().copied().sum();

    SubjectAverage {
        subject: subject.to_string(),
        average: round_whole(ratio_or_zero(sum, Decimal::from(marks.len()))),
        entries: marks.len(),
    }
}

/// Orders students by total, highest first, and numbers them from 1.
///
/// The sort is stable: students with equal totals keep their input order,
/// so the one listed first gets the better rank.
pub fn rank(mut students: Vec<StudentTotal>) -> Vec<(usize, StudentTotal)> {
    students.sort_by(|a, b| b.total.cmp(&a.total));
    students
        .into_iter()
        .enumerate()
        .map(|(i, s)| (i + 1, s))
        .collect()
}

/// `round(passes / students * 100)`; 0 when there are no students.
///
/// A pass is the status each result row shows, which compares the rounded
/// percentage against the pass mark. 69 of 200 (34.5%) rounds to 35 and
/// counts as a pass at the default mark.
pub fn pass_rate(statuses: &[PassStatus]) -> Decimal {
    let passes = statuses.iter().filter(|s| **s == PassStatus::Pass).count();
    percentage(Decimal::from(passes), Decimal::from(statuses.len()))
}

/// Computes the full analytics for an exam and its (possibly partial) entries.
///
/// # Example
///
/// ```
/// use tuition_engine::calculation::{analyze_exam, LetterGrade, PassStatus, DEFAULT_PASS_PERCENTAGE};
/// use tuition_engine::models::{Exam, MarksEntry};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let date = NaiveDate::from_ymd_opt(2026, 7, 10).unwrap();
/// let exam = Exam {
///     id: "exam_1".to_string(),
///     name: "Unit Test 1".to_string(),
///     grade: "10".to_string(),
///     date,
///     subjects: vec!["Math".to_string(), "Science".to_string()],
///     max_marks: Decimal::new(100, 0),
///     created_at: None,
/// };
/// let entry = |subject: &str, marks: i64| MarksEntry {
///     id: String::new(),
///     exam_id: "exam_1".to_string(),
///     student_id: "stu_a".to_string(),
///     student_name: "A".to_string(),
///     subject: subject.to_string(),
///     marks_obtained: Decimal::new(marks, 0),
///     max_marks: Decimal::new(100, 0),
///     exam_date: date,
///     created_at: None,
/// };
///
/// let analytics = analyze_exam(&exam, &[entry("Math", 80), entry("Science", 90)], DEFAULT_PASS_PERCENTAGE);
/// let a = &analytics.results[0];
/// assert_eq!(a.total, Decimal::new(170, 0));
/// assert_eq!(a.percentage, Decimal::new(85, 0));
/// assert_eq!(a.grade, LetterGrade::A);
/// assert_eq!(a.pass_status, PassStatus::Pass);
/// ```
pub fn analyze_exam(
    exam: &Exam,
    entries: &[MarksEntry],
    pass_percentage: Decimal,
) -> ExamAnalytics {
    let max_total = exam.max_total();
    let totals = student_totals(entries);

    let total_values: Vec<Decimal> = totals.iter().map(|t| t.total).collect();
    let highest = total_values.iter().copied().max();
    let lowest = total_values.iter().copied().min();
    let average = class_average(&total_values, max_total);

    let results: Vec<StudentResult> = rank(totals)
        .into_iter()
        .map(|(rank, student)| {
            let pct = percentage(student.total, max_total);
            let missing_subjects = exam
                .subjects
                .iter()
                .filter(|s| !student.subjects.contains(s))
                .cloned()
                .collect();
            StudentResult {
                rank,
                student_id: student.student_id,
                student_name: student.student_name,
                total: student.total,
                percentage: pct,
                grade: grade(pct),
                pass_status: pass_status_with(pct, pass_percentage),
                missing_subjects,
            }
        })
        .collect();

    let statuses: Vec<PassStatus> = results.iter().map(|r| r.pass_status).collect();

    let subject_averages = exam
        .subjects
        .iter()
        .map(|s| subject_average(entries, s))
        .collect();

    ExamAnalytics {
        exam_id: exam.id.clone(),
        exam_name: exam.name.clone(),
        max_total,
        student_count: results.len(),
        class_average: average,
        pass_rate: pass_rate(&statuses),
        highest,
        lowest,
        subject_averages,
        results,
    }
}
