//! Student progression across an exam series.
//!
//! A series is every exam sharing a name. For one student, each sitting of
//! the series collapses to a single percentage so the trend can be charted,
//! and any one sitting can be broken down subject by subject.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Exam, MarksEntry};

use super::grading::percentage;

/// One point on a student's progression chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressionPoint {
    /// The day the papers were sat.
    pub exam_date: NaiveDate,
    /// Marks obtained across the sitting.
    pub total_obtained: Decimal,
    /// Maximum marks across the sitting.
    pub total_max: Decimal,
    /// `round(total_obtained / total_max * 100)`.
    pub percentage: Decimal,
}

/// One subject's score in a single sitting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectScore {
    /// Subject name.
    pub subject: String,
    /// Marks obtained.
    pub score: Decimal,
    /// Maximum marks.
    pub max: Decimal,
    /// Whole percentage.
    pub percentage: Decimal,
}

/// Distinct series names in the order they first appear.
pub fn exam_series_names(exams: &[Exam]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for exam in exams {
        if !names.contains(&exam.name) {
            names.push(exam.name.clone());
        }
    }
    names
}

/// The sittings of a series, oldest first.
pub fn series_sittings<'a>(exams: &'a [Exam], series_name: &str) -> Vec<&'a Exam> {
    let mut sittings: Vec<&Exam> = exams.iter().filter(|e| e.name == series_name).collect();
    sittings.sort_by_key(|e| e.date);
    sittings
}

/// A student's percentage at every sitting of `series_name`, oldest first.
///
/// Entries are matched to the series through their exam id. Entries whose
/// exam is unknown are skipped.
pub fn series_progression(
    student_entries: &[MarksEntry],
    exams: &[Exam],
    series_name: &str,
) -> Vec<ProgressionPoint> {
    let names: HashMap<&str, &str> = exams
        .iter()
        .map(|e| (e.id.as_str(), e.name.as_str()))
        .collect();

    let mut by_date: BTreeMap<NaiveDate, (Decimal, Decimal)> = BTreeMap::new();
    for entry in student_entries {
        if names.get(entry.exam_id.as_str()) != Some(&series_name) {
            continue;
        }
        let slot = by_date
            .entry(entry.exam_date)
            .or_insert((Decimal::ZERO, Decimal::ZERO));
        slot.0 += entry.marks_obtained;
        slot.1 += entry.max_marks;
    }

    by_date
        .into_iter()
        .map(|(exam_date, (total_obtained, total_max))| ProgressionPoint {
            exam_date,
            total_obtained,
            total_max,
            percentage: percentage(total_obtained, total_max),
        })
        .collect()
}

/// Distinct sitting dates in a student's entries, newest first.
pub fn sitting_dates(student_entries: &[MarksEntry]) -> Vec<NaiveDate> {
    let mut dates: Vec<NaiveDate> = student_entries.iter().map(|e| e.exam_date).collect();
    dates.sort_unstable_by(|a, b| b.cmp(a));
    dates.dedup();
    dates
}

/// Per-subject scores for the sitting on `exam_date`, in entry order.
pub fn subject_breakdown(student_entries: &[MarksEntry], exam_date: NaiveDate) -> Vec<SubjectScore> {
    student_entries
        .iter()
        .filter(|e| e.exam_date == exam_date)
        .map(|e| SubjectScore {
            subject: e.subject.clone(),
            score: e.marks_obtained,
            max: e.max_marks,
            percentage: percentage(e.marks_obtained, e.max_marks),
        })
        .collect()
}
