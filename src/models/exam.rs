//! Exam and marks entry models.
//!
//! An [`Exam`] is one sitting of an assessment for a class. Exams sharing a
//! `name` form an exam series (e.g. every "Unit Test 1" across terms). Each
//! [`MarksEntry`] records one student's marks in one subject of one exam.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::student::require_text;
use crate::error::{EngineError, EngineResult};

/// Highest per-subject ceiling an exam may set.
pub const MAX_MARKS_LIMIT: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);

/// An exam as stored in the `exams` collection.
///
/// # Example
///
/// ```
/// use tuition_engine::models::Exam;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let exam = Exam {
///     id: "exam_1".to_string(),
///     name: "Unit Test 1".to_string(),
///     grade: "10".to_string(),
///     date: NaiveDate::from_ymd_opt(2026, 7, 10).unwrap(),
///     subjects: vec!["Mathematics".to_string(), "Science".to_string()],
///     max_marks: Decimal::new(100, 0),
///     created_at: None,
/// };
/// assert_eq!(exam.max_total(), Decimal::new(200, 0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exam {
    /// Store-assigned identifier.
    #[serde(default)]
    pub id: String,
    /// Series name, e.g. "Unit Test 1", "Quarterly".
    pub name: String,
    /// Class the exam is conducted for.
    pub grade: String,
    /// Conduct date.
    pub date: NaiveDate,
    /// Ordered, distinct subject names.
    pub subjects: Vec<String>,
    /// Per-subject ceiling.
    pub max_marks: Decimal,
    /// When the record was created in the store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Exam {
    /// The highest total a student can score: `max_marks * subjects.len()`.
    ///
    /// Saturates at `Decimal::MAX` for exams that have not been validated.
    pub fn max_total(&self) -> Decimal {
        self.max_marks.saturating_mul(Decimal::from(self.subjects.len()))
    }

    /// Returns true if `subject` is one of this exam's subjects.
    pub fn has_subject(&self, subject: &str) -> bool {
        self.subjects.iter().any(|s| s == subject)
    }

    /// Checks the name, grade, subject list and ceiling.
    pub fn validate(&self) -> EngineResult<()> {
        require_text("name", &self.name)?;
        require_text("grade", &self.grade)?;
        if self.subjects.is_empty() {
            return Err(EngineError::validation("subjects", "at least one subject is required"));
        }
        let mut seen = HashSet::new();
        for subject in &self.subjects {
            require_text("subjects", subject)?;
            if !seen.insert(subject.trim()) {
                return Err(EngineError::validation(
                    "subjects",
                    format!("duplicate subject '{}'", subject.trim()),
                ));
            }
        }
        if self.max_marks <= Decimal::ZERO {
            return Err(EngineError::validation("maxMarks", "must be greater than zero"));
        }
        if self.max_marks > MAX_MARKS_LIMIT {
            return Err(EngineError::validation(
                "maxMarks",
                format!("must not exceed {}", MAX_MARKS_LIMIT),
            ));
        }
        Ok(())
    }
}

/// One (exam, student, subject) mark as stored in the `marks` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarksEntry {
    /// Store key; equal to [`MarksEntry::idempotency_key`] once saved.
    #[serde(default)]
    pub id: String,
    /// The exam this mark belongs to.
    pub exam_id: String,
    /// The student who sat the paper.
    pub student_id: String,
    /// Student name snapshot.
    pub student_name: String,
    /// Subject name.
    pub subject: String,
    /// Marks obtained, `0 <= marks_obtained <= max_marks`.
    pub marks_obtained: Decimal,
    /// Copied from the exam for denormalized reads.
    pub max_marks: Decimal,
    /// The day the paper was sat.
    pub exam_date: NaiveDate,
    /// When the record was last written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl MarksEntry {
    /// Deterministic key for the (exam, student, subject) triple.
    ///
    /// Saving an entry under this key overwrites any earlier mark for the
    /// same cell of the datasheet.
    ///
    /// ```
    /// # use tuition_engine::models::MarksEntry;
    /// # use chrono::NaiveDate;
    /// # use rust_decimal::Decimal;
    /// let entry = MarksEntry {
    ///     id: String::new(),
    ///     exam_id: "exam_1".to_string(),
    ///     student_id: "stu_9".to_string(),
    ///     student_name: "Arun".to_string(),
    ///     subject: "Science".to_string(),
    ///     marks_obtained: Decimal::new(72, 0),
    ///     max_marks: Decimal::new(100, 0),
    ///     exam_date: NaiveDate::from_ymd_opt(2026, 7, 10).unwrap(),
    ///     created_at: None,
    /// };
    /// assert_eq!(entry.idempotency_key(), "exam_1_stu_9_Science");
    /// ```
    pub fn idempotency_key(&self) -> String {
        format!("{}_{}_{}", self.exam_id, self.student_id, self.subject)
    }

    /// Checks the entry against the exam it is being saved for.
    pub fn validate_for(&self, exam: &Exam) -> EngineResult<()> {
        require_text("studentId", &self.student_id)?;
        if !exam.has_subject(&self.subject) {
            return Err(EngineError::validation(
                "subject",
                format!("'{}' is not a subject of exam '{}'", self.subject, exam.name),
            ));
        }
        if self.marks_obtained < Decimal::ZERO {
            return Err(EngineError::validation("marksObtained", "cannot be negative"));
        }
        if self.marks_obtained > exam.max_marks {
            return Err(EngineError::validation(
                "marksObtained",
                format!("exceeds maximum of {}", exam.max_marks),
            ));
        }
        Ok(())
    }
}
