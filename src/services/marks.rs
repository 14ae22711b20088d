//! Exams, mark entry and exam reports.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use super::{from_record, from_records, require, to_document};
use crate::calculation::{
    ExamAnalytics, ProgressionPoint, SubjectScore, analyze_exam, exam_series_names,
    series_progression, sitting_dates, subject_breakdown,
};
use crate::config::OfficeConfig;
use crate::error::EngineResult;
use crate::models::{Exam, MarksEntry};
use crate::store::{BatchOp, Collection, Order, RecordStore};

/// One cell of the marks datasheet as entered by the operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMark {
    pub student_id: String,
    pub student_name: String,
    pub subject: String,
    pub marks_obtained: Decimal,
}

/// A student's progression view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProgression {
    pub student_id: String,
    /// Every series the student could be charted on.
    pub series_names: Vec<String>,
    /// The series charted, if any.
    pub series: Option<String>,
    /// Percentage per sitting, oldest first.
    pub points: Vec<ProgressionPoint>,
    /// Dates the student sat papers, newest first.
    pub sitting_dates: Vec<chrono::NaiveDate>,
    /// Subject scores for the most recent sitting.
    pub latest_breakdown: Vec<SubjectScore>,
}

/// Reads and writes the `exams` and `marks` collections.
pub struct MarksService<'a> {
    store: &'a dyn RecordStore,
    config: &'a OfficeConfig,
}

impl<'a> MarksService<'a> {
    pub fn new(store: &'a dyn RecordStore, config: &'a OfficeConfig) -> Self {
        Self { store, config }
    }

    pub fn create_exam(&self, exam: Exam) -> EngineResult<Exam> {
        exam.validate()?;
        let id = self.store.insert(Collection::Exams, to_document(&exam)?)?;
        info!(exam_id = %id, name = %exam.name, grade = %exam.grade, subjects = exam.subjects.len(), "Exam created");
        require(self.store, Collection::Exams, &id)
    }

    pub fn get_exam(&self, id: &str) -> EngineResult<Option<Exam>> {
        self.store
            .get_by_id(Collection::Exams, id)?
            .map(from_record)
            .transpose()
    }

    /// All exams, newest first.
    pub fn list_exams(&self) -> EngineResult<Vec<Exam>> {
        from_records(self.store.list(Collection::Exams, Some(Order::CreatedAtDesc))?)
    }

    /// Exams for one grade, latest exam date first.
    pub fn exams_for_grade(&self, grade: &str) -> EngineResult<Vec<Exam>> {
        let mut exams: Vec<Exam> = from_records(self.store.query_equal(
            Collection::Exams,
            "grade",
            &Value::String(grade.to_string()),
            None,
        )?)?;
        exams.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(exams)
    }

    /// Saves a batch of marks for an exam in one atomic write.
    ///
    /// Each entry is stored under `{examId}_{studentId}_{subject}`, so saving
    /// the same cell again overwrites the earlier value. The exam's ceiling
    /// and date are copied onto every entry.
    pub fn save_marks(&self, exam_id: &str, marks: Vec<NewMark>) -> EngineResult<Vec<MarksEntry>> {
        let exam: Exam = require(self.store, Collection::Exams, exam_id)?;

        let mut entries = Vec::with_capacity(marks.len());
        let mut ops = Vec::with_capacity(marks.len());
        for mark in marks {
            let mut entry = MarksEntry {
                id: String::new(),
                exam_id: exam.id.clone(),
                student_id: mark.student_id,
                student_name: mark.student_name,
                subject: mark.subject,
                marks_obtained: mark.marks_obtained,
                max_marks: exam.max_marks,
                exam_date: exam.date,
                created_at: None,
            };
            entry.validate_for(&exam)?;
            entry.id = entry.idempotency_key();
            ops.push(BatchOp::Upsert {
                collection: Collection::Marks,
                key: entry.id.clone(),
                record: to_document(&entry)?,
            });
            entries.push(entry);
        }

        self.store.batch_write(ops)?;
        info!(exam_id = %exam.id, entries = entries.len(), "Marks saved");
        Ok(entries)
    }

    pub fn marks_for_exam(&self, exam_id: &str) -> EngineResult<Vec<MarksEntry>> {
        from_records(self.store.query_equal(
            Collection::Marks,
            "examId",
            &Value::String(exam_id.to_string()),
            Some(Order::CreatedAtAsc),
        )?)
    }

    pub fn marks_for_student(&self, student_id: &str) -> EngineResult<Vec<MarksEntry>> {
        from_records(self.store.query_equal(
            Collection::Marks,
            "studentId",
            &Value::String(student_id.to_string()),
            Some(Order::CreatedAtAsc),
        )?)
    }

    /// Analytics for a stored exam. A missing exam gives the empty view.
    pub fn exam_analytics(&self, exam_id: &str) -> EngineResult<ExamAnalytics> {
        let Some(exam) = self.get_exam(exam_id)? else {
            return Ok(ExamAnalytics::empty());
        };
        let entries = self.marks_for_exam(exam_id)?;
        Ok(analyze_exam(
            &exam,
            &entries,
            self.config.academic().pass_percentage,
        ))
    }

    /// Progression of one student across a series. With no series named,
    /// the first series the student appears in is charted.
    pub fn progression(&self, student_id: &str, series: Option<&str>) -> EngineResult<StudentProgression> {
        let entries = self.marks_for_student(student_id)?;
        let exams = self.list_exams()?;

        let taken: Vec<Exam> = exams
            .into_iter()
            .filter(|e| entries.iter().any(|m| m.exam_id == e.id))
            .collect();
        let series_names = exam_series_names(&taken);
        let series = series
            .map(str::to_string)
            .or_else(|| series_names.first().cloned());

        let points = match &series {
            Some(name) => series_progression(&entries, &taken, name),
            None => Vec::new(),
        };
        let dates = sitting_dates(&entries);
        let latest_breakdown = dates
            .first()
            .map(|d| subject_breakdown(&entries, *d))
            .unwrap_or_default();

        Ok(StudentProgression {
            student_id: student_id.to_string(),
            series_names,
            series,
            points,
            sitting_dates: dates,
            latest_breakdown,
        })
    }
}
