//! Student admissions and records.

use serde_json::{Value, json};
use tracing::info;

use super::{from_record, from_records, issue_code, require, to_document};
use crate::config::OfficeConfig;
use crate::error::EngineResult;
use crate::models::{Student, StudentAdmission};
use crate::store::{Collection, Document, Order, RecordStore};

/// Reads and writes the `students` collection.
pub struct StudentService<'a> {
    store: &'a dyn RecordStore,
    config: &'a OfficeConfig,
}

impl<'a> StudentService<'a> {
    pub fn new(store: &'a dyn RecordStore, config: &'a OfficeConfig) -> Self {
        Self { store, config }
    }

    /// Admits a student, issuing a fresh student code.
    pub fn admit(&self, form: StudentAdmission) -> EngineResult<Student> {
        form.validate()?;
        let code = issue_code(
            self.store,
            Collection::Students,
            "studentCode",
            &self.config.academic().student_code_prefix,
            self.config.payroll().code_attempts,
        )?;
        let student = form.into_student(code);
        let id = self.store.insert(Collection::Students, to_document(&student)?)?;
        info!(student_id = %id, student_code = %student.student_code, grade = %student.grade, "Student admitted");
        require(self.store, Collection::Students, &id)
    }

    /// All students, newest admission record first.
    pub fn list(&self) -> EngineResult<Vec<Student>> {
        from_records(self.store.list(Collection::Students, Some(Order::CreatedAtDesc))?)
    }

    pub fn get(&self, id: &str) -> EngineResult<Option<Student>> {
        self.store
            .get_by_id(Collection::Students, id)?
            .map(from_record)
            .transpose()
    }

    /// Replaces the editable fields of a student. The student code is kept.
    pub fn update(&self, id: &str, form: StudentAdmission) -> EngineResult<Student> {
        form.validate()?;
        let current: Student = require(self.store, Collection::Students, id)?;
        let edited = Student {
            id: current.id,
            student_code: current.student_code,
            created_at: current.created_at,
            ..form.into_student(String::new())
        };
        let mut patch = to_document(&edited)?;
        patch.remove("studentCode");
        // Cleared optional fields must overwrite the stored values.
        for field in ["email", "address", "parentName"] {
            patch.entry(field).or_insert(Value::Null);
        }
        self.store.update(Collection::Students, id, patch)?;
        info!(student_id = %id, "Student updated");
        require(self.store, Collection::Students, id)
    }

    /// Flips a student between `Active` and `Inactive`.
    pub fn toggle_status(&self, id: &str) -> EngineResult<Student> {
        let current: Student = require(self.store, Collection::Students, id)?;
        let status = current.status.toggled();
        let mut patch = Document::new();
        patch.insert("status".to_string(), json!(status));
        self.store.update(Collection::Students, id, patch)?;
        info!(student_id = %id, status = ?status, "Student status changed");
        Ok(Student { status, ..current })
    }

    /// Removes a student. Payments and marks stay, keyed by the old id.
    pub fn delete(&self, id: &str) -> EngineResult<()> {
        self.store.delete(Collection::Students, id)?;
        info!(student_id = %id, "Student deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::models::ActiveStatus;
    use crate::store::MemoryStore;
    use chrono::NaiveDate;

    fn form(name: &str) -> StudentAdmission {
        StudentAdmission {
            full_name: name.to_string(),
            phone: "9876543210".to_string(),
            email: None,
            address: None,
            parent_name: None,
            grade: "10".to_string(),
            status: ActiveStatus::Active,
            admission_date: NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
        }
    }

    #[test]
    fn test_admit_issues_prefixed_code() {
        let store = MemoryStore::new();
        let config = OfficeConfig::default();
        let service = StudentService::new(&store, &config);

        let student = service.admit(form("Priya")).unwrap();

        assert!(student.student_code.starts_with("DT-"));
        assert!(!student.id.is_empty());
        assert!(student.created_at.is_some());
        assert_eq!(service.list().unwrap().len(), 1);
    }

    #[test]
    fn test_admit_rejects_blank_name() {
        let store = MemoryStore::new();
        let config = OfficeConfig::default();
        let service = StudentService::new(&store, &config);

        let err = service.admit(form("  ")).unwrap_err();
        assert!(matches!(err, EngineError::Validation { .. }));
        assert!(service.list().unwrap().is_empty());
    }

    #[test]
    fn test_toggle_status_round_trips() {
        let store = MemoryStore::new();
        let config = OfficeConfig::default();
        let service = StudentService::new(&store, &config);
        let student = service.admit(form("Priya")).unwrap();

        let toggled = service.toggle_status(&student.id).unwrap();
        assert_eq!(toggled.status, ActiveStatus::Inactive);
        let stored = service.get(&student.id).unwrap().unwrap();
        assert_eq!(stored.status, ActiveStatus::Inactive);

        let back = service.toggle_status(&student.id).unwrap();
        assert_eq!(back.status, ActiveStatus::Active);
    }

    #[test]
    fn test_toggle_missing_student() {
        let store = MemoryStore::new();
        let config = OfficeConfig::default();
        let service = StudentService::new(&store, &config);
        assert!(matches!(
            service.toggle_status("ghost"),
            Err(EngineError::RecordNotFound { .. })
        ));
    }

    #[test]
    fn test_update_keeps_code() {
        let store = MemoryStore::new();
        let config = OfficeConfig::default();
        let service = StudentService::new(&store, &config);
        let student = service.admit(form("Priya")).unwrap();

        let mut edit = form("Priya Raman");
        edit.grade = "11".to_string();
        let updated = service.update(&student.id, edit).unwrap();

        assert_eq!(updated.full_name, "Priya Raman");
        assert_eq!(updated.grade, "11");
        assert_eq!(updated.student_code, student.student_code);
    }

    #[test]
    fn test_delete_then_get_is_none() {
        let store = MemoryStore::new();
        let config = OfficeConfig::default();
        let service = StudentService::new(&store, &config);
        let student = service.admit(form("Priya")).unwrap();

        service.delete(&student.id).unwrap();
        assert!(service.get(&student.id).unwrap().is_none());
    }
}
