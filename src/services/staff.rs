//! Staff records.

use serde_json::Value;
use tracing::info;

use super::{from_record, from_records, issue_code, require, to_document};
use crate::config::OfficeConfig;
use crate::error::EngineResult;
use crate::models::{NewStaff, Staff};
use crate::store::{Collection, Order, RecordStore};

/// Reads and writes the `staff` collection.
pub struct StaffService<'a> {
    store: &'a dyn RecordStore,
    config: &'a OfficeConfig,
}

impl<'a> StaffService<'a> {
    pub fn new(store: &'a dyn RecordStore, config: &'a OfficeConfig) -> Self {
        Self { store, config }
    }

    /// Adds a staff member under a fresh `DT-S-` code.
    pub fn add(&self, form: NewStaff) -> EngineResult<Staff> {
        form.validate()?;
        let payroll = self.config.payroll();
        let code = issue_code(
            self.store,
            Collection::Staff,
            "staffCode",
            &payroll.staff_code_prefix,
            payroll.code_attempts,
        )?;
        let staff = form.into_staff(code);
        let id = self.store.insert(Collection::Staff, to_document(&staff)?)?;
        info!(
            staff_id = %id,
            staff_code = %staff.staff_code,
            salary_type = ?staff.salary_type,
            "Staff member added"
        );
        require(self.store, Collection::Staff, &id)
    }

    /// All staff, newest first.
    pub fn list(&self) -> EngineResult<Vec<Staff>> {
        from_records(self.store.list(Collection::Staff, Some(Order::CreatedAtDesc))?)
    }

    /// Staff with `Active` status, newest first.
    pub fn active(&self) -> EngineResult<Vec<Staff>> {
        Ok(self.list()?.into_iter().filter(Staff::is_active).collect())
    }

    pub fn get(&self, id: &str) -> EngineResult<Option<Staff>> {
        self.store
            .get_by_id(Collection::Staff, id)?
            .map(from_record)
            .transpose()
    }

    /// Replaces the editable fields of a staff member. The staff code is kept.
    pub fn update(&self, id: &str, form: NewStaff) -> EngineResult<Staff> {
        form.validate()?;
        let current: Staff = require(self.store, Collection::Staff, id)?;
        let mut patch = to_document(&form.into_staff(current.staff_code))?;
        for field in ["email", "qualification"] {
            patch.entry(field).or_insert(Value::Null);
        }
        self.store.update(Collection::Staff, id, patch)?;
        info!(staff_id = %id, "Staff member updated");
        require(self.store, Collection::Staff, id)
    }

    /// Removes a staff member. Attendance and salary records are kept.
    pub fn delete(&self, id: &str) -> EngineResult<()> {
        self.store.delete(Collection::Staff, id)?;
        info!(staff_id = %id, "Staff member deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PayrollSettings;
    use crate::models::{ActiveStatus, Gender, SalaryType};
    use crate::store::MemoryStore;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn form(name: &str) -> NewStaff {
        NewStaff {
            full_name: name.to_string(),
            gender: Gender::Female,
            phone: "9000000001".to_string(),
            email: None,
            address: "12 Lake Road".to_string(),
            role: "Teacher".to_string(),
            qualification: Some("M.Sc".to_string()),
            joining_date: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
            salary_type: SalaryType::Monthly,
            basic_salary: Decimal::new(26000, 0),
            status: ActiveStatus::Active,
        }
    }

    #[test]
    fn test_add_issues_staff_code() {
        let store = MemoryStore::new();
        let config = OfficeConfig::default();
        let service = StaffService::new(&store, &config);

        let staff = service.add(form("Meena")).unwrap();

        assert!(staff.staff_code.starts_with("DT-S-"));
        let digits: u32 = staff.staff_code["DT-S-".len()..].parse().unwrap();
        assert!((1000..=9999).contains(&digits));
        assert_eq!(staff.basic_salary, Decimal::new(26000, 0));
    }

    #[test]
    fn test_codes_are_unique() {
        let store = MemoryStore::new();
        let config = OfficeConfig::default();
        let service = StaffService::new(&store, &config);

        let mut codes: Vec<String> = (0..50)
            .map(|i| service.add(form(&format!("Staff {}", i))).unwrap().staff_code)
            .collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), 50);
    }

    #[test]
    fn test_custom_prefix_from_config() {
        let store = MemoryStore::new();
        let payroll = PayrollSettings {
            staff_code_prefix: "XY-".to_string(),
            ..PayrollSettings::default()
        };
        let config = OfficeConfig::new(Default::default(), Default::default(), payroll);
        let staff = StaffService::new(&store, &config).add(form("Ravi")).unwrap();
        assert!(staff.staff_code.starts_with("XY-"));
    }

    #[test]
    fn test_update_clears_optional_fields() {
        let store = MemoryStore::new();
        let config = OfficeConfig::default();
        let service = StaffService::new(&store, &config);
        let staff = service.add(form("Meena")).unwrap();

        let mut edit = form("Meena K");
        edit.qualification = None;
        edit.basic_salary = Decimal::new(28000, 0);
        let updated = service.update(&staff.id, edit).unwrap();

        assert_eq!(updated.full_name, "Meena K");
        assert_eq!(updated.qualification, None);
        assert_eq!(updated.basic_salary, Decimal::new(28000, 0));
        assert_eq!(updated.staff_code, staff.staff_code);
    }

    #[test]
    fn test_active_filters_inactive() {
        let store = MemoryStore::new();
        let config = OfficeConfig::default();
        let service = StaffService::new(&store, &config);
        service.add(form("Meena")).unwrap();
        let mut gone = form("Ravi");
        gone.status = ActiveStatus::Inactive;
        service.add(gone).unwrap();

        assert_eq!(service.list().unwrap().len(), 2);
        assert_eq!(service.active().unwrap().len(), 1);
    }
}
