//! Core data models for the tuition office engine.
//!
//! This module contains the record shapes stored in each collection and the
//! audit types attached to derived figures.

mod attendance;
mod audit;
mod exam;
mod payment;
mod period;
mod salary;
mod staff;
mod student;

pub use attendance::{AttendanceStatus, StaffAttendance};
pub use audit::{AuditStep, AuditWarning};
pub use exam::{Exam, MAX_MARKS_LIMIT, MarksEntry};
pub use payment::Payment;
pub use period::{FeeMonth, MonthName};
pub use salary::{PaymentStatus, StaffSalary};
pub use staff::{Gender, NewStaff, SalaryType, Staff};
pub use student::{ActiveStatus, Student, StudentAdmission};
