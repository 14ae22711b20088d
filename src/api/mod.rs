//! HTTP API for the tuition office.
//!
//! Exposes the record services and the pure calculations as JSON endpoints.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::{RECENT_ATTENDANCE_MONTHS, create_router};
pub use request::{
    ActiveQuery, AttendanceSummaryRequest, ExamAnalyticsRequest, GenerateSalaryRequest,
    GradeQuery, MarkAttendanceRequest, MonthQuery, PayrollRequest, PeriodQuery,
    SaveMarksRequest, SeriesQuery,
};
pub use response::{ApiError, AttendanceDay, HealthResponse, StaffAttendanceSummary};
pub use state::AppState;
