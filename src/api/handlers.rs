//! HTTP request handlers for the tuition office API.
//!
//! Every handler tags its work with a correlation id, runs one service call
//! against the shared store and renders either the JSON result or an
//! [`ApiError`](super::response::ApiError) body.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{analyze_exam, calculate_salary_with, tally};
use crate::error::EngineError;
use crate::models::{Exam, NewStaff, Payment, StudentAdmission};
use crate::services::{
    AttendanceService, DashboardService, FeeService, MarksService, SalaryService, StaffService,
    StudentService,
};

use super::request::{
    ActiveQuery, AttendanceSummaryRequest, ExamAnalyticsRequest, GenerateSalaryRequest,
    GradeQuery, MarkAttendanceRequest, MonthQuery, PayrollRequest, PeriodQuery,
    SaveMarksRequest, SeriesQuery,
};
use super::response::{
    ApiError, ApiErrorResponse, AttendanceDay, HealthResponse, StaffAttendanceSummary,
};
use super::state::AppState;

/// Months covered by a staff member's attendance summary when no month is given.
pub const RECENT_ATTENDANCE_MONTHS: u32 = 12;

type HandlerResult = Result<Response, ApiErrorResponse>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/payroll/calculate", post(calculate_payroll_handler))
        .route("/exams/analytics", post(exam_analytics_handler))
        .route("/attendance/summary", post(attendance_summary_handler))
        .route("/students", post(admit_student).get(list_students))
        .route(
            "/students/:id",
            get(get_student).put(update_student).delete(delete_student),
        )
        .route("/students/:id/status", post(toggle_student_status))
        .route("/students/:id/payments", get(student_payments))
        .route("/students/:id/progression", get(student_progression))
        .route("/staff", post(add_staff).get(list_staff))
        .route(
            "/staff/:id",
            get(get_staff).put(update_staff).delete(delete_staff),
        )
        .route("/staff/:id/attendance/summary", get(staff_attendance_summary))
        .route("/staff/:id/salary", post(generate_salary))
        .route("/staff/:id/salaries", get(salary_history))
        .route("/payments", post(record_payment).get(list_payments))
        .route("/payments/:id/receipt", get(payment_receipt))
        .route("/exams", post(create_exam).get(list_exams))
        .route("/exams/:id", get(get_exam))
        .route("/exams/:id/marks", put(save_marks).get(exam_marks))
        .route("/exams/:id/analytics", get(stored_exam_analytics))
        .route("/attendance", post(mark_attendance))
        .route("/attendance/:date", get(attendance_for_date))
        .route("/salaries", get(monthly_salaries))
        .route("/salaries/:id/pay", post(pay_salary))
        .route("/salaries/:id/slip", get(salary_slip))
        .route("/dashboard", get(dashboard_handler))
        .with_state(state)
}

fn respond<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn start(route: &'static str) -> Uuid {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, route, "Processing request");
    correlation_id
}

fn failed(err: EngineError, correlation_id: Uuid) -> ApiErrorResponse {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        transient = err.is_transient(),
        "Request failed"
    );
    err.into()
}

fn body<T>(payload: Result<Json<T>, JsonRejection>, correlation_id: Uuid) -> Result<T, ApiErrorResponse> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiErrorResponse::from_json_rejection(rejection, correlation_id))
}

fn query<T>(params: Result<Query<T>, QueryRejection>, correlation_id: Uuid) -> Result<T, ApiErrorResponse> {
    params
        .map(|Query(value)| value)
        .map_err(|rejection| ApiErrorResponse::from_query_rejection(rejection, correlation_id))
}

fn found<T: Serialize>(value: Option<T>, collection: &str, id: &str) -> HandlerResult {
    match value {
        Some(value) => Ok(respond(StatusCode::OK, value)),
        None => Err(ApiErrorResponse::not_found(collection, id)),
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Handler for GET /health.
async fn health_handler(State(state): State<AppState>) -> Response {
    respond(
        StatusCode::OK,
        HealthResponse {
            status: "ok".to_string(),
            organization: state.config().organization().name.clone(),
        },
    )
}

/// Handler for POST /payroll/calculate.
///
/// Runs the salary formula over the posted attendance figures without
/// touching the store.
async fn calculate_payroll_handler(
    State(state): State<AppState>,
    payload: Result<Json<PayrollRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = start("POST /payroll/calculate");
    let request = body(payload, correlation_id)?;

    let hours_per_day = request
        .hours_per_day
        .unwrap_or(state.config().payroll().hours_per_day);

    let start_time = Instant::now();
    let result = calculate_salary_with(&request.input, hours_per_day, 1)
        .map_err(|e| failed(e, correlation_id))?;
    info!(
        correlation_id = %correlation_id,
        rule = %result.audit_step.rule_id,
        net_salary = %result.net_salary,
        duration_us = start_time.elapsed().as_micros(),
        "Payroll calculated"
    );
    Ok(respond(StatusCode::OK, result))
}

/// Handler for POST /exams/analytics.
async fn exam_analytics_handler(
    State(state): State<AppState>,
    payload: Result<Json<ExamAnalyticsRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = start("POST /exams/analytics");
    let request = body(payload, correlation_id)?;
    request
        .exam
        .validate()
        .map_err(|e| failed(e, correlation_id))?;
    for entry in &request.entries {
        entry
            .validate_for(&request.exam)
            .map_err(|e| failed(e, correlation_id))?;
    }

    let pass_percentage = request
        .pass_percentage
        .unwrap_or(state.config().academic().pass_percentage);

    let start_time = Instant::now();
    let analytics = analyze_exam(&request.exam, &request.entries, pass_percentage);
    info!(
        correlation_id = %correlation_id,
        students = analytics.student_count,
        pass_rate = %analytics.pass_rate,
        duration_us = start_time.elapsed().as_micros(),
        "Exam analysed"
    );
    Ok(respond(StatusCode::OK, analytics))
}

/// Handler for POST /attendance/summary.
async fn attendance_summary_handler(
    payload: Result<Json<AttendanceSummaryRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = start("POST /attendance/summary");
    let request = body(payload, correlation_id)?;
    Ok(respond(StatusCode::OK, tally(&request.records)))
}

async fn admit_student(
    State(state): State<AppState>,
    payload: Result<Json<StudentAdmission>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = start("POST /students");
    let form = body(payload, correlation_id)?;
    let student = StudentService::new(state.store(), state.config())
        .admit(form)
        .map_err(|e| failed(e, correlation_id))?;
    Ok(respond(StatusCode::CREATED, student))
}

async fn list_students(State(state): State<AppState>) -> HandlerResult {
    let correlation_id = start("GET /students");
    let students = StudentService::new(state.store(), state.config())
        .list()
        .map_err(|e| failed(e, correlation_id))?;
    Ok(respond(StatusCode::OK, students))
}

async fn get_student(State(state): State<AppState>, Path(id): Path<String>) -> HandlerResult {
    let correlation_id = start("GET /students/:id");
    let student = StudentService::new(state.store(), state.config())
        .get(&id)
        .map_err(|e| failed(e, correlation_id))?;
    found(student, "students", &id)
}

async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<StudentAdmission>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = start("PUT /students/:id");
    let form = body(payload, correlation_id)?;
    let student = StudentService::new(state.store(), state.config())
        .update(&id, form)
        .map_err(|e| failed(e, correlation_id))?;
    Ok(respond(StatusCode::OK, student))
}

async fn toggle_student_status(State(state): State<AppState>, Path(id): Path<String>) -> HandlerResult {
    let correlation_id = start("POST /students/:id/status");
    let student = StudentService::new(state.store(), state.config())
        .toggle_status(&id)
        .map_err(|e| failed(e, correlation_id))?;
    Ok(respond(StatusCode::OK, student))
}

async fn delete_student(State(state): State<AppState>, Path(id): Path<String>) -> HandlerResult {
    let correlation_id = start("DELETE /students/:id");
    StudentService::new(state.store(), state.config())
        .delete(&id)
        .map_err(|e| failed(e, correlation_id))?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

async fn student_payments(State(state): State<AppState>, Path(id): Path<String>) -> HandlerResult {
    let correlation_id = start("GET /students/:id/payments");
    let payments = FeeService::new(state.store(), state.config())
        .payments_for_student(&id)
        .map_err(|e| failed(e, correlation_id))?;
    Ok(respond(StatusCode::OK, payments))
}

async fn student_progression(
    State(state): State<AppState>,
    Path(id): Path<String>,
    params: Result<Query<SeriesQuery>, QueryRejection>,
) -> HandlerResult {
    let correlation_id = start("GET /students/:id/progression");
    let params = query(params, correlation_id)?;
    let view = MarksService::new(state.store(), state.config())
        .progression(&id, params.series.as_deref())
        .map_err(|e| failed(e, correlation_id))?;
    Ok(respond(StatusCode::OK, view))
}

async fn add_staff(
    State(state): State<AppState>,
    payload: Result<Json<NewStaff>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = start("POST /staff");
    let form = body(payload, correlation_id)?;
    let staff = StaffService::new(state.store(), state.config())
        .add(form)
        .map_err(|e| failed(e, correlation_id))?;
    Ok(respond(StatusCode::CREATED, staff))
}

async fn list_staff(
    State(state): State<AppState>,
    params: Result<Query<ActiveQuery>, QueryRejection>,
) -> HandlerResult {
    let correlation_id = start("GET /staff");
    let params = query(params, correlation_id)?;
    let service = StaffService::new(state.store(), state.config());
    let staff = if params.active {
        service.active()
    } else {
        service.list()
    }
    .map_err(|e| failed(e, correlation_id))?;
    Ok(respond(StatusCode::OK, staff))
}

async fn get_staff(State(state): State<AppState>, Path(id): Path<String>) -> HandlerResult {
    let correlation_id = start("GET /staff/:id");
    let staff = StaffService::new(state.store(), state.config())
        .get(&id)
        .map_err(|e| failed(e, correlation_id))?;
    found(staff, "staff", &id)
}

async fn update_staff(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<NewStaff>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = start("PUT /staff/:id");
    let form = body(payload, correlation_id)?;
    let staff = StaffService::new(state.store(), state.config())
        .update(&id, form)
        .map_err(|e| failed(e, correlation_id))?;
    Ok(respond(StatusCode::OK, staff))
}

async fn delete_staff(State(state): State<AppState>, Path(id): Path<String>) -> HandlerResult {
    let correlation_id = start("DELETE /staff/:id");
    StaffService::new(state.store(), state.config())
        .delete(&id)
        .map_err(|e| failed(e, correlation_id))?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// Handler for GET /staff/:id/attendance/summary.
///
/// With `month` and `year` the tally covers that month; without either it
/// covers the last twelve months up to today.
async fn staff_attendance_summary(
    State(state): State<AppState>,
    Path(id): Path<String>,
    params: Result<Query<PeriodQuery>, QueryRejection>,
) -> HandlerResult {
    let correlation_id = start("GET /staff/:id/attendance/summary");
    let params = query(params, correlation_id)?;

    let staff = StaffService::new(state.store(), state.config())
        .get(&id)
        .map_err(|e| failed(e, correlation_id))?;
    if staff.is_none() {
        return Err(ApiErrorResponse::not_found("staff", &id));
    }

    let service = AttendanceService::new(state.store());
    let (period, summary) = match (params.month, params.year) {
        (Some(month), Some(year)) => (
            format!("{} {}", month, year),
            service.monthly_summary(&id, month, year),
        ),
        (None, None) => (
            format!("Last {} Months", RECENT_ATTENDANCE_MONTHS),
            service.recent_summary(&id, today(), RECENT_ATTENDANCE_MONTHS),
        ),
        _ => {
            return Err(ApiErrorResponse::bad_request(ApiError::validation_error(
                "month and year must be given together",
            )));
        }
    };
    let summary = summary.map_err(|e| failed(e, correlation_id))?;

    Ok(respond(
        StatusCode::OK,
        StaffAttendanceSummary {
            staff_id: id,
            period,
            summary,
        },
    ))
}

/// Handler for POST /staff/:id/salary.
async fn generate_salary(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<GenerateSalaryRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = start("POST /staff/:id/salary");
    let request = body(payload, correlation_id)?;
    let generated = SalaryService::new(state.store(), state.config())
        .generate(&id, request.month, request.year, request.total_working_days)
        .map_err(|e| failed(e, correlation_id))?;
    info!(
        correlation_id = %correlation_id,
        salary_id = %generated.salary.id,
        net_salary = %generated.salary.net_salary,
        "Salary generated"
    );
    Ok(respond(StatusCode::OK, generated))
}

async fn salary_history(State(state): State<AppState>, Path(id): Path<String>) -> HandlerResult {
    let correlation_id = start("GET /staff/:id/salaries");
    let salaries = SalaryService::new(state.store(), state.config())
        .history(&id)
        .map_err(|e| failed(e, correlation_id))?;
    Ok(respond(StatusCode::OK, salaries))
}

async fn record_payment(
    State(state): State<AppState>,
    payload: Result<Json<Payment>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = start("POST /payments");
    let payment = body(payload, correlation_id)?;
    let payment = FeeService::new(state.store(), state.config())
        .record_payment(payment)
        .map_err(|e| failed(e, correlation_id))?;
    Ok(respond(StatusCode::CREATED, payment))
}

async fn list_payments(State(state): State<AppState>) -> HandlerResult {
    let correlation_id = start("GET /payments");
    let payments = FeeService::new(state.store(), state.config())
        .all_payments()
        .map_err(|e| failed(e, correlation_id))?;
    Ok(respond(StatusCode::OK, payments))
}

async fn payment_receipt(State(state): State<AppState>, Path(id): Path<String>) -> HandlerResult {
    let correlation_id = start("GET /payments/:id/receipt");
    let receipt = FeeService::new(state.store(), state.config())
        .receipt(&id)
        .map_err(|e| failed(e, correlation_id))?;
    found(receipt, "payments", &id)
}

async fn create_exam(
    State(state): State<AppState>,
    payload: Result<Json<Exam>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = start("POST /exams");
    let exam = body(payload, correlation_id)?;
    let exam = MarksService::new(state.store(), state.config())
        .create_exam(exam)
        .map_err(|e| failed(e, correlation_id))?;
    Ok(respond(StatusCode::CREATED, exam))
}

async fn list_exams(
    State(state): State<AppState>,
    params: Result<Query<GradeQuery>, QueryRejection>,
) -> HandlerResult {
    let correlation_id = start("GET /exams");
    let params = query(params, correlation_id)?;
    let service = MarksService::new(state.store(), state.config());
    let exams = match params.grade.as_deref() {
        Some(grade) => service.exams_for_grade(grade),
        None => service.list_exams(),
    }
    .map_err(|e| failed(e, correlation_id))?;
    Ok(respond(StatusCode::OK, exams))
}

async fn get_exam(State(state): State<AppState>, Path(id): Path<String>) -> HandlerResult {
    let correlation_id = start("GET /exams/:id");
    let exam = MarksService::new(state.store(), state.config())
        .get_exam(&id)
        .map_err(|e| failed(e, correlation_id))?;
    found(exam, "exams", &id)
}

/// Handler for PUT /exams/:id/marks.
///
/// Saving the same (student, subject) again overwrites the earlier mark.
async fn save_marks(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<SaveMarksRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = start("PUT /exams/:id/marks");
    let request = body(payload, correlation_id)?;
    let entries = MarksService::new(state.store(), state.config())
        .save_marks(&id, request.marks)
        .map_err(|e| failed(e, correlation_id))?;
    Ok(respond(StatusCode::OK, entries))
}

async fn exam_marks(State(state): State<AppState>, Path(id): Path<String>) -> HandlerResult {
    let correlation_id = start("GET /exams/:id/marks");
    let entries = MarksService::new(state.store(), state.config())
        .marks_for_exam(&id)
        .map_err(|e| failed(e, correlation_id))?;
    Ok(respond(StatusCode::OK, entries))
}

/// Handler for GET /exams/:id/analytics. An unknown exam renders the empty view.
async fn stored_exam_analytics(State(state): State<AppState>, Path(id): Path<String>) -> HandlerResult {
    let correlation_id = start("GET /exams/:id/analytics");
    let analytics = MarksService::new(state.store(), state.config())
        .exam_analytics(&id)
        .map_err(|e| failed(e, correlation_id))?;
    Ok(respond(StatusCode::OK, analytics))
}

async fn mark_attendance(
    State(state): State<AppState>,
    payload: Result<Json<MarkAttendanceRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = start("POST /attendance");
    let request = body(payload, correlation_id)?;
    let records = AttendanceService::new(state.store())
        .mark_day(request.date, request.marks)
        .map_err(|e| failed(e, correlation_id))?;
    Ok(respond(StatusCode::OK, records))
}

async fn attendance_for_date(
    State(state): State<AppState>,
    date: Result<Path<NaiveDate>, PathRejection>,
) -> HandlerResult {
    let correlation_id = start("GET /attendance/:date");
    let Path(date) =
        date.map_err(|rejection| ApiErrorResponse::from_path_rejection(rejection, correlation_id))?;

    let service = AttendanceService::new(state.store());
    let records = service.for_date(date).map_err(|e| failed(e, correlation_id))?;
    let present_count = service
        .present_count(date)
        .map_err(|e| failed(e, correlation_id))?;
    Ok(respond(
        StatusCode::OK,
        AttendanceDay {
            date,
            present_count,
            records,
        },
    ))
}

async fn monthly_salaries(
    State(state): State<AppState>,
    params: Result<Query<MonthQuery>, QueryRejection>,
) -> HandlerResult {
    let correlation_id = start("GET /salaries");
    let params = query(params, correlation_id)?;
    let salaries = SalaryService::new(state.store(), state.config())
        .monthly(params.month, params.year)
        .map_err(|e| failed(e, correlation_id))?;
    Ok(respond(StatusCode::OK, salaries))
}

async fn pay_salary(State(state): State<AppState>, Path(id): Path<String>) -> HandlerResult {
    let correlation_id = start("POST /salaries/:id/pay");
    let salary = SalaryService::new(state.store(), state.config())
        .mark_paid(&id)
        .map_err(|e| failed(e, correlation_id))?;
    Ok(respond(StatusCode::OK, salary))
}

async fn salary_slip(State(state): State<AppState>, Path(id): Path<String>) -> HandlerResult {
    let correlation_id = start("GET /salaries/:id/slip");
    let slip = SalaryService::new(state.store(), state.config())
        .slip(&id)
        .map_err(|e| failed(e, correlation_id))?;
    found(slip, "staff_salary", &id)
}

async fn dashboard_handler(State(state): State<AppState>) -> HandlerResult {
    let correlation_id = start("GET /dashboard");
    let summary = DashboardService::new(state.store())
        .summary(today())
        .map_err(|e| failed(e, correlation_id))?;
    Ok(respond(StatusCode::OK, summary))
}
