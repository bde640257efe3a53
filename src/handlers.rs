use crate::attendance::{AttendanceCommand, AttendanceOutcome};
use crate::calc::{self, GradeReport, LibraryAccess, Operator, Parity, VotingStatus};
use crate::catalog::{self, Project};
use crate::counter::CounterAction;
use crate::errors::AppError;
use crate::ledger::{LedgerCommand, LedgerOutcome};
use crate::models::{
    AnalyticsResponse, ArithQuery, CalcResponse, CounterRequest, CounterResponse, DaySummary, ExpenseSummaryResponse, GradeQuery,
    LibraryQuery, MarksQuery, MarksResponse, MonthQuery, NewStudent, PairQuery, ParityQuery,
    SaveDayRequest, Student, StudentPatch, Transaction, TransactionInput, TransactionPatch,
    VotingQuery,
};
use crate::state::AppState;
use crate::stats::MonthKey;
use crate::ui::render_index;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Html,
};
use chrono::{Datelike, Local, NaiveDate};
use serde::Serialize;

pub async fn index() -> Html<String> {
    Html(render_index(catalog::projects()))
}

pub async fn list_projects() -> Json<&'static [Project]> {
    Json(catalog::projects())
}

// --- counter ---

pub async fn get_counter(State(state): State<AppState>) -> Json<CounterResponse> {
    let counter = state.counter.lock().await;
    Json(CounterResponse {
        value: counter.value(),
    })
}

pub async fn change_counter(
    State(state): State<AppState>,
    Json(payload): Json<CounterRequest>,
) -> Result<Json<CounterResponse>, AppError> {
    let action: CounterAction = payload.action.parse()?;
    let mut counter = state.counter.lock().await;
    let value = counter.apply(action);
    Ok(Json(CounterResponse { value }))
}

// --- calculators ---

pub async fn calc_sum(Query(query): Query<PairQuery>) -> Result<Json<CalcResponse<f64>>, AppError> {
    let a = calc::parse_number(&query.a)?;
    let b = calc::parse_number(&query.b)?;
    Ok(Json(CalcResponse {
        input: format!("{a} + {b}"),
        result: calc::add_numbers(a, b),
    }))
}

pub async fn calc_arith(
    Query(query): Query<ArithQuery>,
) -> Result<Json<CalcResponse<f64>>, AppError> {
    let a = calc::parse_number(&query.a)?;
    let b = calc::parse_number(&query.b)?;
    let op: Operator = query.op.parse()?;
    Ok(Json(CalcResponse {
        input: format!("{a} {} {b}", query.op.trim()),
        result: calc::calculate(a, b, op)?,
    }))
}

pub async fn calc_parity(
    Query(query): Query<ParityQuery>,
) -> Result<Json<CalcResponse<Parity>>, AppError> {
    let n = query
        .n
        .trim()
        .parse::<i64>()
        .map_err(|_| AppError::bad_request(format!("'{}' is not a whole number", query.n.trim())))?;
    Ok(Json(CalcResponse {
        input: n.to_string(),
        result: calc::parity(n),
    }))
}

pub async fn calc_voting(
    Query(query): Query<VotingQuery>,
) -> Result<Json<CalcResponse<VotingStatus>>, AppError> {
    let current_year = Local::now().year();
    Ok(Json(CalcResponse {
        input: query.birth_year.to_string(),
        result: calc::voting_status(query.birth_year, current_year)?,
    }))
}

pub async fn calc_grade(
    Query(query): Query<GradeQuery>,
) -> Result<Json<CalcResponse<GradeReport>>, AppError> {
    let m1 = calc::parse_number(&query.m1)?;
    let m2 = calc::parse_number(&query.m2)?;
    let m3 = calc::parse_number(&query.m3)?;
    Ok(Json(CalcResponse {
        input: format!("{m1}, {m2}, {m3}"),
        result: calc::grade(m1, m2, m3),
    }))
}

#[derive(Debug, Serialize)]
pub struct LibraryResponse {
    pub access: LibraryAccess,
    pub message: &'static str,
}

pub async fn calc_library(Query(query): Query<LibraryQuery>) -> Json<LibraryResponse> {
    let access = calc::library_access(query.has_card, query.is_student);
    Json(LibraryResponse {
        access,
        message: access.message(),
    })
}

// --- attendance ---

pub async fn list_students(State(state): State<AppState>) -> Json<Vec<Student>> {
    let book = state.attendance.lock().await;
    Json(book.students().to_vec())
}

pub async fn add_student(
    State(state): State<AppState>,
    Json(payload): Json<NewStudent>,
) -> Result<(StatusCode, Json<AttendanceOutcome>), AppError> {
    let outcome = apply_attendance(&state, AttendanceCommand::AddStudent(payload)).await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

pub async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<StudentPatch>,
) -> Result<Json<AttendanceOutcome>, AppError> {
    let outcome = apply_attendance(&state, AttendanceCommand::UpdateStudent { id, patch }).await?;
    Ok(Json(outcome))
}

pub async fn remove_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AttendanceOutcome>, AppError> {
    let outcome = apply_attendance(&state, AttendanceCommand::RemoveStudent { id }).await?;
    Ok(Json(outcome))
}

pub async fn list_records(State(state): State<AppState>) -> Json<Vec<DaySummary>> {
    let book = state.attendance.lock().await;
    Json(book.day_summaries())
}

pub async fn save_day(
    State(state): State<AppState>,
    Path(date): Path<String>,
    Json(payload): Json<SaveDayRequest>,
) -> Result<Json<AttendanceOutcome>, AppError> {
    let date = parse_date(&date)?;
    let command = AttendanceCommand::SaveDay {
        date,
        marks: payload.marks,
    };
    Ok(Json(apply_attendance(&state, command).await?))
}

pub async fn delete_day(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<AttendanceOutcome>, AppError> {
    let date = parse_date(&date)?;
    Ok(Json(
        apply_attendance(&state, AttendanceCommand::DeleteDay { date }).await?,
    ))
}

pub async fn get_marks(
    State(state): State<AppState>,
    Query(query): Query<MarksQuery>,
) -> Result<Json<MarksResponse>, AppError> {
    let date = match query.date.as_deref() {
        Some(raw) => parse_date(raw)?,
        None => today(),
    };
    let book = state.attendance.lock().await;
    Ok(Json(book.marks_for(date)))
}

pub async fn get_analytics(State(state): State<AppState>) -> Json<AnalyticsResponse> {
    let book = state.attendance.lock().await;
    Json(book.analytics())
}

async fn apply_attendance(
    state: &AppState,
    command: AttendanceCommand,
) -> Result<AttendanceOutcome, AppError> {
    let mut book = state.attendance.lock().await;
    book.apply(command).await
}

// --- expenses ---

pub async fn list_transactions(State(state): State<AppState>) -> Json<Vec<Transaction>> {
    let ledger = state.ledger.lock().await;
    Json(ledger.history())
}

pub async fn add_transaction(
    State(state): State<AppState>,
    Json(payload): Json<TransactionInput>,
) -> Result<(StatusCode, Json<LedgerOutcome>), AppError> {
    let outcome = apply_ledger(&state, LedgerCommand::Add(payload)).await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

pub async fn update_transaction(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<TransactionPatch>,
) -> Result<Json<LedgerOutcome>, AppError> {
    let outcome = apply_ledger(&state, LedgerCommand::Update { id, patch }).await?;
    Ok(Json(outcome))
}

pub async fn remove_transaction(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<LedgerOutcome>, AppError> {
    let outcome = apply_ledger(&state, LedgerCommand::Remove { id }).await?;
    Ok(Json(outcome))
}

pub async fn expense_summary(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<ExpenseSummaryResponse>, AppError> {
    let month = match query.month.as_deref() {
        Some(raw) => raw.parse::<MonthKey>()?,
        None => MonthKey::current(),
    };
    let ledger = state.ledger.lock().await;
    Ok(Json(ledger.summary(month)))
}

pub async fn expense_months(State(state): State<AppState>) -> Json<Vec<String>> {
    let ledger = state.ledger.lock().await;
    Json(ledger.months(today()))
}

async fn apply_ledger(state: &AppState, command: LedgerCommand) -> Result<LedgerOutcome, AppError> {
    let mut ledger = state.ledger.lock().await;
    ledger.apply(command).await
}

fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::bad_request(format!("date must look like YYYY-MM-DD, got '{raw}'")))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
