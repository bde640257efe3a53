use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, patch, put},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/projects", get(handlers::list_projects))
        .route(
            "/api/counter",
            get(handlers::get_counter).post(handlers::change_counter),
        )
        .route("/api/calc/sum", get(handlers::calc_sum))
        .route("/api/calc/arith", get(handlers::calc_arith))
        .route("/api/calc/parity", get(handlers::calc_parity))
        .route("/api/calc/voting", get(handlers::calc_voting))
        .route("/api/calc/grade", get(handlers::calc_grade))
        .route("/api/calc/library", get(handlers::calc_library))
        .route(
            "/api/attendance/students",
            get(handlers::list_students).post(handlers::add_student),
        )
        .route(
            "/api/attendance/students/:id",
            patch(handlers::update_student).delete(handlers::remove_student),
        )
        .route("/api/attendance/records", get(handlers::list_records))
        .route(
            "/api/attendance/records/:date",
            put(handlers::save_day).delete(handlers::delete_day),
        )
        .route("/api/attendance/marks", get(handlers::get_marks))
        .route("/api/attendance/analytics", get(handlers::get_analytics))
        .route(
            "/api/expenses/transactions",
            get(handlers::list_transactions).post(handlers::add_transaction),
        )
        .route(
            "/api/expenses/transactions/:id",
            patch(handlers::update_transaction).delete(handlers::remove_transaction),
        )
        .route("/api/expenses/summary", get(handlers::expense_summary))
        .route("/api/expenses/months", get(handlers::expense_months))
        .with_state(state)
}
