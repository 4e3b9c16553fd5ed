use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/login", post(handlers::login_form))
        .route("/register", post(handlers::register_form))
        .route("/logout", post(handlers::logout_form))
        .route("/tasks", post(handlers::add_task_form))
        .route("/tasks/reset", post(handlers::reset_form))
        .route("/tasks/:index/toggle", post(handlers::toggle_task_form))
        .route("/tasks/:index/delete", post(handlers::delete_task_form))
        .route("/goals/:kind", post(handlers::add_goal_form))
        .route("/history/record", post(handlers::record_history_form))
        .route("/api/register", post(handlers::api_register))
        .route("/api/login", post(handlers::api_login))
        .route("/api/logout", post(handlers::api_logout))
        .route("/api/planner", get(handlers::api_planner))
        .route("/api/tasks", post(handlers::api_add_task))
        .route("/api/tasks/reset", post(handlers::api_reset))
        .route(
            "/api/tasks/:index",
            put(handlers::api_toggle_task).delete(handlers::api_delete_task),
        )
        .route("/api/goals/:kind", post(handlers::api_add_goal))
        .route(
            "/api/history",
            get(handlers::api_history).post(handlers::api_record_history),
        )
        .with_state(state)
}
