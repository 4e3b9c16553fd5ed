use crate::errors::AppError;
use crate::models::{
    Credentials, GoalKind, HistoryResponse, LoginResponse, NewGoalRequest, NewTaskRequest,
    PlannerView, RegisteredResponse, ToggleRequest,
};
use crate::session::{expired_session_cookie, session_cookie, CurrentUser, PageUser};
use crate::state::AppState;
use crate::stats::{build_history, date_key};
use crate::ui::{render_auth, render_tracker, Notice, NoticeKind, Tab};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Local;
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct TrackerQuery {
    #[serde(default)]
    pub tab: Tab,
}

pub async fn index(
    user: Option<CurrentUser>,
    State(state): State<AppState>,
    Query(query): Query<TrackerQuery>,
) -> Result<Html<String>, AppError> {
    let Some(user) = user else {
        return Ok(Html(render_auth(None)));
    };

    let data = state.planner.planner(&user.username).await?;
    let history = build_history(&data.history);
    let view = data.into_view(&user.username);
    Ok(Html(render_tracker(
        &view,
        query.tab,
        &history,
        &today_label(),
    )))
}

pub async fn login_form(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(creds): Form<Credentials>,
) -> Result<Response, AppError> {
    match state.accounts.login(&creds.username, &creds.password).await {
        Ok(()) => {
            let token = state.sessions.create(&creds.username).await;
            info!(username = %creds.username, "logged in");
            Ok((jar.add(session_cookie(token)), Redirect::to("/")).into_response())
        }
        Err(err) if err.is_user_facing() => Ok(auth_notice(err, NoticeKind::Error)),
        Err(err) => Err(err),
    }
}

pub async fn register_form(
    State(state): State<AppState>,
    Form(creds): Form<Credentials>,
) -> Result<Response, AppError> {
    match state
        .accounts
        .register(&creds.username, &creds.password)
        .await
    {
        Ok(()) => {
            let notice = Notice::new(
                NoticeKind::Success,
                "Registration successful! Go to Login tab.",
            );
            Ok(Html(render_auth(Some(&notice))).into_response())
        }
        Err(AppError::InvalidInput) => {
            Ok(auth_notice(AppError::InvalidInput, NoticeKind::Warning))
        }
        Err(err) if err.is_user_facing() => Ok(auth_notice(err, NoticeKind::Error)),
        Err(err) => Err(err),
    }
}

pub async fn logout_form(
    user: Option<CurrentUser>,
    State(state): State<AppState>,
    jar: CookieJar,
) -> impl IntoResponse {
    if let Some(user) = user {
        state.sessions.remove(&user.token).await;
        info!(username = %user.username, "logged out");
    }
    (jar.remove(expired_session_cookie()), Redirect::to("/"))
}

pub async fn add_task_form(
    PageUser(user): PageUser,
    State(state): State<AppState>,
    Form(payload): Form<NewTaskRequest>,
) -> Result<Redirect, AppError> {
    state.planner.add_task(&user.username, &payload.name).await?;
    Ok(Redirect::to("/"))
}

/// Flips the checkbox of the task currently at `index`.
pub async fn toggle_task_form(
    PageUser(user): PageUser,
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Redirect, AppError> {
    state.planner.flip_task(&user.username, index).await?;
    Ok(Redirect::to("/"))
}

pub async fn delete_task_form(
    PageUser(user): PageUser,
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Redirect, AppError> {
    state.planner.delete_task(&user.username, index).await?;
    Ok(Redirect::to("/"))
}

pub async fn reset_form(
    PageUser(user): PageUser,
    State(state): State<AppState>,
) -> Result<Redirect, AppError> {
    state
        .planner
        .reset_daily(&user.username, &today_string())
        .await?;
    Ok(Redirect::to("/"))
}

pub async fn add_goal_form(
    PageUser(user): PageUser,
    State(state): State<AppState>,
    Path(kind): Path<GoalKind>,
    Form(payload): Form<NewGoalRequest>,
) -> Result<Redirect, AppError> {
    state
        .planner
        .add_goal(&user.username, kind, &payload.goal)
        .await?;
    let tab = match kind {
        GoalKind::Monthly => "/?tab=monthly",
        GoalKind::Yearly => "/?tab=yearly",
    };
    Ok(Redirect::to(tab))
}

pub async fn record_history_form(
    PageUser(user): PageUser,
    State(state): State<AppState>,
) -> Result<Redirect, AppError> {
    state
        .planner
        .record_today(&user.username, &today_string())
        .await?;
    Ok(Redirect::to("/?tab=history"))
}

pub async fn api_register(
    State(state): State<AppState>,
    Json(creds): Json<Credentials>,
) -> Result<(StatusCode, Json<RegisteredResponse>), AppError> {
    state
        .accounts
        .register(&creds.username, &creds.password)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(RegisteredResponse {
            username: creds.username,
        }),
    ))
}

pub async fn api_login(
    State(state): State<AppState>,
    Json(creds): Json<Credentials>,
) -> Result<Json<LoginResponse>, AppError> {
    state
        .accounts
        .login(&creds.username, &creds.password)
        .await?;
    let token = state.sessions.create(&creds.username).await;
    info!(username = %creds.username, "logged in");
    Ok(Json(LoginResponse {
        token,
        username: creds.username,
    }))
}

pub async fn api_logout(user: Option<CurrentUser>, State(state): State<AppState>) -> StatusCode {
    if let Some(user) = user {
        state.sessions.remove(&user.token).await;
        info!(username = %user.username, "logged out");
    }
    StatusCode::NO_CONTENT
}

pub async fn api_planner(
    user: CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<PlannerView>, AppError> {
    let data = state.planner.planner(&user.username).await?;
    Ok(Json(data.into_view(&user.username)))
}

pub async fn api_add_task(
    user: CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<NewTaskRequest>,
) -> Result<Json<PlannerView>, AppError> {
    let data = state.planner.add_task(&user.username, &payload.name).await?;
    Ok(Json(data.into_view(&user.username)))
}

pub async fn api_toggle_task(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Json(payload): Json<ToggleRequest>,
) -> Result<Json<PlannerView>, AppError> {
    let data = state
        .planner
        .toggle_task(&user.username, index, payload.done)
        .await?;
    Ok(Json(data.into_view(&user.username)))
}

pub async fn api_delete_task(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<PlannerView>, AppError> {
    let data = state.planner.delete_task(&user.username, index).await?;
    Ok(Json(data.into_view(&user.username)))
}

pub async fn api_reset(
    user: CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<PlannerView>, AppError> {
    let data = state
        .planner
        .reset_daily(&user.username, &today_string())
        .await?;
    Ok(Json(data.into_view(&user.username)))
}

pub async fn api_add_goal(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(kind): Path<GoalKind>,
    Json(payload): Json<NewGoalRequest>,
) -> Result<Json<PlannerView>, AppError> {
    let data = state
        .planner
        .add_goal(&user.username, kind, &payload.goal)
        .await?;
    Ok(Json(data.into_view(&user.username)))
}

pub async fn api_record_history(
    user: CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<PlannerView>, AppError> {
    let data = state
        .planner
        .record_today(&user.username, &today_string())
        .await?;
    Ok(Json(data.into_view(&user.username)))
}

pub async fn api_history(
    user: CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<HistoryResponse>, AppError> {
    let data = state.planner.planner(&user.username).await?;
    Ok(Json(build_history(&data.history)))
}

fn auth_notice(err: AppError, kind: NoticeKind) -> Response {
    let status = err.status();
    let notice = Notice::new(kind, err.to_string());
    (status, Html(render_auth(Some(&notice)))).into_response()
}

fn today_string() -> String {
    date_key(Local::now().date_naive())
}

fn today_label() -> String {
    Local::now().format("%A, %B %d").to_string()
}
