use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Username to argon2 password hash.
pub type Accounts = BTreeMap<String, String>;

/// Username to that user's planner data, stored as one JSON document.
pub type Planners = BTreeMap<String, PlannerData>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
    pub done: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PlannerData {
    pub daily: Vec<Task>,
    pub monthly: Vec<String>,
    pub yearly: Vec<String>,
    pub history: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalKind {
    Monthly,
    Yearly,
}

#[derive(Debug, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct NewTaskRequest {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub done: bool,
}

#[derive(Debug, Deserialize)]
pub struct NewGoalRequest {
    #[serde(default)]
    pub goal: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisteredResponse {
    pub username: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PlannerView {
    pub username: String,
    pub daily: Vec<Task>,
    pub monthly: Vec<String>,
    pub yearly: Vec<String>,
    pub history: BTreeMap<String, f64>,
    pub completion_pct: f64,
}

#[derive(Debug, Serialize)]
pub struct HistoryPoint {
    pub date: String,
    pub pct: f64,
}

#[derive(Debug, Serialize)]
pub struct DailyPoint {
    pub date: String,
    pub pct: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct WeeklyAveragePoint {
    pub week: String,
    pub start_date: String,
    pub end_date: String,
    pub days_recorded: u8,
    pub avg_pct: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub points: Vec<HistoryPoint>,
    pub last_7_days: Vec<DailyPoint>,
    pub weekly_averages: Vec<WeeklyAveragePoint>,
}
