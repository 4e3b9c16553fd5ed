use crate::models::{HistoryResponse, PlannerView};
use serde::Deserialize;
use std::fmt::Write;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Daily,
    Monthly,
    Yearly,
    History,
}

#[derive(Debug, Clone, Copy)]
pub enum NoticeKind {
    Error,
    Warning,
    Success,
}

#[derive(Debug)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

pub fn render_auth(notice: Option<&Notice>) -> String {
    page(
        "Task Tracker",
        &AUTH_HTML.replace("{{NOTICE}}", &notice_html(notice)),
    )
}

pub fn render_tracker(
    view: &PlannerView,
    tab: Tab,
    history: &HistoryResponse,
    today_label: &str,
) -> String {
    let body = match tab {
        Tab::Daily => daily_html(view),
        Tab::Monthly => goals_html("Monthly Goals", "monthly", &view.monthly),
        Tab::Yearly => goals_html("Yearly Goals", "yearly", &view.yearly),
        Tab::History => history_html(history),
    };

    let content = TRACKER_HTML
        .replace("{{USER}}", &escape_html(&view.username))
        .replace("{{TODAY}}", &escape_html(today_label))
        .replace("{{TABS}}", &tabs_html(tab))
        .replace("{{BODY}}", &body);
    page("Daily Task Tracker", &content)
}

fn page(title: &str, content: &str) -> String {
    PAGE_HTML
        .replace("{{TITLE}}", title)
        .replace("{{CONTENT}}", content)
}

fn notice_html(notice: Option<&Notice>) -> String {
    let Some(notice) = notice else {
        return String::new();
    };
    let class = match notice.kind {
        NoticeKind::Error => "error",
        NoticeKind::Warning => "warning",
        NoticeKind::Success => "success",
    };
    format!(
        r#"<p class="notice {class}">{}</p>"#,
        escape_html(&notice.message)
    )
}

fn tabs_html(active: Tab) -> String {
    [
        (Tab::Daily, "daily", "Daily"),
        (Tab::Monthly, "monthly", "Monthly"),
        (Tab::Yearly, "yearly", "Yearly"),
        (Tab::History, "history", "History"),
    ]
    .iter()
    .map(|(tab, key, label)| {
        let class = if *tab == active { "tab active" } else { "tab" };
        format!(r#"<a class="{class}" href="/?tab={key}">{label}</a>"#)
    })
    .collect()
}

fn daily_html(view: &PlannerView) -> String {
    let pct = view.completion_pct;
    let mut html = String::new();

    let _ = write!(
        html,
        r#"<form class="row" method="post" action="/tasks">
  <input name="name" placeholder="Task Description" />
  <button type="submit">Add Task</button>
</form>
<div class="progress"><div class="bar" style="width: {pct:.2}%"></div></div>
<p class="metric">Success <strong>{pct:.0}%</strong></p>
<h2>Your Tasks</h2>
"#
    );

    if view.daily.is_empty() {
        html.push_str(r#"<p class="info">No tasks yet. Add one above!</p>"#);
    } else {
        html.push_str(r#"<ul class="tasks">"#);
        for (index, task) in view.daily.iter().enumerate() {
            let name = escape_html(&task.name);
            let (label, mark) = if task.done {
                (format!("<s>{name}</s>"), "&#9745;")
            } else {
                (name, "&#9744;")
            };
            let _ = write!(
                html,
                r#"<li>
  <form method="post" action="/tasks/{index}/toggle">
    <button class="check" type="submit">{mark}</button>
  </form>
  <span>{label}</span>
  <form method="post" action="/tasks/{index}/delete">
    <button class="delete" type="submit">Delete</button>
  </form>
</li>"#
            );
        }
        html.push_str("</ul>");
    }

    html.push_str(
        r#"<div class="row">
  <form method="post" action="/history/record"><button type="submit">Record Today</button></form>
  <form method="post" action="/tasks/reset">
    <button type="submit">Reset List for Tomorrow</button>
  </form>
</div>"#,
    );
    html
}

fn goals_html(title: &str, kind: &str, goals: &[String]) -> String {
    let mut html = format!(
        r#"<h2>{title}</h2>
<form class="row" method="post" action="/goals/{kind}">
  <input name="goal" placeholder="New goal" />
  <button type="submit">Add Goal</button>
</form>
"#
    );
    if goals.is_empty() {
        html.push_str(r#"<p class="info">No goals yet.</p>"#);
    } else {
        html.push_str("<ul class=\"goals\">");
        for goal in goals {
            let _ = write!(html, "<li>{}</li>", escape_html(goal));
        }
        html.push_str("</ul>");
    }
    html
}

fn history_html(history: &HistoryResponse) -> String {
    let mut html = String::from("<h2>Last 7 Days</h2><div class=\"chart\">");
    for day in &history.last_7_days {
        let pct = day.pct.unwrap_or(0.0);
        let label = day
            .pct
            .map(|pct| format!("{pct:.0}%"))
            .unwrap_or_else(|| "-".to_string());
        let _ = write!(
            html,
            r#"<div class="col"><div class="fill" style="height: {pct:.2}%"></div>
<span>{label}</span><small>{}</small></div>"#,
            &day.date[5..]
        );
    }
    html.push_str("</div><h2>Weekly Averages</h2><table>");
    html.push_str("<tr><th>Week</th><th>Days</th><th>Average</th></tr>");
    for week in history.weekly_averages.iter().rev() {
        let avg = week
            .avg_pct
            .map(|pct| format!("{pct:.0}%"))
            .unwrap_or_else(|| "-".to_string());
        let _ = write!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{avg}</td></tr>",
            week.week, week.days_recorded
        );
    }
    html.push_str("</table>");
    html
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const AUTH_HTML: &str = r#"<header>
  <h1>Task Tracker</h1>
  <p class="subtitle">Log in or create an account.</p>
</header>
{{NOTICE}}
<section class="panel">
  <form class="card" method="post" action="/login">
    <h2>Login</h2>
    <input name="username" placeholder="Username" />
    <input name="password" type="password" placeholder="Password" />
    <button type="submit">Log In</button>
  </form>
  <form class="card" method="post" action="/register">
    <h2>Register</h2>
    <input name="username" placeholder="New Username" />
    <input name="password" type="password" placeholder="New Password" />
    <button type="submit">Create Account</button>
  </form>
</section>"#;

const TRACKER_HTML: &str = r#"<header>
  <div class="row spread">
    <h1>Daily Task Tracker</h1>
    <form method="post" action="/logout"><button type="submit">Logout</button></form>
  </div>
  <p class="subtitle">{{USER}} &middot; Today is: <strong>{{TODAY}}</strong></p>
</header>
<nav>{{TABS}}</nav>
<section>{{BODY}}</section>"#;

const PAGE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}}</title>
  <style>
    :root {
      --bg: #f8f3e6;
      --ink: #2b2a28;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --card: #ffffff;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: start center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(760px, 100%);
      background: var(--card);
      border-radius: 20px;
      padding: 32px;
      display: grid;
      gap: 20px;
    }

    h1 {
      margin: 0;
    }

    .subtitle {
      margin: 4px 0 0;
      color: #5f5c57;
    }

    .row {
      display: flex;
      gap: 12px;
      align-items: center;
    }

    .spread {
      justify-content: space-between;
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(240px, 1fr));
      gap: 16px;
    }

    .card {
      display: grid;
      gap: 10px;
    }

    input {
      flex: 1;
      padding: 10px 12px;
      border-radius: 10px;
      border: 1px solid #d8d2c6;
    }

    button {
      border: none;
      border-radius: 999px;
      padding: 10px 16px;
      background: var(--accent-2);
      color: white;
      cursor: pointer;
    }

    button.delete {
      background: var(--accent);
    }

    button.check {
      background: transparent;
      color: var(--ink);
      font-size: 1.2rem;
      padding: 0 6px;
    }

    .notice.error { color: #b3261e; }
    .notice.warning { color: #8a6d00; }
    .notice.success { color: #1e7b34; }
    .info { color: #5f5c57; }

    nav {
      display: flex;
      gap: 8px;
    }

    .tab {
      padding: 6px 14px;
      border-radius: 999px;
      color: var(--accent-2);
      text-decoration: none;
    }

    .tab.active {
      background: var(--accent-2);
      color: white;
    }

    .progress {
      height: 12px;
      border-radius: 999px;
      background: #ece6da;
      overflow: hidden;
    }

    .progress .bar {
      height: 100%;
      background: var(--accent);
    }

    .tasks, .goals {
      list-style: none;
      padding: 0;
      display: grid;
      gap: 8px;
    }

    .tasks li {
      display: grid;
      grid-template-columns: auto 1fr auto;
      gap: 12px;
      align-items: center;
    }

    .chart {
      display: grid;
      grid-template-columns: repeat(7, 1fr);
      gap: 8px;
      height: 180px;
      align-items: end;
    }

    .chart .col {
      display: flex;
      flex-direction: column;
      justify-content: flex-end;
      align-items: center;
      height: 100%;
    }

    .chart .fill {
      width: 100%;
      background: var(--accent);
      border-radius: 6px 6px 0 0;
    }
  </style>
</head>
<body>
  <main class="app">
{{CONTENT}}
  </main>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Task;
    use crate::stats::build_history_at;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn view(daily: Vec<Task>) -> PlannerView {
        crate::models::PlannerData {
            daily,
            ..Default::default()
        }
        .into_view("alice")
    }

    #[test]
    fn task_names_are_escaped() {
        let view = view(vec![Task {
            name: "<script>alert(1)</script>".into(),
            done: false,
        }]);
        let today = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let history = build_history_at(today, &BTreeMap::new());
        let html = render_tracker(&view, Tab::Daily, &history, "Monday, January 05");
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn empty_daily_list_shows_hint_and_zero_percent() {
        let view = view(Vec::new());
        let today = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let history = build_history_at(today, &BTreeMap::new());
        let html = render_tracker(&view, Tab::Daily, &history, "Monday, January 05");
        assert!(html.contains("No tasks yet"));
        assert!(html.contains("<strong>0%</strong>"));
    }

    #[test]
    fn auth_page_shows_notice() {
        let notice = Notice::new(NoticeKind::Error, "Invalid Username/Password");
        let html = render_auth(Some(&notice));
        assert!(html.contains("notice error"));
        assert!(html.contains("Create Account"));
    }
}
