use crate::models::{DailyPoint, HistoryPoint, HistoryResponse, Task, WeeklyAveragePoint};
use chrono::{Datelike, Duration, Local, NaiveDate};
use std::collections::BTreeMap;

/// Share of finished tasks as a percentage; an empty list counts as 0.
pub fn completion_pct(tasks: &[Task]) -> f64 {
    if tasks.is_empty() {
        return 0.0;
    }
    let done = tasks.iter().filter(|task| task.done).count();
    done as f64 / tasks.len() as f64 * 100.0
}

pub fn build_history(history: &BTreeMap<String, f64>) -> HistoryResponse {
    build_history_at(Local::now().date_naive(), history)
}

pub fn build_history_at(today: NaiveDate, history: &BTreeMap<String, f64>) -> HistoryResponse {
    const WEEK_COUNT: usize = 8;

    let points = history
        .iter()
        .map(|(date, pct)| HistoryPoint {
            date: date.clone(),
            pct: *pct,
        })
        .collect();

    let mut last_7_days = Vec::with_capacity(7);
    for offset in (0..7).rev() {
        let date = today - Duration::days(offset as i64);
        last_7_days.push(DailyPoint {
            date: date.to_string(),
            pct: history.get(&date_key(date)).copied(),
        });
    }

    let current_week_start = week_start(today);
    let mut weekly_averages = Vec::with_capacity(WEEK_COUNT);

    for offset in (0..WEEK_COUNT).rev() {
        let start = current_week_start - Duration::weeks(offset as i64);
        let end = start + Duration::days(6);

        let mut sum = 0.0;
        let mut days_recorded = 0u8;
        for day_offset in 0..7 {
            let date = start + Duration::days(day_offset);
            if let Some(pct) = history.get(&date_key(date)) {
                sum += pct;
                days_recorded += 1;
            }
        }

        weekly_averages.push(WeeklyAveragePoint {
            week: week_label(start),
            start_date: start.to_string(),
            end_date: end.to_string(),
            days_recorded,
            avg_pct: (days_recorded > 0).then(|| sum / f64::from(days_recorded)),
        });
    }

    HistoryResponse {
        points,
        last_7_days,
        weekly_averages,
    }
}

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

fn week_label(date: NaiveDate) -> String {
    let iso = date.iso_week();
    format!("{}-W{:02}", iso.year(), iso.week())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(name: &str, done: bool) -> Task {
        Task {
            name: name.into(),
            done,
        }
    }

    #[test]
    fn empty_list_is_zero_percent() {
        assert_eq!(completion_pct(&[]), 0.0);
    }

    #[test]
    fn pct_counts_done_tasks() {
        let tasks = vec![task("A", true), task("B", false)];
        assert_eq!(completion_pct(&tasks), 50.0);

        let tasks = vec![task("A", true), task("B", false), task("C", false)];
        assert!((completion_pct(&tasks) - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn last_7_days_marks_unrecorded_days() {
        let today = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let two_days_ago = today - Duration::days(2);
        let mut history = BTreeMap::new();
        history.insert(date_key(two_days_ago), 75.0);

        let stats = build_history_at(today, &history);
        assert_eq!(stats.last_7_days.len(), 7);
        assert_eq!(stats.last_7_days.last().unwrap().date, today.to_string());

        let point = stats
            .last_7_days
            .iter()
            .find(|day| day.date == two_days_ago.to_string())
            .expect("missing day");
        assert_eq!(point.pct, Some(75.0));
        assert_eq!(
            stats.last_7_days.iter().filter(|day| day.pct.is_none()).count(),
            6
        );
    }

    #[test]
    fn weekly_average_covers_recorded_days_only() {
        // 2026-01-05 is a Monday.
        let today = NaiveDate::from_ymd_opt(2026, 1, 7).unwrap();
        let mut history = BTreeMap::new();
        history.insert("2026-01-05".to_string(), 40.0);
        history.insert("2026-01-06".to_string(), 80.0);

        let stats = build_history_at(today, &history);
        assert_eq!(stats.weekly_averages.len(), 8);
        assert_eq!(stats.points.len(), 2);

        let current = stats.weekly_averages.last().unwrap();
        assert_eq!(current.start_date, "2026-01-05");
        assert_eq!(current.week, "2026-W02");
        assert_eq!(current.days_recorded, 2);
        assert_eq!(current.avg_pct, Some(60.0));
        assert_eq!(stats.weekly_averages[0].avg_pct, None);
    }
}
