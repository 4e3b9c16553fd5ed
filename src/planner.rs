use crate::errors::AppError;
use crate::models::{GoalKind, PlannerData, PlannerView, Planners, Task};
use crate::stats::completion_pct;
use crate::storage::JsonStore;
use std::path::PathBuf;
use tracing::info;

impl PlannerData {
    /// Returns false and leaves the list untouched when `name` is empty.
    pub fn add_task(&mut self, name: &str) -> bool {
        if name.is_empty() {
            return false;
        }
        self.daily.push(Task {
            name: name.to_owned(),
            done: false,
        });
        true
    }

    pub fn set_done(&mut self, index: usize, done: bool) -> Result<(), AppError> {
        let task = self.daily.get_mut(index).ok_or(AppError::NotFound(index))?;
        task.done = done;
        Ok(())
    }

    /// Later tasks shift down by one.
    pub fn remove_task(&mut self, index: usize) -> Result<Task, AppError> {
        if index >= self.daily.len() {
            return Err(AppError::NotFound(index));
        }
        Ok(self.daily.remove(index))
    }

    pub fn add_goal(&mut self, kind: GoalKind, goal: &str) -> bool {
        if goal.is_empty() {
            return false;
        }
        let list = match kind {
            GoalKind::Monthly => &mut self.monthly,
            GoalKind::Yearly => &mut self.yearly,
        };
        list.push(goal.to_owned());
        true
    }

    pub fn record_history(&mut self, date: &str, pct: f64) {
        self.history.insert(date.to_owned(), pct);
    }

    pub fn completion_pct(&self) -> f64 {
        completion_pct(&self.daily)
    }

    pub fn into_view(self, username: &str) -> PlannerView {
        let completion_pct = self.completion_pct();
        PlannerView {
            username: username.to_owned(),
            daily: self.daily,
            monthly: self.monthly,
            yearly: self.yearly,
            history: self.history,
            completion_pct,
        }
    }
}

/// Per-user planner data backed by the shared planner file.
#[derive(Clone)]
pub struct PlannerStore {
    store: JsonStore<Planners>,
}

impl PlannerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            store: JsonStore::new(path),
        }
    }

    pub async fn planner(&self, user: &str) -> Result<PlannerData, AppError> {
        let mut planners = self.store.read().await?;
        Ok(planners.remove(user).unwrap_or_default())
    }

    pub async fn add_task(&self, user: &str, name: &str) -> Result<PlannerData, AppError> {
        if name.is_empty() {
            return self.planner(user).await;
        }
        let data = self.mutate(user, |data| Ok(data.add_task(name))).await?;
        info!(user, task = name, "added task");
        Ok(data)
    }

    pub async fn toggle_task(
        &self,
        user: &str,
        index: usize,
        done: bool,
    ) -> Result<PlannerData, AppError> {
        let data = self.mutate(user, |data| data.set_done(index, done)).await?;
        info!(user, index, done, "toggled task");
        Ok(data)
    }

    /// Inverts `done` for the task at `index` within one read-modify-write.
    pub async fn flip_task(&self, user: &str, index: usize) -> Result<PlannerData, AppError> {
        let data = self
            .mutate(user, |data| {
                let done = data.daily.get(index).ok_or(AppError::NotFound(index))?.done;
                data.set_done(index, !done)
            })
            .await?;
        info!(user, index, "flipped task");
        Ok(data)
    }

    pub async fn delete_task(&self, user: &str, index: usize) -> Result<PlannerData, AppError> {
        let data = self.mutate(user, |data| data.remove_task(index)).await?;
        info!(user, index, "deleted task");
        Ok(data)
    }

    /// Records `date`'s completion percentage, then empties the daily list.
    pub async fn reset_daily(&self, user: &str, date: &str) -> Result<PlannerData, AppError> {
        let data = self
            .mutate(user, |data| {
                let pct = data.completion_pct();
                data.record_history(date, pct);
                data.daily.clear();
                Ok(())
            })
            .await?;
        info!(user, date, "reset daily list");
        Ok(data)
    }

    pub async fn add_monthly_goal(&self, user: &str, goal: &str) -> Result<PlannerData, AppError> {
        self.add_goal(user, GoalKind::Monthly, goal).await
    }

    pub async fn add_yearly_goal(&self, user: &str, goal: &str) -> Result<PlannerData, AppError> {
        self.add_goal(user, GoalKind::Yearly, goal).await
    }

    pub async fn add_goal(
        &self,
        user: &str,
        kind: GoalKind,
        goal: &str,
    ) -> Result<PlannerData, AppError> {
        if goal.is_empty() {
            return self.planner(user).await;
        }
        let data = self.mutate(user, |data| Ok(data.add_goal(kind, goal))).await?;
        info!(user, ?kind, "added goal");
        Ok(data)
    }

    pub async fn record_history(
        &self,
        user: &str,
        date: &str,
        pct: f64,
    ) -> Result<PlannerData, AppError> {
        let data = self
            .mutate(user, |data| {
                data.record_history(date, pct);
                Ok(())
            })
            .await?;
        info!(user, date, pct, "recorded history");
        Ok(data)
    }

    /// Stores the current completion percentage under `date`.
    pub async fn record_today(&self, user: &str, date: &str) -> Result<PlannerData, AppError> {
        let data = self
            .mutate(user, |data| {
                let pct = data.completion_pct();
                data.record_history(date, pct);
                Ok(())
            })
            .await?;
        info!(user, date, "recorded history");
        Ok(data)
    }

    async fn mutate<R, F>(&self, user: &str, apply: F) -> Result<PlannerData, AppError>
    where
        F: FnOnce(&mut PlannerData) -> Result<R, AppError>,
    {
        self.store
            .update(|planners| {
                let data = planners.entry(user.to_owned()).or_default();
                apply(data)?;
                Ok(data.clone())
            })
            .await
    }
}
