use crate::accounts::AccountStore;
use crate::config::Config;
use crate::planner::PlannerStore;
use crate::session::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountStore,
    pub planner: PlannerStore,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            accounts: AccountStore::new(&config.users_path),
            planner: PlannerStore::new(&config.tasks_path),
            sessions: SessionStore::new(config.session_ttl),
        }
    }
}
