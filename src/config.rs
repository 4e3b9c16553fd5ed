use crate::session::DEFAULT_SESSION_TTL;
use std::{env, path::PathBuf, time::Duration};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATA_DIR: &str = "data";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub users_path: PathBuf,
    pub tasks_path: PathBuf,
    pub session_ttl: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let data_dir = env::var("APP_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR));

        let users_path = env::var("APP_USERS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir.join("users.json"));
        let tasks_path = env::var("APP_TASKS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir.join("tasks_data.json"));

        let session_ttl = env::var("SESSION_TTL_SECS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_SESSION_TTL);

        Self {
            port,
            users_path,
            tasks_path,
            session_ttl,
        }
    }
}
