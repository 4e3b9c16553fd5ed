pub mod accounts;
pub mod app;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod planner;
pub mod session;
pub mod stats;
pub mod storage;
pub mod ui;
pub mod state;

pub use app::router;
pub use config::Config;
pub use state::AppState;
