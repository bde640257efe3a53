pub mod app;
pub mod attendance;
pub mod calc;
pub mod catalog;
pub mod config;
pub mod counter;
pub mod errors;
pub mod handlers;
pub mod ledger;
pub mod mirror;
pub mod models;
pub mod state;
pub mod stats;
pub mod storage;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use state::AppState;
pub use storage::JsonStore;
