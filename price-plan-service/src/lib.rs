pub mod api;
pub mod config;
pub mod metrics_server;
pub mod observability;
pub mod seed;
pub mod validation;

pub use api::{router, AppState};
