pub mod app;
pub mod auth;
pub mod config;
pub mod enquiries;
pub mod error;
pub mod state;
pub mod users;

pub use app::{build_app, serve};
pub use error::AppError;
pub use state::AppState;
