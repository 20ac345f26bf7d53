use crate::state::AppState;
use axum::Router;

mod dto;
pub mod handlers;
pub mod memory;
pub mod password;
pub mod repo;
pub mod repo_types;
pub mod services;

pub use repo_types::{Role, User};
pub use services::UserDirectory;

pub fn router() -> Router<AppState> {
    handlers::user_routes()
}
