mod dto;
pub mod handlers;
pub mod memory;
pub mod repo;
pub mod repo_types;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub use repo_types::Enquiry;
pub use services::{ClaimWorkflow, EnquiryIntake, EnquirySubmission};

pub fn router() -> Router<AppState> {
    handlers::enquiry_routes()
}
