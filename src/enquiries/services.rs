use std::sync::Arc;

use axum::extract::FromRef;
use time::OffsetDateTime;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    enquiries::{
        repo::EnquiryRepository,
        repo_types::{Enquiry, NewEnquiry},
    },
    error::AppError,
    state::AppState,
    users::services::normalize_email,
};

/// Raw public form fields, before presence checks.
#[derive(Debug, Clone, Default)]
pub struct EnquirySubmission {
    pub name: Option<String>,
    pub email: Option<String>,
    pub course_interest: Option<String>,
    pub phone: Option<String>,
    pub message: Option<String>,
    pub source: Option<String>,
}

/// Public intake of enquiries.
#[derive(Clone)]
pub struct EnquiryIntake {
    enquiries: Arc<dyn EnquiryRepository>,
}

impl FromRef<AppState> for EnquiryIntake {
    fn from_ref(state: &AppState) -> Self {
        EnquiryIntake::new(state.enquiries.clone())
    }
}

fn present_field(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl EnquiryIntake {
    pub fn new(enquiries: Arc<dyn EnquiryRepository>) -> Self {
        Self { enquiries }
    }

    #[instrument(skip_all)]
    pub async fn submit(&self, form: EnquirySubmission) -> Result<Enquiry, AppError> {
        let (Some(name), Some(email), Some(course_interest)) = (
            present_field(form.name),
            present_field(form.email),
            present_field(form.course_interest),
        ) else {
            warn!("enquiry missing name, email or course_interest");
            return Err(AppError::Validation("Error creating enquiry".into()));
        };

        let enquiry = self
            .enquiries
            .insert(NewEnquiry {
                id: Uuid::new_v4(),
                name,
                email: normalize_email(&email),
                course_interest,
                phone: form.phone,
                message: form.message,
                source: form.source,
                submitted_at: OffsetDateTime::now_utc(),
            })
            .await?;

        info!(enquiry_id = %enquiry.id, source = ?enquiry.source, "enquiry submitted");
        Ok(enquiry)
    }
}

/// Moves enquiries from the unclaimed queue to a counselor's book.
#[derive(Clone)]
pub struct ClaimWorkflow {
    enquiries: Arc<dyn EnquiryRepository>,
}

impl FromRef<AppState> for ClaimWorkflow {
    fn from_ref(state: &AppState) -> Self {
        ClaimWorkflow::new(state.enquiries.clone())
    }
}

impl ClaimWorkflow {
    pub fn new(enquiries: Arc<dyn EnquiryRepository>) -> Self {
        Self { enquiries }
    }

    /// Checks run in a fixed order: existence, already claimed, role.
    /// The final write is conditional on the row still being unclaimed, so of
    /// two racing counselors the second one gets `AlreadyClaimed`.
    #[instrument(skip(self), fields(user_id = %actor.user_id, role = %actor.role))]
    pub async fn claim(&self, enquiry_id: Uuid, actor: AuthUser) -> Result<Enquiry, AppError> {
        let enquiry = self
            .enquiries
            .find_by_id(enquiry_id)
            .await?
            .ok_or(AppError::NotFound("Enquiry"))?;

        if enquiry.is_claimed() {
            warn!(claimed_by = ?enquiry.claimed_by, "enquiry already claimed");
            return Err(AppError::AlreadyClaimed);
        }

        if !actor.role.can_claim() {
            warn!("role not allowed to claim");
            return Err(AppError::Forbidden);
        }

        let claimed = self
            .enquiries
            .claim_if_unclaimed(enquiry_id, actor.user_id, OffsetDateTime::now_utc())
            .await?
            .ok_or_else(|| {
                warn!("lost claim race");
                AppError::AlreadyClaimed
            })?;

        info!(enquiry_id = %claimed.id, "enquiry claimed");
        Ok(claimed)
    }

    pub async fn list_unclaimed(&self, _actor: AuthUser) -> Result<Vec<Enquiry>, AppError> {
        self.enquiries.list_unclaimed().await
    }

    pub async fn list_claimed_by(&self, actor: AuthUser) -> Result<Vec<Enquiry>, AppError> {
        self.enquiries.list_claimed_by(actor.user_id).await
    }
}
