use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    enquiries::{
        dto::CreateEnquiryRequest,
        repo_types::Enquiry,
        services::{ClaimWorkflow, EnquiryIntake},
    },
    error::{AppError, AppJson},
    state::AppState,
};

pub fn enquiry_routes() -> Router<AppState> {
    Router::new()
        .route("/enquiries", post(create_enquiry))
        .route("/enquiries/unclaimed", get(list_unclaimed))
        .route("/enquiries/claimed", get(list_claimed))
        .route("/enquiries/:id/claim", put(claim_enquiry))
}

#[instrument(skip(intake, payload))]
pub async fn create_enquiry(
    State(intake): State<EnquiryIntake>,
    payload: Result<AppJson<CreateEnquiryRequest>, AppError>,
) -> Result<Json<Enquiry>, AppError> {
    // The public form only ever sees the one documented message; the
    // deserializer's detail stays in the log.
    let AppJson(payload) = payload.map_err(|e| {
        warn!(error = %e, "malformed enquiry body");
        AppError::Validation("Error creating enquiry".into())
    })?;
    let enquiry = intake.submit(payload.into()).await?;
    Ok(Json(enquiry))
}

#[instrument(skip(workflow))]
pub async fn claim_enquiry(
    State(workflow): State<ClaimWorkflow>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Enquiry>, AppError> {
    // An id that can't exist is reported like any other missing enquiry.
    let id = Uuid::parse_str(&id).map_err(|_| AppError::NotFound("Enquiry"))?;
    let enquiry = workflow.claim(id, user).await?;
    Ok(Json(enquiry))
}

#[instrument(skip(workflow))]
pub async fn list_unclaimed(
    State(workflow): State<ClaimWorkflow>,
    user: AuthUser,
) -> Result<Json<Vec<Enquiry>>, AppError> {
    Ok(Json(workflow.list_unclaimed(user).await?))
}

#[instrument(skip(workflow))]
pub async fn list_claimed(
    State(workflow): State<ClaimWorkflow>,
    user: AuthUser,
) -> Result<Json<Vec<Enquiry>>, AppError> {
    Ok(Json(workflow.list_claimed_by(user).await?))
}
