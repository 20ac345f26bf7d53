use serde::Deserialize;

use crate::enquiries::services::EnquirySubmission;

/// Public enquiry form body. Required fields are optional here so a missing
/// one becomes a validation error instead of a deserialization failure.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateEnquiryRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub course_interest: Option<String>,
    pub phone: Option<String>,
    pub message: Option<String>,
    pub source: Option<String>,
}

impl From<CreateEnquiryRequest> for EnquirySubmission {
    fn from(req: CreateEnquiryRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            course_interest: req.course_interest,
            phone: req.phone,
            message: req.message,
            source: req.source,
        }
    }
}
