use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// A prospective student's submitted interest.
///
/// `claimed_by` and `assigned_at` are written together by a single claim and
/// never cleared afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Enquiry {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub course_interest: String,
    pub phone: Option<String>,
    pub message: Option<String>,
    pub source: Option<String>, // e.g. website, brochure, referral
    #[serde(with = "time::serde::rfc3339")]
    pub submitted_at: OffsetDateTime,
    pub claimed_by: Option<Uuid>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub assigned_at: Option<OffsetDateTime>,
}

impl Enquiry {
    pub fn is_claimed(&self) -> bool {
        self.claimed_by.is_some()
    }
}

/// Fields captured by the public form, already trimmed and normalized.
#[derive(Debug, Clone)]
pub struct NewEnquiry {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub course_interest: String,
    pub phone: Option<String>,
    pub message: Option<String>,
    pub source: Option<String>,
    pub submitted_at: OffsetDateTime,
}

impl From<NewEnquiry> for Enquiry {
    fn from(new: NewEnquiry) -> Self {
        Self {
            id: new.id,
            name: new.name,
            email: new.email,
            course_interest: new.course_interest,
            phone: new.phone,
            message: new.message,
            source: new.source,
            submitted_at: new.submitted_at,
            claimed_by: None,
            assigned_at: None,
        }
    }
}
