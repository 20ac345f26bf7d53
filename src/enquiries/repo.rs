use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::enquiries::repo_types::{Enquiry, NewEnquiry};
use crate::error::AppError;

/// Storage seam for enquiries.
#[async_trait]
pub trait EnquiryRepository: Send + Sync {
    async fn insert(&self, enquiry: NewEnquiry) -> Result<Enquiry, AppError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Enquiry>, AppError>;
    /// Sets `claimed_by`/`assigned_at` only if the enquiry is still unclaimed.
    /// Returns `None` when nothing matched (missing, or someone got there first).
    async fn claim_if_unclaimed(
        &self,
        id: Uuid,
        counselor_id: Uuid,
        assigned_at: OffsetDateTime,
    ) -> Result<Option<Enquiry>, AppError>;
    async fn list_unclaimed(&self) -> Result<Vec<Enquiry>, AppError>;
    async fn list_claimed_by(&self, counselor_id: Uuid) -> Result<Vec<Enquiry>, AppError>;
}

#[derive(Clone)]
pub struct PgEnquiryRepository {
    db: PgPool,
}

impl PgEnquiryRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EnquiryRepository for PgEnquiryRepository {
    async fn insert(&self, enquiry: NewEnquiry) -> Result<Enquiry, AppError> {
        let row = sqlx::query_as::<_, Enquiry>(
            r#"
            INSERT INTO enquiries
                (id, name, email, course_interest, phone, message, source, submitted_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, name, email, course_interest, phone, message, source,
                      submitted_at, claimed_by, assigned_at
            "#,
        )
        .bind(enquiry.id)
        .bind(&enquiry.name)
        .bind(&enquiry.email)
        .bind(&enquiry.course_interest)
        .bind(&enquiry.phone)
        .bind(&enquiry.message)
        .bind(&enquiry.source)
        .bind(enquiry.submitted_at)
        .fetch_one(&self.db)
        .await
        .context("insert enquiry")?;
        Ok(row)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Enquiry>, AppError> {
        let row = sqlx::query_as::<_, Enquiry>(
            r#"
            SELECT id, name, email, course_interest, phone, message, source,
                   submitted_at, claimed_by, assigned_at
            FROM enquiries
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find enquiry by id")?;
        Ok(row)
    }

    async fn claim_if_unclaimed(
        &self,
        id: Uuid,
        counselor_id: Uuid,
        assigned_at: OffsetDateTime,
    ) -> Result<Option<Enquiry>, AppError> {
        let row = sqlx::query_as::<_, Enquiry>(
            r#"
            UPDATE enquiries
               SET claimed_by = $2, assigned_at = $3
             WHERE id = $1 AND claimed_by IS NULL
            RETURNING id, name, email, course_interest, phone, message, source,
                      submitted_at, claimed_by, assigned_at
            "#,
        )
        .bind(id)
        .bind(counselor_id)
        .bind(assigned_at)
        .fetch_optional(&self.db)
        .await
        .context("claim enquiry")?;
        Ok(row)
    }

    async fn list_unclaimed(&self) -> Result<Vec<Enquiry>, AppError> {
        let rows = sqlx::query_as::<_, Enquiry>(
            r#"
            SELECT id, name, email, course_interest, phone, message, source,
                   submitted_at, claimed_by, assigned_at
            FROM enquiries
            WHERE claimed_by IS NULL
            ORDER BY submitted_at, id
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list unclaimed enquiries")?;
        Ok(rows)
    }

    async fn list_claimed_by(&self, counselor_id: Uuid) -> Result<Vec<Enquiry>, AppError> {
        let rows = sqlx::query_as::<_, Enquiry>(
            r#"
            SELECT id, name, email, course_interest, phone, message, source,
                   submitted_at, claimed_by, assigned_at
            FROM enquiries
            WHERE claimed_by = $1
            ORDER BY submitted_at, id
            "#,
        )
        .bind(counselor_id)
        .fetch_all(&self.db)
        .await
        .context("list claimed enquiries")?;
        Ok(rows)
    }
}
