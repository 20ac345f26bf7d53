use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::enquiries::repo::EnquiryRepository;
use crate::enquiries::repo_types::{Enquiry, NewEnquiry};
use crate::error::AppError;

/// Process-local enquiry store; keeps insertion order.
#[derive(Default)]
pub struct MemoryEnquiryRepository {
    enquiries: Mutex<Vec<Enquiry>>,
}

impl MemoryEnquiryRepository {
    fn lock(&self) -> Result<MutexGuard<'_, Vec<Enquiry>>, AppError> {
        self.enquiries
            .lock()
            .map_err(|_| AppError::Internal(anyhow::anyhow!("enquiry store poisoned")))
    }
}

#[async_trait]
impl EnquiryRepository for MemoryEnquiryRepository {
    async fn insert(&self, enquiry: NewEnquiry) -> Result<Enquiry, AppError> {
        let enquiry = Enquiry::from(enquiry);
        self.lock()?.push(enquiry.clone());
        Ok(enquiry)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Enquiry>, AppError> {
        Ok(self.lock()?.iter().find(|e| e.id == id).cloned())
    }

    async fn claim_if_unclaimed(
        &self,
        id: Uuid,
        counselor_id: Uuid,
        assigned_at: OffsetDateTime,
    ) -> Result<Option<Enquiry>, AppError> {
        let mut enquiries = self.lock()?;
        let Some(enquiry) = enquiries
            .iter_mut()
            .find(|e| e.id == id && e.claimed_by.is_none())
        else {
            return Ok(None);
        };
        enquiry.claimed_by = Some(counselor_id);
        enquiry.assigned_at = Some(assigned_at);
        Ok(Some(enquiry.clone()))
    }

    async fn list_unclaimed(&self) -> Result<Vec<Enquiry>, AppError> {
        Ok(self
            .lock()?
            .iter()
            .filter(|e| e.claimed_by.is_none())
            .cloned()
            .collect())
    }

    async fn list_claimed_by(&self, counselor_id: Uuid) -> Result<Vec<Enquiry>, AppError> {
        Ok(self
            .lock()?
            .iter()
            .filter(|e| e.claimed_by == Some(counselor_id))
            .cloned()
            .collect())
    }
}
