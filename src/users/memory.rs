use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::users::repo::UserRepository;
use crate::users::repo_types::{NewUser, User};

/// Process-local user store used by [`crate::state::AppState::fake`].
#[derive(Default)]
pub struct MemoryUserRepository {
    users: Mutex<Vec<User>>,
}

impl MemoryUserRepository {
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<User>>, AppError> {
        self.users
            .lock()
            .map_err(|_| AppError::Internal(anyhow::anyhow!("user store poisoned")))
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.lock()?.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.lock()?.iter().find(|u| u.id == id).cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, AppError> {
        let mut users = self.lock()?;
        if users.iter().any(|u| u.email == user.email) {
            return Err(AppError::DuplicateEmail);
        }
        let user = User::from(user);
        users.push(user.clone());
        Ok(user)
    }
}
