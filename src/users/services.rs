use std::sync::Arc;

use axum::extract::FromRef;
use time::OffsetDateTime;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{AuthUser, JwtKeys},
    error::AppError,
    state::AppState,
    users::{
        password::{hash_password, verify_password, verify_unknown_account},
        repo::UserRepository,
        repo_types::{NewUser, Role, User},
    },
};

/// Registration, login and lookup of staff accounts.
#[derive(Clone)]
pub struct UserDirectory {
    users: Arc<dyn UserRepository>,
    keys: JwtKeys,
}

impl FromRef<AppState> for UserDirectory {
    fn from_ref(state: &AppState) -> Self {
        UserDirectory::new(state.users.clone(), JwtKeys::from_ref(state))
    }
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Returns the trimmed value, or a validation error naming the field.
pub(crate) fn required<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str, AppError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::Validation(format!("{field} is required"))),
    }
}

/// Like [`required`] but keeps the value untouched; used for secrets.
pub(crate) fn present<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str, AppError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::Validation(format!("{field} is required"))),
    }
}

impl UserDirectory {
    pub fn new(users: Arc<dyn UserRepository>, keys: JwtKeys) -> Self {
        Self { users, keys }
    }

    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<(User, String), AppError> {
        let email = normalize_email(email);

        if self.users.find_by_email(&email).await?.is_some() {
            warn!(%email, "email already registered");
            return Err(AppError::DuplicateEmail);
        }

        let password_hash = hash_password(password)?;
        let user = self
            .users
            .create(NewUser {
                id: Uuid::new_v4(),
                email,
                password_hash,
                role,
                created_at: OffsetDateTime::now_utc(),
            })
            .await?;

        let token = self.keys.sign(user.id, user.role)?;
        info!(user_id = %user.id, email = %user.email, role = %user.role, "user registered");
        Ok((user, token))
    }

    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<(User, String), AppError> {
        let email = normalize_email(email);

        let Some(user) = self.users.find_by_email(&email).await? else {
            verify_unknown_account(password)?;
            warn!(%email, "login unknown email");
            return Err(AppError::InvalidCredentials);
        };

        if !verify_password(password, &user.password_hash)? {
            warn!(%email, user_id = %user.id, "login invalid password");
            return Err(AppError::InvalidCredentials);
        }

        let token = self.keys.sign(user.id, user.role)?;
        info!(user_id = %user.id, "user logged in");
        Ok((user, token))
    }

    pub async fn current_user(&self, identity: AuthUser) -> Result<User, AppError> {
        self.users
            .find_by_id(identity.user_id)
            .await?
            .ok_or(AppError::NotFound("User"))
    }
}
