use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::AuthUser,
    error::{AppError, AppJson},
    state::AppState,
    users::{
        dto::{AuthResponse, LoginRequest, PublicUser, RegisterRequest},
        repo_types::Role,
        services::{present, required, UserDirectory},
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/register", post(register))
        .route("/users/login", post(login))
        .route("/users/me", get(get_me))
}

#[instrument(skip(directory, payload))]
pub async fn register(
    State(directory): State<UserDirectory>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let email = required(payload.email.as_deref(), "email")?;
    let password = present(payload.password.as_deref(), "password")?;
    let role: Role = required(payload.role.as_deref(), "role")?
        .parse()
        .map_err(|_| AppError::Validation("Invalid role".into()))?;

    let (user, token) = directory.register(email, password, role).await?;
    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

#[instrument(skip(directory, payload))]
pub async fn login(
    State(directory): State<UserDirectory>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let email = required(payload.email.as_deref(), "email")?;
    let password = present(payload.password.as_deref(), "password")?;

    let (user, token) = directory.authenticate(email, password).await?;
    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

#[instrument(skip(directory))]
pub async fn get_me(
    State(directory): State<UserDirectory>,
    identity: AuthUser,
) -> Result<Json<PublicUser>, AppError> {
    let user = directory.current_user(identity).await?;
    Ok(Json(user.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::FromRef;

    fn directory() -> UserDirectory {
        UserDirectory::from_ref(&AppState::fake())
    }

    #[tokio::test]
    async fn register_requires_every_field() {
        let err = register(
            State(directory()),
            AppJson(RegisterRequest {
                email: Some("a@x.com".into()),
                password: Some("p".into()),
                role: None,
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "role is required");
    }

    #[tokio::test]
    async fn register_rejects_unknown_role() {
        let err = register(
            State(directory()),
            AppJson(RegisterRequest {
                email: Some("a@x.com".into()),
                password: Some("p".into()),
                role: Some("principal".into()),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn login_with_blank_password_is_validation_error() {
        let err = login(
            State(directory()),
            AppJson(LoginRequest {
                email: Some("a@x.com".into()),
                password: Some("".into()),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn auth_response_serialization() {
        let response = AuthResponse {
            token: "t".into(),
            user: PublicUser {
                id: uuid::Uuid::new_v4(),
                email: "test@example.com".to_string(),
                role: Role::Counselor,
            },
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["token"], "t");
        assert_eq!(json["user"]["email"], "test@example.com");
        assert_eq!(json["user"]["role"], "counselor");
        assert!(json["user"].get("password_hash").is_none());
    }
}
