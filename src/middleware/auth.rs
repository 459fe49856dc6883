use axum::{
    extract::{FromRef, FromRequestParts},
    http::header,
};
use chrono::Utc;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::{
    entity::users::{Column as UserCol, Entity as Users},
    error::AppError,
    models::User,
    state::AppState,
};

/// The authenticated caller, resolved once per request from the bearer
/// token. Read-only: extraction never mutates state.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub user: User,
}

/// Pull the token out of an `Authorization` header value. Strips the scheme
/// prefix exactly once so a token that itself starts with "Bearer " survives.
fn bearer_token(header: &str) -> Option<&str> {
    header.strip_prefix("Bearer ").map(str::trim)
}

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;
    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or(AppError::InvalidToken)?;

        let auth_str = auth_header.to_str().map_err(|_| AppError::InvalidToken)?;
        let token = bearer_token(auth_str).ok_or(AppError::InvalidToken)?;

        let username = state.tokens.verify(token)?;

        let user = Users::find()
            .filter(UserCol::Username.eq(username.as_str()))
            .one(&state.orm)
            .await?
            .ok_or(AppError::UserNotFound)?;

        // A token issued before the account was deactivated is no longer valid.
        if !user.is_active {
            return Err(AppError::UserNotFound);
        }

        Ok(AuthUser {
            user_id: user.id,
            user: User {
                id: user.id,
                username: user.username,
                email: user.email,
                full_name: user.full_name,
                is_active: user.is_active,
                created_at: user.created_at.with_timezone(&Utc),
            },
        })
    }
}
