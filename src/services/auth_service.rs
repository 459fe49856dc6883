use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordVerifier},
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use crate::{
    audit::log_audit,
    dto::auth::{TokenRequest, TokenResponse},
    entity::users::{Column as UserCol, Entity as Users},
    error::{AppError, AppResult},
    state::AppState,
};

/// Verify a username/password pair and issue a bearer token. Unknown
/// usernames, wrong passwords and deactivated accounts are indistinguishable
/// to the caller.
pub async fn login_user(state: &AppState, payload: TokenRequest) -> AppResult<TokenResponse> {
    let TokenRequest { username, password } = payload;

    let user = Users::find()
        .filter(UserCol::Username.eq(username.as_str()))
        .one(&state.orm)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;

    let argon2 = Argon2::default();
    if argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(AppError::InvalidCredentials);
    }

    if !user.is_active {
        return Err(AppError::InvalidCredentials);
    }

    let access_token = state.tokens.issue(&user.username)?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.id),
        "user_login",
        Some("users"),
        Some(serde_json::json!({ "user_id": user.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    })
}
