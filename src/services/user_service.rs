use argon2::{
    Argon2, PasswordHasher,
    password_hash::SaltString,
};
use chrono::Utc;
use password_hash::rand_core::OsRng;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, SqlErr};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::users::RegisterRequest,
    entity::users::{ActiveModel as UserActive, Column as UserCol, Entity as Users, Model as UserModel},
    error::{AppError, AppResult},
    models::User,
    response::ApiResponse,
    state::AppState,
};

pub async fn register_user(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<User>> {
    let RegisterRequest {
        username,
        email,
        password,
        full_name,
    } = payload;

    if username.trim().is_empty() {
        return Err(AppError::Validation("username must not be empty".into()));
    }
    if email.trim().is_empty() || !email.contains('@') {
        return Err(AppError::Validation("email is not valid".into()));
    }
    if password.is_empty() {
        return Err(AppError::Validation("password must not be empty".into()));
    }

    // Username and email are both unique; report whichever collides.
    if let Some(existing) = Users::find()
        .filter(
            sea_orm::Condition::any()
                .add(UserCol::Username.eq(username.as_str()))
                .add(UserCol::Email.eq(email.as_str())),
        )
        .one(&state.orm)
        .await?
    {
        let field = if existing.username == username {
            "Username"
        } else {
            "Email"
        };
        return Err(AppError::DuplicateUser(field.to_string()));
    }

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();

    let inserted = UserActive {
        id: Set(Uuid::new_v4()),
        username: Set(username),
        email: Set(email),
        password_hash: Set(password_hash),
        full_name: Set(full_name),
        is_active: Set(true),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await;

    // The pre-check above races with concurrent registrations; a unique
    // violation from the insert itself is still a duplicate, not a 500.
    let user = match inserted {
        Ok(user) => user,
        Err(err) => {
            return Err(match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    AppError::DuplicateUser("Username or email".to_string())
                }
                _ => AppError::OrmError(err),
            });
        }
    };

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.id),
        "user_register",
        Some("users"),
        Some(serde_json::json!({ "user_id": user.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "User created",
        user_from_entity(user),
        None,
    ))
}

pub fn user_from_entity(model: UserModel) -> User {
    User {
        id: model.id,
        username: model.username,
        email: model.email,
        full_name: model.full_name,
        is_active: model.is_active,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
