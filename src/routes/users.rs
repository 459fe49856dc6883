use axum::{Json, Router, extract::State, http::StatusCode, routing::{get, post}};

use crate::{
    dto::users::RegisterRequest,
    error::AppResult,
    middleware::auth::AuthUser,
    models::User,
    response::ApiResponse,
    services::user_service::register_user,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users/", post(register))
        .route("/users/me/", get(me))
}

#[utoipa::path(
    post,
    path = "/users/",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Register user", body = ApiResponse<User>),
        (status = 409, description = "Username or email already registered")
    ),
    tag = "Users"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<User>>)> {
    let resp = register_user(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/users/me/",
    responses(
        (status = 200, description = "Current user", body = ApiResponse<User>),
        (status = 401, description = "Unauthenticated")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn me(user: AuthUser) -> Json<ApiResponse<User>> {
    Json(ApiResponse::success("Ok", user.user, None))
}
