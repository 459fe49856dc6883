use axum::{Form, Json, Router, extract::State, routing::post};

use crate::{
    dto::auth::{TokenRequest, TokenResponse},
    error::AppResult,
    services::auth_service::login_user,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/token", post(token))
}

#[utoipa::path(
    post,
    path = "/token",
    request_body(content = TokenRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Issue access token", body = TokenResponse),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
pub async fn token(
    State(state): State<AppState>,
    Form(payload): Form<TokenRequest>,
) -> AppResult<Json<TokenResponse>> {
    let resp = login_user(&state, payload).await?;
    Ok(Json(resp))
}
