use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Form body of `POST /token` (OAuth2 password-flow shape).
#[derive(Deserialize, Debug, ToSchema)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}
