use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

#[derive(Debug, Deserialize, Serialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Stateless signed-token codec. Built once at startup from `SECRET_KEY`,
/// `ALGORITHM` and `ACCESS_TOKEN_EXPIRE_MINUTES`; rotating the key
/// invalidates every outstanding token.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    header: Header,
    validation: Validation,
    expire_minutes: i64,
}

impl TokenCodec {
    pub fn new(secret: &str, algorithm: Algorithm, expire_minutes: i64) -> Self {
        let mut validation = Validation::new(algorithm);
        // Expiry is checked strictly against wall-clock time, no skew allowance.
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            header: Header::new(algorithm),
            validation,
            expire_minutes,
        }
    }

    /// Issue a token for `subject`, expiring `ACCESS_TOKEN_EXPIRE_MINUTES`
    /// from now.
    pub fn issue(&self, subject: &str) -> AppResult<String> {
        let now = Utc::now();
        let expires_at = now + Duration::minutes(self.expire_minutes);
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&self.header, &claims, &self.encoding)
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
    }

    /// Verify a token and return its subject. Malformed tokens, bad
    /// signatures and expired claims all collapse into `InvalidToken`.
    pub fn verify(&self, token: &str) -> AppResult<String> {
        let decoded = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|_| AppError::InvalidToken)?;
        Ok(decoded.claims.sub)
    }
}
