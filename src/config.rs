use std::env;

use jsonwebtoken::Algorithm;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub secret_key: String,
    pub algorithm: Algorithm,
    pub access_token_expire_minutes: i64,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let secret_key = env::var("SECRET_KEY")?;
        let algorithm = match env::var("ALGORITHM") {
            Ok(name) => name
                .parse::<Algorithm>()
                .map_err(|_| anyhow::anyhow!("unsupported signing algorithm: {name}"))?,
            Err(_) => Algorithm::HS256,
        };
        let access_token_expire_minutes = env::var("ACCESS_TOKEN_EXPIRE_MINUTES")
            .ok()
            .and_then(|m| m.parse::<i64>().ok())
            .unwrap_or(30);
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        Ok(Self {
            database_url,
            secret_key,
            algorithm,
            access_token_expire_minutes,
            host,
            port,
        })
    }
}
