use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use chrono::Duration;
use sgi_core::AppError;
use sgi_infrastructure::{JwtSettings, MIN_TOKEN_SECRET_LENGTH};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub database_url: String,
    pub db_max_connections: u32,
    pub api_host: String,
    pub api_port: u16,
    pub jwt_secret: String,
    pub refresh_secret: String,
    pub access_token_ttl_minutes: i64,
    pub refresh_token_ttl_hours: i64,
    pub cors_allowed_origin: Option<String>,
    pub bootstrap_token: Option<String>,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

        let database_url = required_non_empty_env("DATABASE_URL")?;
        let jwt_secret = required_secret("JWT_SECRET")?;
        let refresh_secret = required_secret("REFRESH_SECRET")?;

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = parsed_env("API_PORT", 8080)?;
        let db_max_connections = parsed_env("DB_MAX_CONNECTIONS", 10)?;
        let access_token_ttl_minutes = positive_env("ACCESS_TOKEN_TTL_MINUTES", 15)?;
        let refresh_token_ttl_hours = positive_env("REFRESH_TOKEN_TTL_HOURS", 168)?;

        Ok(Self {
            migrate_only,
            database_url,
            db_max_connections,
            api_host,
            api_port,
            jwt_secret,
            refresh_secret,
            access_token_ttl_minutes,
            refresh_token_ttl_hours,
            cors_allowed_origin: optional_env("CORS_ALLOWED_ORIGIN"),
            bootstrap_token: optional_env("AUTH_BOOTSTRAP_TOKEN"),
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }

    pub fn jwt_settings(&self) -> JwtSettings {
        JwtSettings {
            access_secret: self.jwt_secret.clone(),
            refresh_secret: self.refresh_secret.clone(),
            access_ttl: Duration::minutes(self.access_token_ttl_minutes),
            refresh_ttl: Duration::hours(self.refresh_token_ttl_hours),
        }
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn required_non_empty_env(name: &str) -> Result<String, AppError> {
    let value = required_env(name)?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}

fn required_secret(name: &str) -> Result<String, AppError> {
    let value = required_env(name)?;
    if value.len() < MIN_TOKEN_SECRET_LENGTH {
        return Err(AppError::Validation(format!(
            "{name} must be at least {MIN_TOKEN_SECRET_LENGTH} characters"
        )));
    }

    Ok(value)
}

fn optional_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn parsed_env<T>(name: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match optional_env(name) {
        Some(value) => value
            .parse::<T>()
            .map_err(|error| AppError::Validation(format!("invalid {name}: {error}"))),
        None => Ok(default),
    }
}

fn positive_env(name: &str, default: i64) -> Result<i64, AppError> {
    let value = parsed_env(name, default)?;
    if value <= 0 {
        return Err(AppError::Validation(format!("{name} must be positive")));
    }

    Ok(value)
}
