//! Application configuration.
//!
//! Values come from the process environment, with a local `.env` file
//! filling in whatever the environment leaves unset. `Stripe:SecretKey` and
//! `Stripe:PublishableKey` map to `STRIPE_SECRET_KEY` and
//! `STRIPE_PUBLISHABLE_KEY`; startup refuses to continue without them.

use std::{env, net::SocketAddr, path::PathBuf};

use secrecy::SecretString;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(&'static str, String),
    #[error("Stripe keys are missing: {0} must be set and non-empty")]
    MissingStripeKey(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

#[derive(Debug, Clone)]
pub struct StripeConfig {
    pub secret_key: SecretString,
    pub publishable_key: String,
    pub api_base: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub base_url: String,
    pub web_root: PathBuf,
    pub jwt_secret: String,
    pub admin_email: String,
    pub admin_password: String,
    pub stripe: StripeConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let stripe_secret =
            get("STRIPE_SECRET_KEY").ok_or(ConfigError::MissingStripeKey("STRIPE_SECRET_KEY"))?;
        let stripe_publishable = get("STRIPE_PUBLISHABLE_KEY")
            .ok_or(ConfigError::MissingStripeKey("STRIPE_PUBLISHABLE_KEY"))?;

        let database_url = get("DATABASE_URL").ok_or(ConfigError::MissingEnvVar("DATABASE_URL"))?;
        let jwt_secret = get("JWT_SECRET").ok_or(ConfigError::MissingEnvVar("JWT_SECRET"))?;

        let host = get("APP_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = match get("APP_PORT") {
            Some(p) => p
                .parse::<u16>()
                .map_err(|e| ConfigError::InvalidEnvVar("APP_PORT", e.to_string()))?,
            None => 3000,
        };
        let environment = match get("APP_ENV").as_deref() {
            None => Environment::Production,
            Some(v) if v.eq_ignore_ascii_case("development") => Environment::Development,
            Some(v) if v.eq_ignore_ascii_case("production") => Environment::Production,
            Some(other) => {
                return Err(ConfigError::InvalidEnvVar("APP_ENV", other.to_string()));
            }
        };
        let base_url = get("APP_BASE_URL")
            .unwrap_or_else(|| format!("http://{host}:{port}"))
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            database_url,
            environment,
            base_url,
            web_root: get("WEB_ROOT").unwrap_or_else(|| "wwwroot".into()).into(),
            jwt_secret,
            admin_email: get("ADMIN_EMAIL").unwrap_or_else(|| "admin@bulkybook.local".into()),
            admin_password: get("ADMIN_PASSWORD").unwrap_or_else(|| "Admin123*".into()),
            stripe: StripeConfig {
                secret_key: SecretString::from(stripe_secret),
                publishable_key: stripe_publishable,
                api_base: get("STRIPE_API_BASE")
                    .unwrap_or_else(|| "https://api.stripe.com".into())
                    .trim_end_matches('/')
                    .to_string(),
            },
            host,
            port,
        })
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(SocketAddr::from((
            self.host.parse::<std::net::IpAddr>()?,
            self.port,
        )))
    }
}
