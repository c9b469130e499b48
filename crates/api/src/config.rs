use std::fmt::Display;
use std::str::FromStr;

use axum::http::HeaderValue;

use crate::auth::jwt::JwtConfig;

/// Errors raised while loading configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value '{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Server configuration loaded from environment variables.
///
/// All fields except `DATABASE_URL` and `JWT_SECRET` have defaults suitable
/// for local development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// PostgreSQL connection string.
    pub database_url: String,
    /// How often expired revocation entries are purged, in seconds (default: `60`).
    pub revocation_sweep_secs: u64,
    /// JWT signing configuration (secret, token lifetime).
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                 |
    /// |-------------------------|-------------------------|
    /// | `HOST`                  | `0.0.0.0`               |
    /// | `PORT`                  | `3000`                  |
    /// | `CORS_ORIGINS`          | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                    |
    /// | `DATABASE_URL`          | required                |
    /// | `REVOCATION_SWEEP_SECS` | `60`                    |
    ///
    /// JWT variables are documented on [`JwtConfig::from_env`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port: u16 = env_or("PORT", 3000)?;

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        for origin in &cors_origins {
            HeaderValue::from_str(origin).map_err(|e| ConfigError::Invalid {
                key: "CORS_ORIGINS",
                value: origin.clone(),
                reason: e.to_string(),
            })?;
        }

        let request_timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", 30)?;
        let database_url = required("DATABASE_URL")?;
        let revocation_sweep_secs: u64 = env_or("REVOCATION_SWEEP_SECS", 60)?;
        if revocation_sweep_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "REVOCATION_SWEEP_SECS",
                value: "0".into(),
                reason: "must be greater than zero".into(),
            });
        }

        let jwt = JwtConfig::from_env()?;

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            database_url,
            revocation_sweep_secs,
            jwt,
        })
    }
}

/// Read a variable that has no default. Empty values count as missing.
pub(crate) fn required(key: &'static str) -> Result<String, ConfigError> {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(key)),
    }
}

/// Parse a variable, falling back to `default` when it is unset.
pub(crate) fn env_or<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            value: raw.clone(),
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    // Each test uses its own variable name so parallel tests never race.

    #[test]
    fn test_env_or_uses_default_when_unset() {
        let value: u16 = env_or("TOLLGATE_TEST_UNSET_PORT", 3000).unwrap();
        assert_eq!(value, 3000);
    }

    #[test]
    fn test_env_or_parses_value() {
        std::env::set_var("TOLLGATE_TEST_TIMEOUT", " 45 ");
        let value: u64 = env_or("TOLLGATE_TEST_TIMEOUT", 30).unwrap();
        assert_eq!(value, 45);
    }

    #[test]
    fn test_env_or_rejects_garbage() {
        std::env::set_var("TOLLGATE_TEST_BAD_PORT", "eighty");
        let result: Result<u16, _> = env_or("TOLLGATE_TEST_BAD_PORT", 3000);
        assert_matches!(
            result,
            Err(ConfigError::Invalid { key: "TOLLGATE_TEST_BAD_PORT", .. })
        );
    }

    #[test]
    fn test_required_treats_empty_as_missing() {
        std::env::set_var("TOLLGATE_TEST_EMPTY_SECRET", "  ");
        assert_matches!(
            required("TOLLGATE_TEST_EMPTY_SECRET"),
            Err(ConfigError::Missing("TOLLGATE_TEST_EMPTY_SECRET"))
        );
    }
}
