//! JWT issuance and verification.
//!
//! Tokens are HS256-signed JWTs containing a [`Claims`] payload. The MAC covers
//! the header and the whole claims payload, so any field-level tampering fails
//! signature verification.

use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tollgate_core::types::DbId;

use crate::config::{env_or, required, ConfigError};

/// Default token lifetime in hours.
const DEFAULT_EXPIRY_HOURS: i64 = 24;

/// Longest accepted token lifetime: one year.
const MAX_EXPIRY_HOURS: i64 = 24 * 365;

/// JWT claims embedded in every token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject -- the user's internal database id.
    pub sub: DbId,
    /// The user's email at issue time.
    pub email: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
}

impl Claims {
    /// Time left before `exp`, measured from `now` at full precision.
    ///
    /// Never longer than the token's real remaining validity, so a revocation
    /// entry sized with it cannot outlive the token. Returns `None` once the
    /// token has expired.
    pub fn remaining_ttl(&self, now: DateTime<Utc>) -> Option<Duration> {
        let expires_at = DateTime::from_timestamp(self.exp, 0)?;
        (expires_at - now)
            .to_std()
            .ok()
            .filter(|ttl| !ttl.is_zero())
    }
}

/// Why a token was refused.
///
/// Callers report every variant as "unauthenticated"; the distinction exists
/// for logs only.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("token is malformed: {0}")]
    Malformed(String),

    /// Encoding failed while issuing. Unexpected; surfaces as a 500.
    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => Self::InvalidSignature,
            ErrorKind::ExpiredSignature => Self::Expired,
            _ => Self::Malformed(err.to_string()),
        }
    }
}

/// Configuration for JWT token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Token lifetime in hours (default: 24).
    pub expiry_hours: i64,
}

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var            | Required | Default |
    /// |--------------------|----------|---------|
    /// | `JWT_SECRET`       | **yes**  | --      |
    /// | `JWT_EXPIRY_HOURS` | no       | `24`    |
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret = required("JWT_SECRET")?;
        let expiry_hours: i64 = env_or("JWT_EXPIRY_HOURS", DEFAULT_EXPIRY_HOURS)?;
        let expiry_hours = check_expiry_hours(expiry_hours)?;

        Ok(Self {
            secret,
            expiry_hours,
        })
    }
}

/// Keep the lifetime in a range where `exp` arithmetic cannot overflow.
fn check_expiry_hours(hours: i64) -> Result<i64, ConfigError> {
    if (1..=MAX_EXPIRY_HOURS).contains(&hours) {
        return Ok(hours);
    }
    Err(ConfigError::Invalid {
        key: "JWT_EXPIRY_HOURS",
        value: hours.to_string(),
        reason: format!("must be between 1 and {MAX_EXPIRY_HOURS}"),
    })
}

/// Issues and verifies tokens with one process-wide secret.
///
/// Rotating the secret (building a new issuer) invalidates every token signed
/// with the old one.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    validity: chrono::Duration,
}

impl TokenIssuer {
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is exact: a token is dead from its `exp` second onwards.
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            validity: chrono::Duration::hours(config.expiry_hours),
        }
    }

    /// Lifetime of newly issued tokens.
    pub fn validity(&self) -> chrono::Duration {
        self.validity
    }

    /// Issue a token for the given user, valid from now.
    pub fn issue(&self, user_id: DbId, email: &str) -> Result<String, TokenError> {
        self.issue_at(user_id, email, Utc::now())
    }

    /// Issue a token as if it had been created at `issued_at`.
    pub(crate) fn issue_at(
        &self,
        user_id: DbId,
        email: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            exp: (issued_at + self.validity).timestamp(),
            iat: issued_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Check signature and expiry, returning the embedded [`Claims`].
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)?.claims;

        // jsonwebtoken accepts `exp == now`; treat that second as expired too.
        if claims.exp <= Utc::now().timestamp() {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn test_config(secret: &str) -> JwtConfig {
        JwtConfig {
            secret: secret.to_string(),
            expiry_hours: 24,
        }
    }

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(&test_config("test-secret-that-is-long-enough-for-hmac"))
    }

    #[test]
    fn test_issue_and_verify() {
        let issuer = issuer();
        let token = issuer.issue(42, "a@x.com").expect("token generation should succeed");

        let claims = issuer.verify(&token).expect("token validation should succeed");
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn test_expired_token_fails() {
        let issuer = issuer();
        let issued_at = Utc::now() - chrono::Duration::hours(25);
        let token = issuer.issue_at(1, "a@x.com", issued_at).unwrap();

        assert_matches!(issuer.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_token_expiring_now_is_expired() {
        let issuer = issuer();
        let issued_at = Utc::now() - issuer.validity();
        let token = issuer.issue_at(1, "a@x.com", issued_at).unwrap();

        assert_matches!(issuer.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_different_secrets_fail() {
        let issuer_a = TokenIssuer::new(&test_config("secret-alpha"));
        let issuer_b = TokenIssuer::new(&test_config("secret-bravo"));

        let token = issuer_a.issue(1, "a@x.com").unwrap();
        assert_matches!(issuer_b.verify(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_tampered_claims_fail() {
        let issuer = issuer();
        let genuine = issuer.issue(1, "a@x.com").unwrap();
        // Same shape, different subject, signed by someone else.
        let forged = TokenIssuer::new(&test_config("attacker"))
            .issue(2, "a@x.com")
            .unwrap();

        let genuine_parts: Vec<&str> = genuine.split('.').collect();
        let forged_parts: Vec<&str> = forged.split('.').collect();
        let spliced = format!(
            "{}.{}.{}",
            genuine_parts[0], forged_parts[1], genuine_parts[2]
        );

        assert_matches!(issuer.verify(&spliced), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_malformed_token_fails() {
        let issuer = issuer();
        assert_matches!(issuer.verify("garbage"), Err(TokenError::Malformed(_)));
        assert_matches!(issuer.verify(""), Err(TokenError::Malformed(_)));
        assert_matches!(issuer.verify("a.b.c"), Err(TokenError::Malformed(_)));
    }

    #[test]
    fn test_remaining_ttl() {
        let claims = Claims {
            sub: 1,
            email: "a@x.com".into(),
            exp: 1_000,
            iat: 0,
        };
        let at = |secs: i64, millis: u32| {
            DateTime::from_timestamp(secs, millis * 1_000_000).unwrap()
        };

        assert_eq!(claims.remaining_ttl(at(400, 0)), Some(Duration::from_secs(600)));
        assert_eq!(claims.remaining_ttl(at(1_000, 0)), None);
        assert_eq!(claims.remaining_ttl(at(2_000, 0)), None);
        assert_eq!(claims.remaining_ttl(at(999, 999)), Some(Duration::from_millis(1)));
    }

    /// Partway through a second the TTL must not round up past `exp`.
    #[test]
    fn test_remaining_ttl_never_outlives_token() {
        let claims = Claims {
            sub: 1,
            email: "a@x.com".into(),
            exp: 1_000,
            iat: 0,
        };
        for millis in [1, 300, 500, 700, 999] {
            let now = DateTime::from_timestamp(400, millis * 1_000_000).unwrap();
            let ttl = claims.remaining_ttl(now).unwrap();
            let until_exp = claims.exp * 1_000 - now.timestamp_millis();

            assert!(
                ttl.as_millis() <= u128::from(until_exp.unsigned_abs()),
                "ttl {ttl:?} exceeds {until_exp} ms left at {millis} ms"
            );
            assert_eq!(ttl, Duration::from_millis(600_000 - u64::from(millis)));
        }
    }

    #[test]
    fn test_expiry_hours_bounds() {
        assert_eq!(check_expiry_hours(1).unwrap(), 1);
        assert_eq!(check_expiry_hours(MAX_EXPIRY_HOURS).unwrap(), MAX_EXPIRY_HOURS);
        for bad in [0, -5, MAX_EXPIRY_HOURS + 1, i64::MAX] {
            assert_matches!(
                check_expiry_hours(bad),
                Err(ConfigError::Invalid { key: "JWT_EXPIRY_HOURS", .. })
            );
        }
    }
}
