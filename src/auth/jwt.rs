use std::time::Duration;

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use crate::auth::claims::Claims;
use crate::config::{JwtConfig, MAX_TTL_MINUTES};

#[derive(Debug, Error)]
pub enum IssueError {
    #[error("signing key is missing")]
    MissingKey,
    #[error("token lifetime of {0} minutes is out of range")]
    InvalidTtl(i64),
    #[error("token expiry overflows")]
    ExpiryOverflow,
    #[error("token signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// Bad signature, malformed, expired or issued for someone else.
#[derive(Debug, Error)]
#[error("invalid or expired token")]
pub struct InvalidTokenError;

/// Mints and checks bearer tokens bound to a user id.
///
/// Tokens are stateless: there is no revocation list, so a token stays valid
/// until its expiry whatever happens to the account afterwards.
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, user_id: Uuid) -> Result<String, IssueError>;
    fn parse(&self, token: &str) -> Result<Uuid, InvalidTokenError>;
}

/// HS256 keys plus the claims every token is stamped with.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    audience: String,
    ttl: Duration,
}

impl JwtKeys {
    pub fn new(config: &JwtConfig) -> Result<Self, IssueError> {
        if config.secret.is_empty() {
            return Err(IssueError::MissingKey);
        }
        if config.ttl_minutes <= 0 || config.ttl_minutes > MAX_TTL_MINUTES {
            return Err(IssueError::InvalidTtl(config.ttl_minutes));
        }
        let secret = config.secret.as_bytes();
        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            ttl: Duration::from_secs(config.ttl_minutes as u64 * 60),
        })
    }

    fn claims_for(&self, user_id: Uuid, now: OffsetDateTime) -> Result<Claims, IssueError> {
        let exp = now
            .checked_add(TimeDuration::seconds(self.ttl.as_secs() as i64))
            .ok_or(IssueError::ExpiryOverflow)?;
        Ok(Claims {
            sub: user_id,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        })
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::default();
        validation.leeway = 0;
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        validation
    }
}

impl TokenIssuer for JwtKeys {
    fn issue(&self, user_id: Uuid) -> Result<String, IssueError> {
        let claims = self.claims_for(user_id, OffsetDateTime::now_utc())?;
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %user_id, "jwt signed");
        Ok(token)
    }

    fn parse(&self, token: &str) -> Result<Uuid, InvalidTokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation()).map_err(|e| {
            debug!(error = %e, "jwt rejected");
            InvalidTokenError
        })?;
        debug!(user_id = %data.claims.sub, "jwt verified");
        Ok(data.claims.sub)
    }
}
