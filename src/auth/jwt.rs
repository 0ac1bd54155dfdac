use std::time::Duration;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::{debug, warn};

use crate::{config::JwtConfig, error::ApiError, state::AppState};

/// JWT payload: just the username, plus `exp` when a lifetime is configured.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<usize>,
}

#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub ttl: Option<Duration>,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let JwtConfig {
            secret,
            ttl_minutes,
        } = state.config.jwt.clone();
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: ttl_minutes.map(|m| Duration::from_secs((m as u64) * 60)),
        }
    }
}

impl JwtKeys {
    pub fn sign(&self, username: &str) -> anyhow::Result<String> {
        let exp = self.ttl.map(|ttl| {
            let exp = OffsetDateTime::now_utc() + TimeDuration::seconds(ttl.as_secs() as i64);
            exp.unix_timestamp() as usize
        });
        let claims = Claims {
            username: username.to_string(),
            exp,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        debug!(%username, expires = exp.is_some(), "jwt signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, ApiError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // exp is optional, but still checked when present
        validation.required_spec_claims.clear();
        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => ApiError::ExpiredToken,
                _ => ApiError::InvalidToken,
            }
        })?;
        debug!(username = %data.claims.username, "jwt verified");
        Ok(data.claims)
    }
}

/// Authenticated caller, resolved from `Authorization: Bearer <token>`.
pub struct AuthUser(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .ok_or(ApiError::MissingToken)?;

        // everything after "Bearer ", taken literally
        let token = auth_header.get(7..).unwrap_or_default();

        let claims = keys.verify(token).map_err(|e| {
            warn!(error = %e, "token rejected");
            e
        })?;

        Ok(AuthUser(claims.username))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn make_keys(secret: &str, ttl_minutes: Option<i64>) -> JwtKeys {
        let (state, _) = AppState::fake_with_store();
        let mut config = (*state.config).clone();
        config.jwt = JwtConfig {
            secret: secret.into(),
            ttl_minutes,
        };
        let state = AppState::from_parts(state.store, Arc::new(config));
        JwtKeys::from_ref(&state)
    }

    #[test]
    fn sign_and_verify_without_expiry() {
        let keys = make_keys("dev-secret", None);
        let token = keys.sign("asad").expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.username, "asad");
        assert_eq!(claims.exp, None);
    }

    #[test]
    fn sign_and_verify_with_expiry() {
        let keys = make_keys("dev-secret", Some(5));
        let token = keys.sign("asad").expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.username, "asad");
        assert!(claims.exp.is_some());
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        let keys = make_keys("dev-secret", None);
        let past = (OffsetDateTime::now_utc() - TimeDuration::hours(2)).unix_timestamp() as usize;
        let claims = Claims {
            username: "asad".into(),
            exp: Some(past),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding).unwrap();
        assert!(matches!(keys.verify(&token), Err(ApiError::ExpiredToken)));
    }

    #[test]
    fn token_from_other_secret_is_invalid() {
        let good = make_keys("secret-a", None);
        let bad = make_keys("secret-b", None);
        let token = good.sign("asad").unwrap();
        assert!(matches!(bad.verify(&token), Err(ApiError::InvalidToken)));
        assert!(matches!(good.verify("not.a.jwt"), Err(ApiError::InvalidToken)));
    }
}
