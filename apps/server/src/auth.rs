use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::main_lib::AppState;

/// Caller id used when the server runs without a JWT secret.
pub const LOCAL_USER_ID: &str = "local";

pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: usize,
    iat: usize,
}

impl AuthManager {
    pub fn new(secret: &str) -> anyhow::Result<Self> {
        let secret = secret.trim();
        if secret.len() < 32 {
            anyhow::bail!("JWT secret must be at least 32 characters");
        }
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);
        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    /// Signs a token for `user_id`, valid for `ttl`.
    pub fn issue_token(&self, user_id: &str, ttl: Duration) -> anyhow::Result<String> {
        let now = SystemTime::now().duration_since(UNIX_EPOCH)?;
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.as_secs() as usize,
            exp: (now + ttl).as_secs() as usize,
        };
        Ok(encode(&Header::default(), &claims, &self.encoding_key)?)
    }

    /// The `sub` of a valid token, or `None` for anything else.
    pub fn user_id_from_token(&self, token: &str) -> Option<String> {
        match decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) if !data.claims.sub.trim().is_empty() => Some(data.claims.sub),
            Ok(_) => None,
            Err(err) => {
                tracing::debug!("Rejected bearer token: {:?}", err.kind());
                None
            }
        }
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    let header = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let mut split = header.splitn(2, ' ');
    let (Some(scheme), Some(token)) = (split.next(), split.next()) else {
        return None;
    };
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Caller identity, if any. Never rejects.
pub struct MaybeCaller(pub Option<String>);

impl FromRequestParts<Arc<AppState>> for MaybeCaller {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let Some(auth) = state.auth.as_ref() else {
            return Ok(MaybeCaller(Some(LOCAL_USER_ID.to_string())));
        };
        Ok(MaybeCaller(
            bearer_token(parts).and_then(|token| auth.user_id_from_token(token)),
        ))
    }
}

/// Caller identity for endpoints that require one.
pub struct Caller(pub String);

impl FromRequestParts<Arc<AppState>> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        match MaybeCaller::from_request_parts(parts, state).await {
            Ok(MaybeCaller(Some(user_id))) => Ok(Caller(user_id)),
            _ => Err(ApiError::Unauthorized("Unauthorized".to_string())),
        }
    }
}
