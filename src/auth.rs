use actix_web::{dev::Payload, Error, FromRequest, HttpRequest};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::future::{ready, Ready};

use crate::error::ApiError;

/// Session lifetime. There is no refresh mechanism; expiry forces re-login.
const TOKEN_TTL_HOURS: i64 = 1;

// Read once at first use; the secret is immutable for the process lifetime.
// Presence and length are validated at startup before any token is issued.
static KEYS: Lazy<(EncodingKey, DecodingKey)> = Lazy::new(|| {
    let secret = env::var("JWT_SECRET").expect("JWT_SECRET not set");
    (
        EncodingKey::from_secret(secret.as_bytes()),
        DecodingKey::from_secret(secret.as_bytes()),
    )
});

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub name: String,
    pub admin: bool,
    pub exp: usize,
}

/// Validate a JWT and return its claims. Fails on bad signature, malformed
/// payload, or elapsed expiry. There is no revocation list: a token issued
/// while admin stays admin until it expires.
fn decode_jwt(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    let data = decode::<Claims>(token, &KEYS.1, &validation)?;
    Ok(data.claims)
}

/// Issue a session token. The admin flag is always derived from the profile
/// projection by the caller; no issuance site mints it unconditionally.
pub fn create_jwt(
    subject: &str,
    email: &str,
    name: &str,
    admin: bool,
) -> Result<String, jsonwebtoken::errors::Error> {
    let expiration = chrono::Utc::now()
        .checked_add_signed(chrono::Duration::hours(TOKEN_TTL_HOURS))
        .expect("valid timestamp")
        .timestamp() as usize;

    let claims = Claims {
        sub: subject.to_string(),
        email: email.to_string(),
        name: name.to_string(),
        admin,
        exp: expiration,
    };

    encode(&Header::default(), &claims, &KEYS.0)
}

/// Extractor yielding validated `Claims`; this is the "authenticated user" gate.
///
/// Missing credential is 401; a credential that fails verification is 403.
pub struct Auth(pub Claims);

impl FromRequest for Auth {
    type Error = Error;
    type Future = Ready<Result<Self, Error>>;

    fn from_request(req: &HttpRequest, pl: &mut Payload) -> Self::Future {
        // BearerAuth parses the standard `Authorization: Bearer <token>` header;
        // every gated route uses this one transport convention.
        if let Ok(bearer) = BearerAuth::from_request(req, pl).into_inner() {
            return match decode_jwt(bearer.token()) {
                Ok(claims) => ready(Ok(Auth(claims))),
                Err(_) => ready(Err(ApiError::Forbidden.into())),
            };
        }
        ready(Err(ApiError::Unauthenticated.into()))
    }
}

/// The "authenticated admin" gate, layered on `Auth` in each admin handler.
#[macro_export]
macro_rules! require_admin {
    ($auth:expr) => {
        if !$auth.0.admin {
            return Err($crate::error::ApiError::Forbidden);
        }
    };
}
