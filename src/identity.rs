use async_trait::async_trait;

use crate::error::ApiError;
use crate::models::Identity;

#[derive(thiserror::Error, Debug)]
pub enum IdentityError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("email already registered")]
    EmailTaken,
    #[error("unavailable: {0}")]
    Unavailable(String),
}

impl From<IdentityError> for ApiError {
    fn from(e: IdentityError) -> Self {
        match e {
            IdentityError::InvalidCredentials => ApiError::Forbidden,
            IdentityError::EmailTaken => ApiError::Conflict,
            IdentityError::Unavailable(cause) => {
                log::error!("identity provider unavailable: {cause}");
                ApiError::Dependency
            }
        }
    }
}

/// Credential verification is delegated entirely to the external identity
/// provider; this crate never stores or hashes a password.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn signup(&self, email: &str, password: &str) -> Result<Identity, IdentityError>;
    async fn login(&self, email: &str, password: &str) -> Result<Identity, IdentityError>;
}

#[cfg(feature = "rest-store")]
pub mod rest {
    use super::*;
    use reqwest::{Client, StatusCode};
    use serde_json::json;

    /// Client for the BaaS auth namespace. Both endpoints answer with the
    /// authenticated principal `{ "id": ..., "email": ... }` on success.
    #[derive(Clone)]
    pub struct RestIdentityProvider {
        client: Client,
        base_url: String,
        api_key: String,
    }

    impl RestIdentityProvider {
        pub fn new(base_url: &str, api_key: &str) -> Self {
            Self {
                client: Client::new(),
                base_url: base_url.trim_end_matches('/').to_string(),
                api_key: api_key.to_string(),
            }
        }

        async fn post_credentials(
            &self,
            path: &str,
            email: &str,
            password: &str,
        ) -> Result<reqwest::Response, IdentityError> {
            self.client
                .post(format!("{}{}", self.base_url, path))
                .header("apikey", &self.api_key)
                .json(&json!({ "email": email, "password": password }))
                .send()
                .await
                .map_err(|e| IdentityError::Unavailable(e.to_string()))
        }
    }

    #[async_trait]
    impl IdentityProvider for RestIdentityProvider {
        async fn signup(&self, email: &str, password: &str) -> Result<Identity, IdentityError> {
            let resp = self.post_credentials("/auth/v1/signup", email, password).await?;
            match resp.status() {
                s if s.is_success() => resp
                    .json::<Identity>()
                    .await
                    .map_err(|e| IdentityError::Unavailable(e.to_string())),
                StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
                    Err(IdentityError::EmailTaken)
                }
                s => Err(IdentityError::Unavailable(format!("signup returned {s}"))),
            }
        }

        async fn login(&self, email: &str, password: &str) -> Result<Identity, IdentityError> {
            let resp = self
                .post_credentials("/auth/v1/token?grant_type=password", email, password)
                .await?;
            match resp.status() {
                s if s.is_success() => resp
                    .json::<Identity>()
                    .await
                    .map_err(|e| IdentityError::Unavailable(e.to_string())),
                StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    Err(IdentityError::InvalidCredentials)
                }
                s => Err(IdentityError::Unavailable(format!("login returned {s}"))),
            }
        }
    }
}

#[cfg(feature = "inmem-store")]
pub mod inmem {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, RwLock};

    /// Test/dev provider with a plain credential map. Never used by the
    /// remote configuration path.
    #[derive(Clone, Default)]
    pub struct InMemIdentityProvider {
        accounts: Arc<RwLock<HashMap<String, (String, String)>>>, // email -> (password, id)
    }

    impl InMemIdentityProvider {
        pub fn new() -> Self {
            Self::default()
        }
    }

    #[async_trait]
    impl IdentityProvider for InMemIdentityProvider {
        async fn signup(&self, email: &str, password: &str) -> Result<Identity, IdentityError> {
            let mut accounts = self.accounts.write().unwrap();
            if accounts.contains_key(email) {
                return Err(IdentityError::EmailTaken);
            }
            let id = uuid::Uuid::new_v4().to_string();
            accounts.insert(email.to_string(), (password.to_string(), id.clone()));
            Ok(Identity { id, email: email.to_string() })
        }

        async fn login(&self, email: &str, password: &str) -> Result<Identity, IdentityError> {
            let accounts = self.accounts.read().unwrap();
            match accounts.get(email) {
                Some((stored, id)) if stored == password => {
                    Ok(Identity { id: id.clone(), email: email.to_string() })
                }
                _ => Err(IdentityError::InvalidCredentials),
            }
        }
    }
}
