//! Socket handshake authentication
//!
//! Verifies the access token presented when a client opens a realtime
//! connection and resolves its subject against the user store.

use linkup_shared::{StoreError, UserProfile, UserStore};
use std::sync::Arc;
use uuid::Uuid;

use super::jwt::{JwtError, JwtManager};
use crate::error::ApiError;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Token not provided")]
    MissingToken,
    #[error(transparent)]
    Token(#[from] JwtError),
    #[error("User {0} not found")]
    UnknownUser(Uuid),
    #[error("User {0} is banned")]
    Banned(Uuid),
    #[error("User lookup failed: {0}")]
    Lookup(#[from] StoreError),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingToken => ApiError::Unauthorized,
            AuthError::Token(JwtError::Expired) => ApiError::TokenExpired,
            AuthError::Token(_) => ApiError::InvalidToken,
            AuthError::UnknownUser(_) => ApiError::UserNotFound,
            AuthError::Banned(_) => ApiError::AccountBanned,
            // Store outages are reported like any other failed handshake
            AuthError::Lookup(_) => ApiError::AuthenticationFailed,
        }
    }
}

/// Handshake authenticator
#[derive(Clone)]
pub struct Authenticator {
    jwt: Arc<JwtManager>,
    users: Arc<dyn UserStore>,
}

impl Authenticator {
    pub fn new(jwt: Arc<JwtManager>, users: Arc<dyn UserStore>) -> Self {
        Self { jwt, users }
    }

    /// Resolve the identity behind a handshake token
    ///
    /// Performs at most one store lookup, and only after the token verified.
    pub async fn authenticate(&self, token: Option<&str>) -> Result<UserProfile, AuthError> {
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingToken)?;

        let claims = self.jwt.validate_access_token(token)?;

        let user = match self.users.find_profile(claims.sub).await {
            Ok(Some(user)) => user,
            Ok(None) => return Err(AuthError::UnknownUser(claims.sub)),
            Err(e) => {
                tracing::error!(error = %e, user_id = %claims.sub, "Socket auth: user lookup failed");
                return Err(e.into());
            }
        };

        if user.is_banned {
            return Err(AuthError::Banned(user.id));
        }

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkup_shared::MemoryUserStore;

    const SECRET: &str = "test-secret-key-at-least-32-chars!";

    async fn setup() -> (Authenticator, Arc<MemoryUserStore>, Arc<JwtManager>, UserProfile) {
        let store = Arc::new(MemoryUserStore::new());
        let jwt = Arc::new(JwtManager::new(SECRET, 24));
        let user = UserProfile::new(Uuid::new_v4(), "ada", "ada@example.com");
        store.insert(user.clone()).await;

        let auth = Authenticator::new(Arc::clone(&jwt), store.clone());
        (auth, store, jwt, user)
    }

    #[tokio::test]
    async fn test_valid_token_resolves_user() {
        let (auth, store, jwt, user) = setup().await;
        let token = jwt.generate_access_token(&user).unwrap();

        let resolved = auth.authenticate(Some(&token)).await.unwrap();
        assert_eq!(resolved, user);
        assert_eq!(store.lookup_count(), 1);
    }

    #[tokio::test]
    async fn test_rest_backend_token_resolves_user() {
        let (auth, store, _, user) = setup().await;
        let now = time::OffsetDateTime::now_utc().unix_timestamp();
        let payload = serde_json::json!({
            "_id": user.id,
            "userName": user.user_name,
            "fullName": "Ada Lovelace",
            "email": user.email,
            "role": "user",
            "iat": now,
            "exp": now + 900,
        });
        let token = jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &payload,
            &jsonwebtoken::EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let resolved = auth.authenticate(Some(&token)).await.unwrap();
        assert_eq!(resolved.id, user.id);
        assert_eq!(store.lookup_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_token_skips_lookup() {
        let (auth, store, _, _) = setup().await;

        assert!(matches!(auth.authenticate(None).await, Err(AuthError::MissingToken)));
        assert!(matches!(auth.authenticate(Some("  ")).await, Err(AuthError::MissingToken)));
        assert_eq!(store.lookup_count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_token_skips_lookup() {
        let (auth, store, _, _) = setup().await;

        let result = auth.authenticate(Some("garbage")).await;
        assert!(matches!(result, Err(AuthError::Token(_))));
        assert_eq!(store.lookup_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_subject_rejected() {
        let (auth, store, jwt, _) = setup().await;
        let stranger = UserProfile::new(Uuid::new_v4(), "ghost", "ghost@example.com");
        let token = jwt.generate_access_token(&stranger).unwrap();

        let result = auth.authenticate(Some(&token)).await;
        assert!(matches!(result, Err(AuthError::UnknownUser(id)) if id == stranger.id));
        assert_eq!(store.lookup_count(), 1);
    }

    #[tokio::test]
    async fn test_banned_user_rejected() {
        let (auth, store, jwt, mut user) = setup().await;
        user.is_banned = true;
        store.insert(user.clone()).await;
        let token = jwt.generate_access_token(&user).unwrap();

        assert!(matches!(auth.authenticate(Some(&token)).await, Err(AuthError::Banned(_))));
    }

    #[tokio::test]
    async fn test_store_outage_is_generic_failure() {
        let (auth, store, jwt, user) = setup().await;
        store.set_unavailable(true);
        let token = jwt.generate_access_token(&user).unwrap();

        let err = auth.authenticate(Some(&token)).await.unwrap_err();
        assert!(matches!(err, AuthError::Lookup(_)));
        assert!(matches!(ApiError::from(err), ApiError::AuthenticationFailed));
    }
}
