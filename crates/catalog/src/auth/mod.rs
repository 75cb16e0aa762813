//! Signup, login and token verification against the store's user table.

mod error;
pub mod password;
pub mod token;

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use crate::logging::{debug, info, warn};
use crate::store::{Commit, RecordStore, User, UserId};

pub use error::AuthError;
pub use token::TokenClaims;

/// A user as seen by callers: never includes the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub id: UserId,
    pub username: String,
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}

/// A successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub id: UserId,
    pub username: String,
    pub token: String,
}

/// Usernames are compared trimmed and lower-cased.
pub fn normalize_username(username: &str) -> String {
    username.trim().to_lowercase()
}

#[derive(Debug, Clone)]
pub struct AuthService {
    store: Arc<RecordStore>,
}

impl AuthService {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }

    /// Register a new user.
    pub fn signup(&self, username: &str, password: &str) -> Result<Identity, AuthError> {
        let username = normalize_username(username);
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::InvalidInput("username and password required"));
        }
        // The token format uses ':' as its separator.
        if username.contains(':') {
            return Err(AuthError::InvalidInput("username may not contain ':'"));
        }

        let identity = self.store.transact(|doc| -> Result<_, AuthError> {
            if doc.users.iter().any(|u| u.username == username) {
                return Err(AuthError::Conflict(username.clone()));
            }

            let user = User {
                id: doc.allocate_user_id(),
                username: username.clone(),
                password_hash: password::digest(password),
            };
            let identity = Identity::from(&user);
            doc.users.push(user);
            Ok(Commit::Save(identity))
        })?;

        info!(id = identity.id, username = %identity.username, "user registered");
        Ok(identity)
    }

    /// Check credentials and issue a token.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        let username = normalize_username(username);
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::InvalidInput("username and password required"));
        }

        let identity = self.store.read(|doc| {
            doc.users
                .iter()
                .find(|u| u.username == username)
                .filter(|u| password::matches(password, &u.password_hash))
                .map(Identity::from)
        })?;

        let Some(identity) = identity else {
            warn!(username = %username, "failed login");
            return Err(AuthError::InvalidCredentials);
        };

        let token = token::issue(
            identity.id,
            &identity.username,
            Utc::now().timestamp_millis(),
        );
        info!(id = identity.id, "user logged in");

        Ok(Session {
            id: identity.id,
            username: identity.username,
            token,
        })
    }

    /// Resolve a token to a stored user. Malformed tokens and tokens naming
    /// no stored id/username pair yield `None`.
    pub fn verify_token(&self, token: &str) -> Result<Option<Identity>, AuthError> {
        let Some(claims) = token::decode(token) else {
            debug!("undecodable token");
            return Ok(None);
        };

        let identity = self.store.read(|doc| {
            doc.users
                .iter()
                .find(|u| u.id == claims.user_id && u.username == claims.username)
                .map(Identity::from)
        })?;

        if identity.is_none() {
            debug!(user_id = claims.user_id, "token names no stored user");
        }
        Ok(identity)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;

    fn service() -> AuthService {
        AuthService::new(Arc::new(RecordStore::in_memory()))
    }

    #[test]
    fn test_signup_normalizes_and_hides_hash() {
        let auth = service();
        let identity = auth.signup("  Alice ", "secret").unwrap();
        assert_eq!(identity, Identity { id: 1, username: "alice".into() });

        let json = serde_json::to_value(&identity).unwrap();
        assert!(json.get("passwordHash").is_none());

        let doc = auth.store.snapshot().unwrap();
        assert_eq!(doc.users.len(), 1);
        assert_eq!(doc.next_user_id, 2);
        assert_ne!(doc.users.first().unwrap().password_hash, "secret");
    }

    #[test]
    fn test_signup_requires_fields() {
        let auth = service();
        assert!(matches!(auth.signup("   ", "pw"), Err(AuthError::InvalidInput(_))));
        assert!(matches!(auth.signup("bob", ""), Err(AuthError::InvalidInput(_))));
        assert!(matches!(auth.signup("a:b", "pw"), Err(AuthError::InvalidInput(_))));
    }

    #[test]
    fn test_signup_conflict_ignores_case() {
        let auth = service();
        auth.signup("Bob", "pw").unwrap();
        assert!(matches!(auth.signup("bob", "other"), Err(AuthError::Conflict(name)) if name == "bob"));
        assert_eq!(auth.store.snapshot().unwrap().users.len(), 1);
    }

    #[test]
    fn test_authenticate_issues_token() {
        let auth = service();
        auth.signup("bob", "pw").unwrap();

        let session = auth.authenticate("BOB ", "pw").unwrap();
        assert_eq!(session.id, 1);
        assert_eq!(session.username, "bob");

        let identity = auth.verify_token(&session.token).unwrap();
        assert_eq!(identity, Some(Identity { id: 1, username: "bob".into() }));
    }

    #[test]
    fn test_bad_credentials_are_indistinguishable() {
        let auth = service();
        auth.signup("bob", "pw").unwrap();

        let wrong_password = auth.authenticate("bob", "nope").unwrap_err();
        let unknown_user = auth.authenticate("carol", "pw").unwrap_err();
        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert!(matches!(unknown_user, AuthError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    }

    #[test]
    fn test_authenticate_requires_fields() {
        let auth = service();
        assert!(matches!(auth.authenticate("", "pw"), Err(AuthError::InvalidInput(_))));
        assert!(matches!(auth.authenticate("bob", ""), Err(AuthError::InvalidInput(_))));
    }

    #[test]
    fn test_tampered_token_only_fails_on_unknown_pair() {
        let auth = service();
        auth.signup("bob", "pw").unwrap();
        auth.signup("carol", "pw").unwrap();
        let session = auth.authenticate("bob", "pw").unwrap();

        let payload = String::from_utf8(STANDARD.decode(&session.token).unwrap()).unwrap();

        // Renaming the user breaks the id/username pair.
        let renamed = STANDARD.encode(payload.replacen("bob", "mallory", 1));
        assert_eq!(auth.verify_token(&renamed).unwrap(), None);

        // A forged token for another real pair is accepted: nothing is signed.
        let forged = token::issue(2, "carol", 0);
        assert_eq!(
            auth.verify_token(&forged).unwrap(),
            Some(Identity { id: 2, username: "carol".into() })
        );
    }

    #[test]
    fn test_never_issued_pair_has_no_identity() {
        let auth = service();
        auth.signup("bob", "pw").unwrap();
        assert_eq!(auth.verify_token(&token::issue(1, "alice", 0)).unwrap(), None);
        assert_eq!(auth.verify_token(&token::issue(7, "bob", 0)).unwrap(), None);
        assert_eq!(auth.verify_token("garbage").unwrap(), None);
    }
}
