//! Auth client: login, register and the persisted session.
//!
//! Validation runs locally before any request; a failing form never reaches
//! the backend. A successful login persists the access token and the user
//! record through the session store, and a new client restores whatever
//! session the store still holds.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;
use validator::Validate;

pub mod validation;

use crate::config::Config;
use crate::errors::{classify_error_response, ApiError};
use crate::storage::SessionStore;
use validation::{field_errors, Credentials, FieldError, Registration};

pub const AUTH_TOKEN_KEY: &str = "auth_token";
pub const USER_INFO_KEY: &str = "user_info";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserInfo {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    pub is_active: bool,
    pub is_verified: bool,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// The backend token response, kept in memory and mirrored into the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthSession {
    pub access_token: String,
    pub token_type: String,
    pub user: UserInfo,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Local validation failed; nothing was sent to the backend.
    #[error("{}", format_messages(.0))]
    Validation(Vec<FieldError>),

    /// The backend rejected the attempt with a user-facing reason
    /// ("Incorrect email or password", "Email already registered").
    #[error("{message}")]
    Rejected { message: String },

    #[error(transparent)]
    Api(#[from] ApiError),
}

fn format_messages(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

struct Inner {
    http: Client,
    config: Config,
    store: Arc<dyn SessionStore>,
    session: Mutex<Option<AuthSession>>,
}

#[derive(Clone)]
pub struct AuthClient {
    inner: Arc<Inner>,
}

impl AuthClient {
    /// Builds the client and restores any session the store still holds.
    pub fn new(config: Config, store: Arc<dyn SessionStore>) -> Self {
        let session = restore_session(store.as_ref());
        Self {
            inner: Arc::new(Inner {
                http: Client::new(),
                config,
                store,
                session: Mutex::new(session),
            }),
        }
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<AuthSession, AuthError> {
        if let Err(errors) = credentials.validate() {
            return Err(AuthError::Validation(field_errors(&errors)));
        }

        let url = format!("{}/v1/auth/login", self.inner.config.api_base_url);
        let body = serde_json::json!({
            "email": credentials.email,
            "password": credentials.password,
        });
        let session = self.post_auth(&url, &body).await?;
        self.install_session(session.clone());
        Ok(session)
    }

    pub async fn register(&self, registration: &Registration) -> Result<AuthSession, AuthError> {
        if let Err(errors) = registration.validate() {
            return Err(AuthError::Validation(field_errors(&errors)));
        }

        let url = format!("{}/v1/auth/register", self.inner.config.api_base_url);
        let body = serde_json::json!({
            "first_name": registration.first_name,
            "last_name": registration.last_name,
            "email": registration.email,
            "password": registration.password,
        });
        let session = self.post_auth(&url, &body).await?;
        self.install_session(session.clone());
        Ok(session)
    }

    /// Drops the session and removes the persisted token and user record.
    pub fn logout(&self) {
        *lock(&self.inner.session) = None;
        for key in [AUTH_TOKEN_KEY, USER_INFO_KEY] {
            if let Err(e) = self.inner.store.remove(key) {
                warn!(key, "failed to remove session entry: {e}");
            }
        }
    }

    pub fn current_user(&self) -> Option<UserInfo> {
        lock(&self.inner.session).as_ref().map(|s| s.user.clone())
    }

    pub fn token(&self) -> Option<String> {
        lock(&self.inner.session)
            .as_ref()
            .map(|s| s.access_token.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        lock(&self.inner.session).is_some()
    }

    async fn post_auth(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<AuthSession, AuthError> {
        let response = self
            .inner
            .http
            .post(url)
            .json(body)
            .timeout(self.inner.config.timeouts.auth)
            .send()
            .await
            .map_err(ApiError::from)?;

        if !response.status().is_success() {
            let err = classify_error_response(response).await;
            return Err(match err.server_detail() {
                Some(message) => AuthError::Rejected {
                    message: message.to_string(),
                },
                None => AuthError::Api(err),
            });
        }

        response
            .json::<AuthSession>()
            .await
            .map_err(|e| AuthError::Api(ApiError::from(e)))
    }

    /// Persistence is best-effort: a failing store logs a warning but never
    /// fails the login itself.
    fn install_session(&self, session: AuthSession) {
        if let Err(e) = self.inner.store.set(AUTH_TOKEN_KEY, &session.access_token) {
            warn!("failed to persist auth token: {e}");
        }
        match serde_json::to_string(&session.user) {
            Ok(raw) => {
                if let Err(e) = self.inner.store.set(USER_INFO_KEY, &raw) {
                    warn!("failed to persist user info: {e}");
                }
            }
            Err(e) => warn!("failed to serialize user info: {e}"),
        }
        *lock(&self.inner.session) = Some(session);
    }
}

fn restore_session(store: &dyn SessionStore) -> Option<AuthSession> {
    let token = match store.get(AUTH_TOKEN_KEY) {
        Ok(v) => v?,
        Err(e) => {
            warn!("session store read failed: {e}");
            return None;
        }
    };
    let raw_user = match store.get(USER_INFO_KEY) {
        Ok(v) => v?,
        Err(e) => {
            warn!("session store read failed: {e}");
            return None;
        }
    };
    match serde_json::from_str::<UserInfo>(&raw_user) {
        Ok(user) => Some(AuthSession {
            access_token: token,
            token_type: "bearer".to_string(),
            user,
        }),
        Err(e) => {
            warn!("stored user info is unreadable, ignoring it: {e}");
            None
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use mockito::Matcher;

    fn make_user_json() -> serde_json::Value {
        serde_json::json!({
            "id": 1,
            "email": "ada@example.com",
            "full_name": "Ada Lovelace",
            "is_active": true,
            "is_verified": false,
            "created_at": "2024-01-15T10:30:00",
            "updated_at": null
        })
    }

    fn session_body() -> String {
        serde_json::json!({
            "access_token": "tok123",
            "token_type": "bearer",
            "user": make_user_json()
        })
        .to_string()
    }

    fn make_credentials() -> Credentials {
        Credentials {
            email: "ada@example.com".to_string(),
            password: "secret123".to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_persists_token_and_user() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/auth/login")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "email": "ada@example.com"
            })))
            .with_header("content-type", "application/json")
            .with_body(session_body())
            .expect(1)
            .create_async()
            .await;

        let store = Arc::new(MemoryStore::new());
        let client = AuthClient::new(Config::with_base(server.url()), store.clone());
        assert!(!client.is_authenticated());

        let session = client.login(&make_credentials()).await.unwrap();
        assert_eq!(session.access_token, "tok123");
        assert!(client.is_authenticated());
        assert_eq!(client.current_user().unwrap().full_name, "Ada Lovelace");

        assert_eq!(
            store.get(AUTH_TOKEN_KEY).unwrap(),
            Some("tok123".to_string())
        );
        let stored: UserInfo =
            serde_json::from_str(&store.get(USER_INFO_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(stored.email, "ada@example.com");

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_login_surfaces_backend_rejection() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/auth/login")
            .with_status(401)
            .with_body("{\"detail\": \"Incorrect email or password\"}")
            .expect(1)
            .create_async()
            .await;

        let store = Arc::new(MemoryStore::new());
        let client = AuthClient::new(Config::with_base(server.url()), store.clone());

        let err = client.login(&make_credentials()).await.unwrap_err();
        assert_eq!(
            err,
            AuthError::Rejected {
                message: "Incorrect email or password".to_string()
            }
        );
        assert_eq!(err.to_string(), "Incorrect email or password");
        assert!(!client.is_authenticated());
        assert_eq!(store.get(AUTH_TOKEN_KEY).unwrap(), None);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_invalid_form_never_reaches_the_backend() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/auth/login")
            .expect(0)
            .create_async()
            .await;

        let client = AuthClient::new(
            Config::with_base(server.url()),
            Arc::new(MemoryStore::new()),
        );

        let err = client
            .login(&Credentials {
                email: "nope".to_string(),
                password: "abc".to_string(),
            })
            .await
            .unwrap_err();

        match err {
            AuthError::Validation(errors) => {
                let messages: Vec<_> = errors.iter().map(|e| e.message.as_str()).collect();
                assert_eq!(
                    messages,
                    vec![
                        "Please enter a valid email address",
                        "Password must be at least 6 characters"
                    ]
                );
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_register_reports_duplicate_email() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/auth/register")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "first_name": "Ada",
                "last_name": "Lovelace"
            })))
            .with_status(400)
            .with_body("{\"detail\": \"Email already registered\"}")
            .expect(1)
            .create_async()
            .await;

        let client = AuthClient::new(
            Config::with_base(server.url()),
            Arc::new(MemoryStore::new()),
        );

        let err = client
            .register(&Registration {
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                password: "secret123".to_string(),
                confirm_password: "secret123".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Email already registered");
        mock.assert_async().await;
    }

    #[test]
    fn test_session_restores_from_store() {
        let store = Arc::new(MemoryStore::new());
        store.set(AUTH_TOKEN_KEY, "tok456").unwrap();
        store
            .set(USER_INFO_KEY, &make_user_json().to_string())
            .unwrap();

        let client = AuthClient::new(Config::with_base("http://localhost:8000/api"), store);
        assert!(client.is_authenticated());
        assert_eq!(client.token(), Some("tok456".to_string()));
        assert_eq!(client.current_user().unwrap().id, 1);
    }

    #[test]
    fn test_logout_clears_session_and_store() {
        let store = Arc::new(MemoryStore::new());
        store.set(AUTH_TOKEN_KEY, "tok456").unwrap();
        store
            .set(USER_INFO_KEY, &make_user_json().to_string())
            .unwrap();

        let client = AuthClient::new(Config::with_base("http://localhost:8000/api"), store.clone());
        client.logout();

        assert!(!client.is_authenticated());
        assert_eq!(store.get(AUTH_TOKEN_KEY).unwrap(), None);
        assert_eq!(store.get(USER_INFO_KEY).unwrap(), None);
    }

    #[test]
    fn test_corrupt_stored_user_is_ignored() {
        let store = Arc::new(MemoryStore::new());
        store.set(AUTH_TOKEN_KEY, "tok456").unwrap();
        store.set(USER_INFO_KEY, "not json").unwrap();

        let client = AuthClient::new(Config::with_base("http://localhost:8000/api"), store);
        assert!(!client.is_authenticated());
    }
}
