use std::sync::Arc;

use shared::domain::SessionState;
use storage::{DurableCache, SESSION_CACHE_KEY};
use tracing::{info, warn};

use crate::{
    bridge::AuthBridge,
    coordinator::SubmissionCoordinator,
    error::{
        AuthError, CacheError, MSG_LOGGED_OUT, MSG_LOGIN_FAILED, MSG_SIGNED_UP, MSG_SIGNUP_FAILED,
    },
    validator::{validate_access_code, validate_display_name},
    Notification,
};

/// Persisted copy of the signed-in session so a restart can resume it.
pub struct SessionStore {
    cache: Arc<dyn DurableCache>,
}

impl SessionStore {
    pub fn new(cache: Arc<dyn DurableCache>) -> Self {
        Self { cache }
    }

    pub async fn load(&self) -> Result<Option<SessionState>, CacheError> {
        let Some(blob) = self.cache.read(SESSION_CACHE_KEY).await? else {
            return Ok(None);
        };
        match serde_json::from_str::<SessionState>(&blob) {
            Ok(session) => Ok(Some(session)),
            Err(err) => {
                warn!("session: discarding unreadable cached session: {err}");
                self.cache.remove(SESSION_CACHE_KEY).await?;
                Ok(None)
            }
        }
    }

    pub async fn save(&self, session: &SessionState) -> Result<(), CacheError> {
        let blob = serde_json::to_string(session)?;
        self.cache.write(SESSION_CACHE_KEY, &blob).await?;
        Ok(())
    }

    pub async fn clear(&self) -> Result<(), CacheError> {
        self.cache.remove(SESSION_CACHE_KEY).await?;
        Ok(())
    }
}

/// Sign-up, sign-in and sign-out around a [`SubmissionCoordinator`].
pub struct AuthFlow {
    auth: Arc<dyn AuthBridge>,
    sessions: SessionStore,
    coordinator: Arc<SubmissionCoordinator>,
}

impl AuthFlow {
    pub fn new(
        auth: Arc<dyn AuthBridge>,
        sessions: SessionStore,
        coordinator: Arc<SubmissionCoordinator>,
    ) -> Self {
        Self {
            auth,
            sessions,
            coordinator,
        }
    }

    pub fn coordinator(&self) -> &Arc<SubmissionCoordinator> {
        &self.coordinator
    }

    /// Creates an account. Returns the server's confirmation message.
    pub async fn signup(&self, name: &str, code: &str) -> Result<String, AuthError> {
        let outcome = match (validate_display_name(name), validate_access_code(code)) {
            (_, Err(err)) | (Err(err), _) => Err(err),
            (Ok(name), Ok(code)) => self.auth.signup(name, code).await.map_err(|err| {
                warn!("auth: signup failed: {err}");
                AuthError::Rejected(err.server_message().unwrap_or(MSG_SIGNUP_FAILED).into())
            }),
        };

        match outcome {
            Ok(message) => {
                let message = message.unwrap_or_else(|| MSG_SIGNED_UP.to_string());
                info!("auth: signed up");
                self.coordinator.notify(Notification::success(message.clone()));
                Ok(message)
            }
            Err(err) => {
                self.coordinator.notify(Notification::error(err.to_string()));
                Err(err)
            }
        }
    }

    /// Signs in, persists the session, then starts it on the coordinator.
    pub async fn login(&self, code: &str) -> Result<SessionState, AuthError> {
        let code = match validate_access_code(code) {
            Ok(code) => code,
            Err(err) => {
                self.coordinator.notify(Notification::error(err.to_string()));
                return Err(err);
            }
        };

        let (response, message) = match self.auth.login(code).await {
            Ok(ok) => ok,
            Err(err) => {
                warn!("auth: login failed: {err}");
                let err = AuthError::Rejected(
                    err.server_message().unwrap_or(MSG_LOGIN_FAILED).into(),
                );
                self.coordinator.notify(Notification::error(err.to_string()));
                return Err(err);
            }
        };

        let session = SessionState::new(response.token, response.user);
        self.sessions
            .save(&session)
            .await
            .map_err(|err| AuthError::Cache(err.to_string()))?;
        if let Some(message) = message {
            self.coordinator.notify(Notification::success(message));
        }
        info!("auth: signed in");
        self.coordinator.init_session(session.clone()).await;
        Ok(session)
    }

    /// Resumes a persisted session, if any. Returns whether one was found.
    pub async fn restore(&self) -> Result<bool, CacheError> {
        match self.sessions.load().await? {
            Some(session) if session.is_authenticated() => {
                self.coordinator.init_session(session).await;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    pub async fn logout(&self) -> Result<(), CacheError> {
        self.sessions.clear().await?;
        self.coordinator.teardown_session().await?;
        self.coordinator.notify(Notification::success(MSG_LOGGED_OUT));
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
