//! Access gate: who may use the ledger.
//!
//! Credential checks go through the [`CredentialVerifier`] trait so the
//! backing table can be swapped. A successful check yields an
//! [`AuthContext`], which every ledger operation takes as proof of login.
use std::collections::HashMap;

use serde::Serialize;

use crate::{EngineError, ResultEngine};

/// Checks a username/password pair.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, username: &str, password: &str) -> bool;
}

/// Fixed username → password table, usually read from settings.
///
/// Passwords are compared as plain text; this table is meant for a single
/// household or shop, not for exposure on a network.
#[derive(Clone, Debug, Default)]
pub struct StaticCredentials {
    users: HashMap<String, String>,
}

impl StaticCredentials {
    pub fn new(users: HashMap<String, String>) -> Self {
        Self { users }
    }

    #[must_use]
    pub fn user(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.users.insert(username.into(), password.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl CredentialVerifier for StaticCredentials {
    fn verify(&self, username: &str, password: &str) -> bool {
        self.users
            .get(username)
            .is_some_and(|expected| expected == password)
    }
}

/// Proof that a user logged in. Only [`authenticate`] creates one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AuthContext {
    username: String,
}

impl AuthContext {
    pub fn username(&self) -> &str {
        &self.username
    }
}

pub fn authenticate(
    verifier: &dyn CredentialVerifier,
    username: &str,
    password: &str,
) -> ResultEngine<AuthContext> {
    if username.is_empty() || password.is_empty() || !verifier.verify(username, password) {
        tracing::warn!(username, "login rejected");
        return Err(EngineError::Unauthorized);
    }
    tracing::info!(username, "login accepted");
    Ok(AuthContext {
        username: username.to_string(),
    })
}

/// Login state of one front-end session.
///
/// Transitions consume the old value and return the new one; nothing is
/// stored globally.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    auth: Option<AuthContext>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Logs in, replacing any previous login. A failed attempt keeps the
    /// session as it was and returns the error.
    pub fn login(
        self,
        verifier: &dyn CredentialVerifier,
        username: &str,
        password: &str,
    ) -> Result<Session, (Session, EngineError)> {
        match authenticate(verifier, username, password) {
            Ok(ctx) => Ok(Session { auth: Some(ctx) }),
            Err(err) => Err((self, err)),
        }
    }

    #[must_use]
    pub fn logout(self) -> Session {
        if let Some(ctx) = &self.auth {
            tracing::info!(username = ctx.username(), "logged out");
        }
        Session::anonymous()
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.is_some()
    }

    pub fn require(&self) -> ResultEngine<&AuthContext> {
        self.auth.as_ref().ok_or(EngineError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> StaticCredentials {
        StaticCredentials::default()
            .user("admin", "admin123")
            .user("user", "user123")
    }

    #[test]
    fn verify_checks_both_fields() {
        let creds = table();
        assert!(creds.verify("admin", "admin123"));
        assert!(!creds.verify("admin", "user123"));
        assert!(!creds.verify("ghost", "admin123"));
    }

    #[test]
    fn authenticate_rejects_empty_credentials() {
        let creds = StaticCredentials::default().user("", "");
        assert_eq!(authenticate(&creds, "", ""), Err(EngineError::Unauthorized));
    }

    #[test]
    fn session_login_logout_cycle() {
        let creds = table();
        let session = Session::anonymous();
        assert_eq!(session.require(), Err(EngineError::Unauthorized));

        let session = session.login(&creds, "user", "user123").unwrap();
        assert_eq!(session.require().unwrap().username(), "user");

        let session = session.logout();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn failed_login_keeps_previous_session() {
        let creds = table();
        let session = Session::anonymous().login(&creds, "admin", "admin123").unwrap();
        let (session, err) = session.login(&creds, "admin", "wrong").unwrap_err();
        assert_eq!(err, EngineError::Unauthorized);
        assert_eq!(session.require().unwrap().username(), "admin");
    }
}
