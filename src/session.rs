use crate::error::{MigrateError, Result};
use chrono::{DateTime, Utc};

/// Stored credential pair the external login layer checks against.
#[derive(Debug, Clone)]
pub struct Credential {
    pub user: String,
    pub passcode: String,
}

/// Proof of an authenticated user. The migration entry point only accepts a
/// `Session`, the fields are private, and the only constructors are
/// `authenticate` and the explicitly-named `local`; the core never reads
/// global authentication state.
#[derive(Debug, Clone)]
pub struct Session {
    user: String,
    authenticated_at: DateTime<Utc>,
}

impl Session {
    pub fn authenticate(user: &str, passcode: &str, expected: &Credential) -> Result<Self> {
        if user == expected.user && passcode == expected.passcode {
            Ok(Self {
                user: user.to_string(),
                authenticated_at: Utc::now(),
            })
        } else {
            Err(MigrateError::Unauthorized(format!(
                "invalid credentials for user '{}'",
                user
            )))
        }
    }

    /// Session for a trusted local invocation (the CLI operator).
    pub fn local() -> Self {
        Self {
            user: "local".to_string(),
            authenticated_at: Utc::now(),
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn authenticated_at(&self) -> DateTime<Utc> {
        self.authenticated_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credential() -> Credential {
        Credential {
            user: "ops".to_string(),
            passcode: "migrate-2024".to_string(),
        }
    }

    #[test]
    fn test_valid_credentials_open_session() {
        let session = Session::authenticate("ops", "migrate-2024", &credential()).unwrap();
        assert_eq!(session.user(), "ops");
        assert!(session.authenticated_at() <= Utc::now());
    }

    #[test]
    fn test_wrong_passcode_rejected() {
        let err = Session::authenticate("ops", "wrong", &credential()).unwrap_err();
        assert!(matches!(err, MigrateError::Unauthorized(_)));
    }

    #[test]
    fn test_unknown_user_rejected() {
        assert!(Session::authenticate("intruder", "migrate-2024", &credential()).is_err());
    }

    #[test]
    fn test_local_session_is_tagged() {
        assert_eq!(Session::local().user(), "local");
    }
}
