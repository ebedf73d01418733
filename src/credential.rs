//! Database password handling.
//!
//! The password is read once from `SUPABASE_DATABASE_PASSWORD` and kept in a
//! `Zeroizing` container, so the memory is cleared when the credential is
//! dropped. `Debug` output never contains the secret.

use crate::error::{ToolError, ToolResult};
use zeroize::Zeroizing;

/// Environment variable holding the database password.
pub const PASSWORD_ENV_VAR: &str = "SUPABASE_DATABASE_PASSWORD";

/// A non-empty database password.
#[derive(Clone)]
pub struct Credential {
    secret: Zeroizing<String>,
}

impl Credential {
    /// Wrap a password, rejecting empty values.
    pub fn new(secret: impl Into<String>) -> ToolResult<Self> {
        let secret = Zeroizing::new(secret.into());
        if secret.is_empty() {
            return Err(missing());
        }
        Ok(Self { secret })
    }

    /// Read the password through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> ToolResult<Self>
    where
        F: FnOnce(&str) -> Option<String>,
    {
        match lookup(PASSWORD_ENV_VAR) {
            Some(value) => Self::new(value),
            None => Err(missing()),
        }
    }

    /// Borrow the secret. Only call this at the point it is handed to a driver or child process.
    pub fn expose(&self) -> &str {
        &self.secret
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("secret", &"****")
            .finish()
    }
}

fn missing() -> ToolError {
    ToolError::missing_credential(PASSWORD_ENV_VAR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_from_lookup() {
        let credential = Credential::from_lookup(|key| {
            assert_eq!(key, PASSWORD_ENV_VAR);
            Some("hunter2".to_string())
        })
        .unwrap();
        assert_eq!(credential.expose(), "hunter2");
    }

    #[test]
    fn test_missing_credential_is_config_error() {
        let err = Credential::from_lookup(|_| None).unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains(PASSWORD_ENV_VAR));
    }

    #[test]
    fn test_empty_credential_is_config_error() {
        let err = Credential::from_lookup(|_| Some(String::new())).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_debug_masks_secret() {
        let credential = Credential::new("hunter2").unwrap();
        let debug = format!("{:?}", credential);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("****"));
    }
}
