//! API credential handling.

use std::fmt;

use crate::BroadsheetError;

/// Default environment variable consulted by [`Credential::from_env`] callers.
pub const DEFAULT_ENV_VAR: &str = "NYTIMES_API_KEY";

/// An API key or bearer token.
///
/// The value is never printed by `Debug` or `Display`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wraps a credential value.
    ///
    /// # Errors
    ///
    /// Returns [`BroadsheetError::MissingCredential`] if the value is empty or blank.
    pub fn new(value: impl Into<String>) -> Result<Self, BroadsheetError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(BroadsheetError::MissingCredential {
                reason: "the supplied value is empty".to_string(),
            });
        }
        Ok(Self(value))
    }

    /// Reads the credential from the named environment variable.
    ///
    /// The lookup happens when this is called, never implicitly.
    ///
    /// # Errors
    ///
    /// Returns [`BroadsheetError::MissingCredential`] if the variable is unset or blank.
    pub fn from_env(var: &str) -> Result<Self, BroadsheetError> {
        let missing = || BroadsheetError::MissingCredential {
            reason: format!("{var} is unset or empty"),
        };
        let value = std::env::var(var).map_err(|_| missing())?;
        Self::new(value).map_err(|_| missing())
    }

    /// Returns the raw secret value.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_credential_rejected() {
        let err = Credential::new("   ").unwrap_err();
        assert!(matches!(err, BroadsheetError::MissingCredential { .. }));
        assert_eq!(
            err.to_string(),
            "Missing API credential: the supplied value is empty"
        );
        assert!(Credential::new("").is_err());
    }

    #[test]
    fn test_missing_env_var() {
        let err = Credential::from_env("BROADSHEET_TEST_UNSET_VARIABLE").unwrap_err();
        match err {
            BroadsheetError::MissingCredential { reason } => {
                assert_eq!(reason, "BROADSHEET_TEST_UNSET_VARIABLE is unset or empty");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_debug_redacts_value() {
        let credential = Credential::new("secret-key").unwrap();
        assert_eq!(format!("{credential:?}"), "Credential(***)");
        assert_eq!(credential.to_string(), "***");
        assert_eq!(credential.expose(), "secret-key");
    }
}
