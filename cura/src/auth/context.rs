//! Auth capability handed to protected commands.

use anyhow::{anyhow, Result};

use super::store::TokenStore;

/// Credential capability built once at startup.
///
/// Protected commands take the token from here instead of re-reading global
/// state; the check happens before any request is built, so a missing or
/// concurrently removed token degrades to a login hint instead of a failed
/// call.
#[derive(Debug, Clone)]
pub struct AuthContext {
    token: Option<String>,
}

impl AuthContext {
    /// Load the capability from the token store.
    pub fn load(store: &TokenStore) -> Result<Self> {
        Ok(Self::new(store.load()?))
    }

    /// Build directly from an optional token.
    pub const fn new(token: Option<String>) -> Self {
        Self { token }
    }

    /// The bearer token, or a "please log in" error.
    pub fn bearer(&self) -> Result<&str> {
        self.token
            .as_deref()
            .ok_or_else(|| anyhow!("Not logged in. Run `cura login <email>` first."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_requires_a_token() {
        let auth = AuthContext::new(None);
        let err = auth.bearer().unwrap_err();
        assert!(err.to_string().contains("cura login"));

        let auth = AuthContext::new(Some("tok".to_string()));
        assert_eq!(auth.bearer().unwrap(), "tok");
    }
}
