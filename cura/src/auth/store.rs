//! On-disk storage for the bearer token.
//!
//! The browser client kept the token in local storage; the terminal
//! equivalent is a plain file under the user's config directory, written by
//! login, removed by logout, and read once at startup.

use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::{Context, Result};

const APP_DIR: &str = "cura";
const TOKEN_FILE: &str = "token";

/// Stores the bearer token at a fixed path.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Store rooted at the default config location (`<config dir>/cura/token`).
    pub fn default_location() -> Result<Self> {
        let dir = dirs::config_dir().context("Could not find config directory")?;
        Ok(Self::at(dir.join(APP_DIR).join(TOKEN_FILE)))
    }

    /// Store at an explicit path.
    pub const fn at(path: PathBuf) -> Self {
        Self { path }
    }

    /// Read the stored token.
    ///
    /// A missing file, or one emptied by a concurrent logout, reads as
    /// `None` rather than an error so callers fall through to the login
    /// hint.
    pub fn load(&self) -> Result<Option<String>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Failed to read {}", self.path.display()))
            }
        };

        let token = content.trim();
        if token.is_empty() {
            return Ok(None);
        }
        Ok(Some(token.to_string()))
    }

    /// Persist a token, creating parent directories as needed.
    pub fn save(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(&self.path, token)
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }

    /// Remove the stored token. Removing an absent token is not an error.
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => {
                Err(err).with_context(|| format!("Failed to remove {}", self.path.display()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> TokenStore {
        TokenStore::at(dir.path().join("nested").join("token"))
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.save("tok-123").unwrap();
        assert_eq!(store.load().unwrap(), Some("tok-123".to_string()));
    }

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(store_in(&dir).load().unwrap(), None);
    }

    #[test]
    fn whitespace_only_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.save("  \n").unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.save("tok").unwrap();
        store.clear().unwrap();
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }
}
