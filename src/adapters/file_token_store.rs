//! File-backed token storage.
//!
//! Persists the three credential tokens to `~/.lantern/.tokens.json` so
//! they survive process restarts. All failure modes degrade silently:
//! an unreadable or corrupt file reads as "no tokens", and a failed
//! write leaves the previous contents in place.

use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::traits::{TokenKind, TokenStore};

/// The token directory name.
const TOKEN_DIR: &str = ".lantern";

/// The token file name.
const TOKEN_FILE: &str = ".tokens.json";

/// On-disk representation. Keys match the fixed names in
/// [`TokenKind::key`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
struct TokenFile {
    #[serde(rename = "accessToken", default, skip_serializing_if = "Option::is_none")]
    access_token: Option<String>,
    #[serde(rename = "refreshToken", default, skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
    #[serde(rename = "sessionToken", default, skip_serializing_if = "Option::is_none")]
    session_token: Option<String>,
}

impl TokenFile {
    fn get(&self, kind: TokenKind) -> Option<&String> {
        match kind {
            TokenKind::Access => self.access_token.as_ref(),
            TokenKind::Refresh => self.refresh_token.as_ref(),
            TokenKind::Session => self.session_token.as_ref(),
        }
    }

    fn set(&mut self, kind: TokenKind, value: Option<String>) {
        match kind {
            TokenKind::Access => self.access_token = value,
            TokenKind::Refresh => self.refresh_token = value,
            TokenKind::Session => self.session_token = value,
        }
    }
}

/// Token store persisting to a JSON file in the user's home directory.
#[derive(Debug)]
pub struct FileTokenStore {
    /// Path to the token file.
    token_path: PathBuf,
}

impl FileTokenStore {
    /// Create a store at the default location.
    ///
    /// Returns `None` if the home directory cannot be determined.
    pub fn new() -> Option<Self> {
        let home = dirs::home_dir()?;
        let token_path = home.join(TOKEN_DIR).join(TOKEN_FILE);
        Some(Self { token_path })
    }

    /// Create a store at a custom path.
    pub fn with_path(token_path: PathBuf) -> Self {
        Self { token_path }
    }

    /// Get the path to the token file.
    pub fn token_path(&self) -> &Path {
        &self.token_path
    }

    /// Load the token file, degrading to empty on any failure.
    fn load(&self) -> TokenFile {
        if !self.token_path.exists() {
            return TokenFile::default();
        }

        let file = match File::open(&self.token_path) {
            Ok(f) => f,
            Err(_) => return TokenFile::default(),
        };

        let reader = BufReader::new(file);
        match serde_json::from_reader(reader) {
            Ok(tokens) => tokens,
            Err(_) => TokenFile::default(),
        }
    }

    /// Save the token file, creating the parent directory if needed.
    ///
    /// Returns `true` if successful, `false` otherwise.
    fn store(&self, tokens: &TokenFile) -> bool {
        if let Some(parent) = self.token_path.parent() {
            if !parent.exists() && fs::create_dir_all(parent).is_err() {
                return false;
            }
        }

        let file = match File::create(&self.token_path) {
            Ok(f) => f,
            Err(_) => return false,
        };

        let mut writer = BufWriter::new(file);
        if serde_json::to_writer_pretty(&mut writer, tokens).is_err() {
            return false;
        }

        writer.flush().is_ok()
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, kind: TokenKind) -> Option<String> {
        self.load().get(kind).cloned()
    }

    fn set(&self, kind: TokenKind, value: &str) {
        let mut tokens = self.load();
        tokens.set(kind, Some(value.to_string()));
        if !self.store(&tokens) {
            tracing::warn!(token = %kind, "failed to persist token");
        }
    }

    fn clear(&self, kind: TokenKind) {
        let mut tokens = self.load();
        tokens.set(kind, None);
        if !self.store(&tokens) {
            tracing::warn!(token = %kind, "failed to persist token removal");
        }
    }
}
