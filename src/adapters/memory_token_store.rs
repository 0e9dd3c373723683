//! In-memory token storage.
//!
//! Process-lifetime storage used in tests and as the fallback when no
//! home directory is available for [`FileTokenStore`](super::FileTokenStore).

use std::collections::HashMap;
use std::sync::Mutex;

use crate::traits::{TokenKind, TokenStore};

/// Token store keeping values in a process-local map.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: Mutex<HashMap<&'static str, String>>,
}

impl MemoryTokenStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with tokens.
    pub fn with_tokens(
        access: Option<&str>,
        refresh: Option<&str>,
        session: Option<&str>,
    ) -> Self {
        let store = Self::new();
        if let Some(value) = access {
            store.set(TokenKind::Access, value);
        }
        if let Some(value) = refresh {
            store.set(TokenKind::Refresh, value);
        }
        if let Some(value) = session {
            store.set(TokenKind::Session, value);
        }
        store
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, kind: TokenKind) -> Option<String> {
        self.tokens.lock().unwrap().get(kind.key()).cloned()
    }

    fn set(&self, kind: TokenKind, value: &str) {
        self.tokens
            .lock()
            .unwrap()
            .insert(kind.key(), value.to_string());
    }

    fn clear(&self, kind: TokenKind) {
        self.tokens.lock().unwrap().remove(kind.key());
    }
}
