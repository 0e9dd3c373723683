//! Token storage trait abstraction.
//!
//! Credential tokens are opaque strings keyed by [`TokenKind`]. The store
//! performs no validation and its API is infallible: when the underlying
//! storage is unavailable, reads degrade to `None` and writes become no-ops,
//! leaving the client in an unauthenticated state rather than failing.

/// The three credential tokens the client knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Short-lived credential attached to authenticated requests.
    Access,
    /// Longer-lived credential exchanged for a new access token.
    Refresh,
    /// Fallback credential used when no access token is present.
    Session,
}

impl TokenKind {
    /// Fixed storage key for this token.
    pub fn key(&self) -> &'static str {
        match self {
            TokenKind::Access => "accessToken",
            TokenKind::Refresh => "refreshToken",
            TokenKind::Session => "sessionToken",
        }
    }

    /// All token kinds, in storage order.
    pub fn all() -> [TokenKind; 3] {
        [TokenKind::Access, TokenKind::Refresh, TokenKind::Session]
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Trait for token storage and retrieval.
///
/// Only [`TokenRefresher`](crate::auth::TokenRefresher) writes the access
/// token, and only the auth-failure path clears credentials; everything else
/// treats the store as read-only.
pub trait TokenStore: Send + Sync {
    /// Read a token. `None` when unset or when storage is unavailable.
    fn get(&self, kind: TokenKind) -> Option<String>;

    /// Write a token, replacing any existing value.
    fn set(&self, kind: TokenKind, value: &str);

    /// Remove a token. Removing an absent token is a no-op.
    fn clear(&self, kind: TokenKind);
}
