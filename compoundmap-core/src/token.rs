use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

/// A value compared only by identity, never by content.
///
/// Each call to [`Token::new`] mints a fresh identity; cloning a token
/// preserves it. The description is not part of the identity - two tokens
/// created from the same description are still distinct. It is only used
/// for rendering, and as the ordering fallback when tokens are compared
/// (see [`compare`](crate::compare)).
#[derive(Clone)]
pub struct Token {
    id: u64,
    description: Arc<str>,
}

impl Token {
    /// Mints a token with a fresh identity.
    pub fn new(description: impl Into<Arc<str>>) -> Self {
        Token {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            description: description.into(),
        }
    }

    /// Returns the description this token was created with.
    pub fn description(&self) -> &str {
        &self.description
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Token {}

impl std::hash::Hash for Token {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token({}#{})", self.description, self.id)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token({})", self.description)
    }
}
