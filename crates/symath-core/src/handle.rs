//! Wildcard identities.
//!
//! A wildcard is equal only to itself. Each call to [`Wildcard::new`] takes
//! the next index from a process-wide counter, so two wildcards sharing a
//! name never collide while one wildcard reused inside a pattern still has
//! to bind consistently.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

static NEXT_WILDCARD: AtomicU32 = AtomicU32::new(0);

/// Unique identifier of a wildcard instance.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WildcardId(u32);

impl WildcardId {
    fn fresh() -> Self {
        let index = NEXT_WILDCARD.fetch_add(1, Ordering::Relaxed);
        assert!(index < u32::MAX, "Wildcard capacity exceeded");
        Self(index)
    }

    /// Returns the raw index of this id.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for WildcardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Wild({})", self.0)
    }
}

impl fmt::Display for WildcardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.0)
    }
}

/// A pattern placeholder.
///
/// Equality and hashing use the id only; the name is for printing and for
/// [`Bindings::by_name`](crate::Bindings::by_name) lookups.
#[derive(Clone)]
pub struct Wildcard {
    id: WildcardId,
    name: Arc<str>,
}

impl Wildcard {
    /// Creates a fresh wildcard. Every call yields a distinct identity.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            id: WildcardId::fresh(),
            name: Arc::from(name),
        }
    }

    /// The identity of this wildcard.
    #[must_use]
    pub fn id(&self) -> WildcardId {
        self.id
    }

    /// The display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for Wildcard {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Wildcard {}

impl std::hash::Hash for Wildcard {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Wildcard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.id)
    }
}
