//! Session-unique diagram identifiers.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Prefix of every allocated diagram id.
pub const ID_PREFIX: &str = "mermaid";

/// Identifier of one rendered (or attempted) diagram, e.g. `mermaid-0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DiagramId(String);

impl DiagramId {
    /// Wraps an existing id string without allocating a new number.
    #[must_use]
    pub fn from_raw(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DiagramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Monotonic id source shared by every slide of one page session.
///
/// Numbers are never handed out twice, so ids stay unique across re-renders
/// and slide transitions for the allocator's lifetime.
#[derive(Debug, Default)]
pub struct IdAllocator {
    next: AtomicU64,
}

impl IdAllocator {
    /// Creates an allocator whose first id is `mermaid-0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(0),
        }
    }

    /// Allocates the next id.
    pub fn allocate(&self) -> DiagramId {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        DiagramId(format!("{ID_PREFIX}-{n}"))
    }

    /// Number of ids handed out so far.
    #[must_use]
    pub fn allocated(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }
}
