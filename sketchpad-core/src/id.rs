//! # IDs
//! Every [`Sketch`](crate::sketch::Sketch) carries a [`SketchID`], handed out by a [`SketchFactory`].
//!
//! The factory *is* the counter. There is no hidden global: whoever creates sketches holds the
//! factory (usually exactly one per process) and passes it by reference. IDs are unique and strictly
//! increasing per factory, starting at zero. They are *not* unique across factories nor across runs
//! of the program, so don't persist them.

use crate::sketch::Sketch;

/// Identifies a sketch for the lifetime of the [`SketchFactory`] that made it.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SketchID(u64);
impl SketchID {
    /// Get the raw numeric value of this ID.
    #[must_use]
    pub fn id(self) -> u64 {
        self.0
    }
}
impl std::fmt::Display for SketchID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sketch#{}", self.0)
    }
}
impl std::fmt::Debug for SketchID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <Self as std::fmt::Display>::fmt(self, f)
    }
}

/// Source of [`SketchID`]s, and thus of new empty sketches.
///
/// Shareable between threads, though the drawing loop only ever touches it from one.
#[derive(Debug, Default)]
pub struct SketchFactory {
    next: std::sync::atomic::AtomicU64,
}
impl SketchFactory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    /// Create a new, stroke-less sketch with the next ID.
    #[must_use]
    pub fn create_empty(&self) -> Sketch {
        let id = self.next_id();
        log::trace!("created {id}");
        Sketch::with_id(id)
    }
    /// Reserve the next ID without building a sketch.
    ///
    /// # Panics
    /// If every `u64` ID has been handed out. At one ID per nanosecond that takes over five
    /// centuries, so this is not a practical concern.
    pub fn next_id(&self) -> SketchID {
        // Ordering between threads doesn't matter, only uniqueness.
        let id = self
            .next
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        assert_ne!(id, u64::MAX, "SketchID overflow");
        SketchID(id)
    }
    /// Peek the ID the next call to [`Self::create_empty`] will use.
    #[must_use]
    pub fn peek(&self) -> SketchID {
        SketchID(self.next.load(std::sync::atomic::Ordering::Relaxed))
    }
    /// Restart numbering from zero. IDs from before the reset may be repeated!
    pub fn reset(&self) {
        self.next.store(0, std::sync::atomic::Ordering::Relaxed);
    }
}
