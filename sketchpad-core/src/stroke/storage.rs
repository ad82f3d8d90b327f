//! # Shared point storage
//!
//! Every [`Stroke`](super::Stroke) derived from the same [`Stroke::create`](super::Stroke::create)
//! call by repeated appends shares one fixed-capacity, append-only buffer. Each stroke value
//! remembers how many points it *sees* (its length), and only ever reads that prefix.
//!
//! The buffer is split at a bump index. Slots before it are written exactly once and frozen, and may
//! be read at any time without taking any lock. Slots at or after it are only touched by a writer
//! holding the write lock, which readers never take. So reading a published stroke never waits on an
//! append, and appending never waits on a reader.
//!
//! A value may push onto the buffer only if the bump index equals its own length, i.e. nobody has
//! extended past it yet, and there is room left. Otherwise it forks: copies its prefix into a fresh
//! buffer of doubled capacity and pushes there. Thus a chain of appends is amortized O(1), and
//! branching from an old value costs one copy of the prefix, while no value ever observes another's
//! appends.

use super::Point;

/// Minimum number of points allocated for a buffer.
pub const MIN_CAPACITY: usize = 16;

/// Capacity to allocate to hold at least `len` points, doubling from [`MIN_CAPACITY`].
#[must_use]
pub fn capacity_for(len: usize) -> usize {
    len.max(1)
        .checked_next_power_of_two()
        .unwrap_or(usize::MAX)
        .max(MIN_CAPACITY)
}

pub struct SharedPoints {
    /// Never reallocated. `UnsafeCell` is `repr(transparent)`, so the frozen prefix is a `[Point]`.
    slots: Box<[std::cell::UnsafeCell<Point>]>,
    /// Write access guard. Readers never take this.
    write_access: parking_lot::Mutex<()>,
    /// Past-the-end of the frozen prefix. Indices < this are immutable, >= are only written under
    /// `write_access`.
    ///
    /// ***It is a logic error to store to this without holding `write_access`!***
    bump_position: std::sync::atomic::AtomicUsize,
}
// Safety: the only shared mutation is of slots at or past `bump_position`, done under
// `write_access`. Shared reads only reach slots before the (Acquire-loaded) `bump_position`, which
// are never written again.
unsafe impl Sync for SharedPoints {}

impl Default for SharedPoints {
    fn default() -> Self {
        Self::new()
    }
}
impl SharedPoints {
    #[must_use]
    pub fn new() -> Self {
        Self::from_points(std::iter::empty(), MIN_CAPACITY)
    }
    /// A buffer with `points` already frozen.
    fn from_points(points: impl Iterator<Item = Point>, capacity: usize) -> Self {
        let mut slots: Vec<_> = points.map(std::cell::UnsafeCell::new).collect();
        let len = slots.len();
        assert!(len <= capacity, "buffer overfilled");
        slots.resize_with(capacity, || std::cell::UnsafeCell::new(Point::ORIGIN));
        Self {
            slots: slots.into_boxed_slice(),
            write_access: parking_lot::Mutex::new(()),
            bump_position: std::sync::atomic::AtomicUsize::new(len),
        }
    }
    /// Current length of the frozen prefix.
    /// This is a hint - it may become immediately out-of-date!
    #[must_use]
    pub fn hint_len(&self) -> usize {
        self.bump_position
            .load(std::sync::atomic::Ordering::Relaxed)
    }
    /// Append a point after the first `seen` points.
    ///
    /// Returns `None` if the push happened in place, or `Some(fork)` with a new buffer holding
    /// `seen + 1` points if this buffer had already grown past `seen` or is full.
    ///
    /// # Panics
    /// If `seen` is larger than the frozen prefix. Strokes never see more than was written.
    pub fn push_after(&self, seen: usize, point: Point) -> Option<Self> {
        {
            let _write_access = self.write_access.lock();
            // Relaxed is fine, stores only happen under the lock we hold.
            let position = self
                .bump_position
                .load(std::sync::atomic::Ordering::Relaxed);
            assert!(seen <= position, "stroke sees beyond its storage");
            if position == seen && position < self.slots.len() {
                // Safety: `position` is past the frozen prefix, so no reader can reach this slot,
                // and we hold the write lock so no other writer can either.
                unsafe { *self.slots[position].get() = point };
                // Release - the write above must land before the slot becomes readable.
                self.bump_position
                    .store(position + 1, std::sync::atomic::Ordering::Release);
                return None;
            }
        }
        // Someone already appended past us (those slots aren't ours to touch) or we're out of room.
        let prefix = self.prefix(seen);
        Some(Self::from_points(
            prefix.iter().copied().chain(std::iter::once(point)),
            capacity_for(seen + 1),
        ))
    }
    /// The first `len` points. Never blocks.
    ///
    /// # Panics
    /// If `len` is past the frozen prefix.
    #[must_use]
    pub fn prefix(&self, len: usize) -> &[Point] {
        // Acquire, since the reads below rely on the writes published by this store.
        let position = self
            .bump_position
            .load(std::sync::atomic::Ordering::Acquire);
        assert!(len <= position, "stroke sees beyond its storage");
        // Safety: slots before `position` are frozen, and `len <= position <= slots.len()`.
        unsafe { std::slice::from_raw_parts(self.slots.as_ptr().cast::<Point>(), len) }
    }
    /// How many points fit before the next fork.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}
impl std::fmt::Debug for SharedPoints {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedPoints")
            .field("len", &self.hint_len())
            .field("capacity", &self.capacity())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod test {
    use super::{capacity_for, SharedPoints, MIN_CAPACITY};
    use crate::stroke::Point;
    #[test]
    fn capacities() {
        assert_eq!(capacity_for(0), MIN_CAPACITY);
        assert_eq!(capacity_for(16), 16);
        assert_eq!(capacity_for(17), 32);
        assert_eq!(capacity_for(100), 128);
    }
    #[test]
    fn in_place_then_fork() {
        let shared = SharedPoints::new();
        assert!(shared.push_after(0, Point::new(0.0, 0.0)).is_none());
        assert!(shared.push_after(1, Point::new(1.0, 0.0)).is_none());
        // Branch from the one-point view.
        let fork = shared.push_after(1, Point::new(9.0, 9.0)).unwrap();

        assert_eq!(
            shared.prefix(2),
            [Point::new(0.0, 0.0), Point::new(1.0, 0.0)]
        );
        assert_eq!(fork.prefix(2), [Point::new(0.0, 0.0), Point::new(9.0, 9.0)]);
        assert_eq!(fork.hint_len(), 2);
    }
    #[test]
    fn full_buffer_forks_doubled() {
        let shared = SharedPoints::new();
        let initial = shared.capacity();
        assert_eq!(initial, MIN_CAPACITY);
        for i in 0..initial {
            assert!(shared.push_after(i, Point::new(i as f32, 0.0)).is_none());
        }
        let grown = shared
            .push_after(initial, Point::new(initial as f32, 0.0))
            .unwrap();
        assert_eq!(grown.capacity(), initial * 2);
        assert_eq!(grown.hint_len(), initial + 1);
        assert!(grown
            .prefix(initial + 1)
            .iter()
            .enumerate()
            .all(|(i, point)| point.x == i as f32));
        // The full buffer is left as it was.
        assert_eq!(shared.hint_len(), initial);
    }
    #[test]
    fn push_while_reading() {
        let shared = SharedPoints::new();
        assert!(shared.push_after(0, Point::new(1.0, 1.0)).is_none());
        let read = shared.prefix(1);
        assert!(shared.push_after(1, Point::new(2.0, 2.0)).is_none());
        assert_eq!(read, [Point::new(1.0, 1.0)]);
        assert_eq!(shared.prefix(2)[1], Point::new(2.0, 2.0));
    }
    #[test]
    #[should_panic(expected = "beyond its storage")]
    fn overread() {
        let shared = SharedPoints::new();
        let _ = shared.push_after(3, Point::new(0.0, 0.0));
    }
}
