//! # Strokes
//!
//! A stroke is a single touch, from press to lift: an ordered run of points drawn in one color.
//! Strokes are values. [`Stroke::append`] returns a *new* stroke, and the receiver continues to see
//! exactly the points it saw before. See [`storage`] for how that stays cheap.

mod storage;

use crate::color::Color;

/// A position in surface-local, device-independent pixels.
#[derive(
    bytemuck::Pod,
    bytemuck::Zeroable,
    serde::Serialize,
    serde::Deserialize,
    Clone,
    Copy,
    PartialEq,
    Debug,
    Default,
)]
#[repr(C)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}
impl Point {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}
impl From<[f32; 2]> for Point {
    fn from([x, y]: [f32; 2]) -> Self {
        Self { x, y }
    }
}
impl From<Point> for [f32; 2] {
    fn from(value: Point) -> Self {
        [value.x, value.y]
    }
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("point index {index} out of range for stroke of {len} points")]
pub struct IndexOutOfRange {
    pub index: usize,
    pub len: usize,
}

#[derive(Clone)]
pub struct Stroke {
    color: Color,
    created_at: std::time::Instant,
    points: std::sync::Arc<storage::SharedPoints>,
    /// Number of points *this value* sees. The shared storage may hold more, from sibling values.
    len: usize,
}
impl Stroke {
    /// Create an empty stroke of the given color, timestamped now.
    #[must_use]
    pub fn create(color: Color) -> Self {
        Self {
            color,
            created_at: std::time::Instant::now(),
            points: std::sync::Arc::new(storage::SharedPoints::new()),
            len: 0,
        }
    }
    /// Returns a new stroke with `point` after all of this stroke's points.
    ///
    /// `self` is left untouched, and so is every other stroke value sharing its storage.
    #[must_use = "returns a new stroke without modifying `self`"]
    pub fn append(&self, point: Point) -> Self {
        let points = match self.points.push_after(self.len, point) {
            None => self.points.clone(),
            Some(fork) => {
                log::trace!("stroke branched at {} points, copying", self.len);
                std::sync::Arc::new(fork)
            }
        };
        Self {
            color: self.color,
            created_at: self.created_at,
            points,
            len: self.len + 1,
        }
    }
    /// Fetch a point, failing if out-of-bounds.
    pub fn point_at(&self, index: usize) -> Result<Point, IndexOutOfRange> {
        self.get(index).ok_or(IndexOutOfRange {
            index,
            len: self.len,
        })
    }
    /// Fetch a point. `None` if out-of-bounds.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Point> {
        self.points().get(index).copied()
    }
    /// Fetch the first point. `None` if empty.
    #[must_use]
    pub fn first(&self) -> Option<Point> {
        self.get(0)
    }
    /// Fetch the last point. `None` if empty.
    #[must_use]
    pub fn last(&self) -> Option<Point> {
        self.get(self.len.checked_sub(1)?)
    }
    /// Number of points in this stroke.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }
    #[must_use]
    pub fn created_at(&self) -> std::time::Instant {
        self.created_at
    }
    /// Number of points the underlying storage holds before an append must fork it.
    /// Independent of [`Self::len`].
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.points.capacity()
    }
    /// This stroke's points. Never blocks, and appends (to this value or any other) can't change them.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        self.points.prefix(self.len)
    }
    /// Copy out this stroke's points.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Point> {
        self.points().to_vec()
    }
    /// Total length of the polyline through every point.
    #[must_use]
    pub fn arc_length(&self) -> f32 {
        self.points()
            .windows(2)
            .map(|pair| pair[0].distance(pair[1]))
            .sum()
    }
    /// Do these two values share point storage?
    #[must_use]
    pub fn shares_storage(&self, other: &Self) -> bool {
        std::sync::Arc::ptr_eq(&self.points, &other.points)
    }
}
impl PartialEq for Stroke {
    fn eq(&self, other: &Self) -> bool {
        self.color == other.color
            && self.created_at == other.created_at
            && self.len == other.len
            && self.points() == other.points()
    }
}
impl std::fmt::Debug for Stroke {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stroke")
            .field("color", &self.color)
            .field("created_at", &self.created_at)
            .field("points", &self.to_vec())
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::{IndexOutOfRange, Point, Stroke};
    use crate::color::Color;

    fn stroke_of(points: &[[f32; 2]]) -> Stroke {
        points
            .iter()
            .fold(Stroke::create(Color::RED), |stroke, &point| {
                stroke.append(point.into())
            })
    }

    #[test]
    fn create_is_empty() {
        let stroke = Stroke::create(Color::BLUE);
        assert_eq!(stroke.len(), 0);
        assert!(stroke.is_empty());
        assert_eq!(stroke.color(), Color::BLUE);
        assert!(stroke.first().is_none());
        assert!(stroke.last().is_none());
    }
    #[test]
    fn append_law() {
        let base = stroke_of(&[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]);
        let p = Point::new(7.0, 8.0);
        let appended = base.append(p);

        assert_eq!(appended.len(), base.len() + 1);
        assert_eq!(appended.point_at(base.len()), Ok(p));
        for i in 0..base.len() {
            assert_eq!(appended.point_at(i), base.point_at(i));
        }
        assert_eq!(appended.color(), base.color());
        assert_eq!(appended.created_at(), base.created_at());
    }
    #[test]
    fn out_of_range() {
        let stroke = stroke_of(&[[0.0, 0.0]]);
        assert_eq!(
            stroke.point_at(1),
            Err(IndexOutOfRange { index: 1, len: 1 })
        );
        assert_eq!(
            Stroke::create(Color::BLACK).point_at(0),
            Err(IndexOutOfRange { index: 0, len: 0 })
        );
    }
    #[test]
    fn older_values_unaffected() {
        let one = stroke_of(&[[5.0, 5.0]]);
        let two = one.append(Point::new(10.0, 5.0));
        // Shares storage, since `one` was the furthest-along value.
        assert!(two.shares_storage(&one));

        // `one` sees none of `two`'s points
        assert_eq!(one.len(), 1);
        assert_eq!(one.to_vec(), [Point::new(5.0, 5.0)]);
        assert_eq!(one.get(1), None);

        // Branching from `one` again must not clobber `two`'s second point.
        let branch = one.append(Point::new(-1.0, -1.0));
        assert!(!branch.shares_storage(&one));
        assert_eq!(two.to_vec(), [Point::new(5.0, 5.0), Point::new(10.0, 5.0)]);
        assert_eq!(
            branch.to_vec(),
            [Point::new(5.0, 5.0), Point::new(-1.0, -1.0)]
        );
        // And extending the branch doesn't touch the original chain.
        let branch = branch.append(Point::new(-2.0, -2.0));
        assert_eq!(branch.len(), 3);
        assert_eq!(two.len(), 2);
        assert_eq!(one.len(), 1);
    }
    #[test]
    fn growth_invisible() {
        let mut stroke = Stroke::create(Color::BLACK);
        let initial_capacity = stroke.capacity();
        let mut snapshots = Vec::new();
        for i in 0..100u8 {
            snapshots.push(stroke.clone());
            stroke = stroke.append(Point::new(f32::from(i), 0.0));
        }
        assert_eq!(stroke.len(), 100);
        assert!(stroke.capacity() > initial_capacity);
        assert!(stroke.capacity() >= stroke.len());
        // Every snapshot still sees exactly its prefix, across reallocations.
        for (len, snapshot) in snapshots.iter().enumerate() {
            assert_eq!(snapshot.len(), len);
            assert!(snapshot
                .points()
                .iter()
                .enumerate()
                .all(|(i, point)| point.x == i as f32));
        }
    }
    #[test]
    fn arc_length() {
        let stroke = stroke_of(&[[0.0, 0.0], [3.0, 4.0], [3.0, 0.0]]);
        assert!((stroke.arc_length() - 9.0).abs() < f32::EPSILON);
        assert_eq!(Stroke::create(Color::BLACK).arc_length(), 0.0);
    }
    #[test]
    fn equality() {
        let a = stroke_of(&[[1.0, 1.0]]);
        let b = a.clone();
        assert_eq!(a, b);
        assert_ne!(a, a.append(Point::new(2.0, 2.0)));
    }
    #[test]
    fn readable_from_other_threads() {
        let stroke = stroke_of(&[[1.0, 1.0], [2.0, 2.0]]);
        let copy = stroke.clone();
        let handle = std::thread::spawn(move || copy.to_vec());
        // Extending here doesn't change what the other thread sees.
        let _longer = stroke.append(Point::new(3.0, 3.0));
        assert_eq!(
            handle.join().unwrap(),
            [Point::new(1.0, 1.0), Point::new(2.0, 2.0)]
        );
    }
    #[test]
    fn append_while_borrowed() {
        let stroke = stroke_of(&[[1.0, 1.0], [2.0, 2.0]]);
        let points = stroke.points();
        // Extends the shared buffer in place, right past the slice we hold.
        let longer = stroke.append(points[0]);
        let branch = stroke.append(points[1]);
        assert_eq!(points, [Point::new(1.0, 1.0), Point::new(2.0, 2.0)]);
        assert!(longer.shares_storage(&stroke));
        assert_eq!(longer.last(), Some(Point::new(1.0, 1.0)));
        assert_eq!(branch.last(), Some(Point::new(2.0, 2.0)));
    }
    #[test]
    fn reader_never_blocks_append() {
        let stroke = stroke_of(&[[1.0, 1.0]]);
        let reader_copy = stroke.clone();
        let (reading_tx, reading_rx) = std::sync::mpsc::channel();
        let (appended_tx, appended_rx) = std::sync::mpsc::channel::<()>();

        let reader = std::thread::spawn(move || {
            let points = reader_copy.points();
            reading_tx.send(()).unwrap();
            // Hold the borrow until the other side has appended.
            appended_rx
                .recv_timeout(std::time::Duration::from_secs(5))
                .expect("append stalled behind a reader");
            points.to_vec()
        });
        reading_rx.recv().unwrap();
        let mut longer = stroke.clone();
        for i in 0..64u8 {
            longer = longer.append(Point::new(f32::from(i), 0.0));
        }
        appended_tx.send(()).unwrap();

        assert_eq!(reader.join().unwrap(), [Point::new(1.0, 1.0)]);
        assert_eq!(longer.len(), 65);
        assert_eq!(stroke.len(), 1);
    }
}
