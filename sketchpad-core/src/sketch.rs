//! # Sketches
//!
//! An ordered list of strokes, oldest first. Like [`Stroke`], a sketch is a value: every "mutation"
//! hands back a new sketch with the same ID, sharing the untouched strokes (and their point storage)
//! with the receiver.
//!
//! Create them through a [`SketchFactory`](crate::id::SketchFactory).

use crate::{
    color::Color,
    id::SketchID,
    stroke::{Point, Stroke},
};

/// `append_point` requires a stroke to append to.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{0} has no strokes to append a point to")]
pub struct EmptySketchError(pub SketchID);

#[derive(Clone, Debug, PartialEq)]
pub struct Sketch {
    id: SketchID,
    strokes: Vec<Stroke>,
}
impl Sketch {
    pub(crate) fn with_id(id: SketchID) -> Self {
        Self {
            id,
            strokes: Vec::new(),
        }
    }
    #[must_use]
    pub fn id(&self) -> SketchID {
        self.id
    }
    /// All strokes, in the order they were started.
    #[must_use]
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }
    /// The stroke which [`Self::append_point`] extends. `None` if empty.
    #[must_use]
    pub fn last(&self) -> Option<&Stroke> {
        self.strokes.last()
    }
    /// Number of strokes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strokes.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }
    /// Total number of points across all strokes.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.strokes.iter().map(Stroke::len).sum()
    }
    /// Start a new, empty stroke of the given color.
    #[must_use = "returns a new sketch without modifying `self`"]
    pub fn append_color(&self, color: Color) -> Self {
        let mut strokes = Vec::with_capacity(self.strokes.len() + 1);
        strokes.extend_from_slice(&self.strokes);
        strokes.push(Stroke::create(color));
        log::debug!("{} started stroke #{} in {color}", self.id, strokes.len() - 1);
        Self {
            id: self.id,
            strokes,
        }
    }
    /// Extend the last stroke by one point.
    ///
    /// Fails if there is no stroke yet. Every stroke must be started by [`Self::append_color`].
    pub fn append_point(&self, point: Point) -> Result<Self, EmptySketchError> {
        let (last, rest) = self
            .strokes
            .split_last()
            .ok_or(EmptySketchError(self.id))?;
        let mut strokes = Vec::with_capacity(self.strokes.len());
        strokes.extend_from_slice(rest);
        strokes.push(last.append(point));
        Ok(Self {
            id: self.id,
            strokes,
        })
    }
}
