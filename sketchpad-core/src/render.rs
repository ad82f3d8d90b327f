//! # Rendering helpers
//!
//! Drawing is up to the host. These are the shapes it needs: every stroke as a polyline through its
//! points, in stroke order, in the stroke's color, at one fixed width.

use crate::{
    color::Color,
    sketch::Sketch,
    stroke::{Point, Stroke},
};

/// Width, in surface pixels, strokes are drawn at unless configured otherwise.
pub const DEFAULT_STROKE_WIDTH: f32 = 5.0;

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct LineSegment {
    pub start: Point,
    pub end: Point,
    pub color: Color,
    pub width: f32,
}

/// One segment per consecutive pair of points, for every stroke in order.
///
/// Strokes with fewer than two points produce nothing.
pub fn segments(sketch: &Sketch, width: f32) -> impl Iterator<Item = LineSegment> + '_ {
    sketch
        .strokes()
        .iter()
        .flat_map(move |stroke| stroke_segments(stroke, width))
}

/// Segments of a single stroke.
#[must_use]
pub fn stroke_segments(stroke: &Stroke, width: f32) -> Vec<LineSegment> {
    let color = stroke.color();
    stroke
        .points()
        .windows(2)
        .map(|pair| LineSegment {
            start: pair[0],
            end: pair[1],
            color,
            width,
        })
        .collect()
}

/// The stroke's points as flat `[x0, y0, x1, y1, ...]`, ready for a vertex buffer.
#[must_use]
pub fn polyline(stroke: &Stroke) -> Vec<f32> {
    bytemuck::cast_slice::<Point, f32>(stroke.points()).to_vec()
}
