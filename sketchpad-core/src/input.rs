//! # Input mapping
//!
//! Turns the raw pointer stream of a drawing surface into the `(position, is_new_stroke)` events a
//! [`DrawingState`](crate::state::DrawingState) consumes.
//!
//! The first pointer to press is tracked until it lifts. Every other pointer is ignored meanwhile.
//! Every emitted position is clamped into the surface, so a fast drag leaving the widget still lands
//! on its edge.

use crate::{
    stroke::Point,
    util::{clamp_to_extent, FiniteF32, FiniteF32Error},
};

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceSizeError {
    #[error("surface width {0}")]
    Width(FiniteF32Error),
    #[error("surface height {0}")]
    Height(FiniteF32Error),
}

/// Extent of the drawable surface, in the same units as [`Point`]. Never negative.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct SurfaceSize {
    width: FiniteF32,
    height: FiniteF32,
}
impl SurfaceSize {
    pub const ZERO: Self = Self {
        width: FiniteF32::ZERO,
        height: FiniteF32::ZERO,
    };
    pub fn new(width: f32, height: f32) -> Result<Self, SurfaceSizeError> {
        Ok(Self {
            width: FiniteF32::new_non_negative(width).map_err(SurfaceSizeError::Width)?,
            height: FiniteF32::new_non_negative(height).map_err(SurfaceSizeError::Height)?,
        })
    }
    #[must_use]
    pub fn width(&self) -> f32 {
        self.width.get()
    }
    #[must_use]
    pub fn height(&self) -> f32 {
        self.height.get()
    }
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        (0.0..=self.width()).contains(&point.x) && (0.0..=self.height()).contains(&point.y)
    }
}

/// Clamp x into `[0, width]` and y into `[0, height]`, independently.
///
/// NaN coordinates land on zero. Points already on the surface are returned unchanged.
#[must_use]
pub fn clamp(position: Point, surface: SurfaceSize) -> Point {
    Point {
        x: clamp_to_extent(position.x, surface.width),
        y: clamp_to_extent(position.y, surface.height),
    }
}

/// Distinguishes simultaneous pointers (fingers, pens, mice) on one surface.
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, Debug, Default, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct PointerId(pub u64);

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerKind {
    /// Pointer pressed. Always considered pressed, whatever the event's flag says.
    Down,
    Move,
    /// Pointer lifted or the gesture was cancelled. Always considered released.
    Up,
}

/// A raw sample, as reported by the host surface.
#[derive(Copy, Clone, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
pub struct PointerEvent {
    #[serde(default)]
    pub pointer: PointerId,
    pub kind: PointerKind,
    pub position: Point,
    /// Only meaningful for [`PointerKind::Move`]. Omitted means held.
    #[serde(default = "held")]
    pub pressed: bool,
}
fn held() -> bool {
    true
}
impl PointerEvent {
    #[must_use]
    pub fn down(x: f32, y: f32) -> Self {
        Self {
            pointer: PointerId::default(),
            kind: PointerKind::Down,
            position: Point::new(x, y),
            pressed: true,
        }
    }
    #[must_use]
    pub fn moved(x: f32, y: f32, pressed: bool) -> Self {
        Self {
            pointer: PointerId::default(),
            kind: PointerKind::Move,
            position: Point::new(x, y),
            pressed,
        }
    }
    /// A release at the given position.
    #[must_use]
    pub fn up(x: f32, y: f32) -> Self {
        Self {
            pointer: PointerId::default(),
            kind: PointerKind::Up,
            position: Point::new(x, y),
            pressed: false,
        }
    }
    #[must_use]
    pub fn with_pointer(self, pointer: PointerId) -> Self {
        Self { pointer, ..self }
    }
    /// Whether the pointer is held down *after* this event.
    #[must_use]
    pub fn is_pressed(&self) -> bool {
        match self.kind {
            PointerKind::Down => true,
            PointerKind::Up => false,
            PointerKind::Move => self.pressed,
        }
    }
}

/// A classified sample: where to draw, and whether it begins a new stroke.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct MappedEvent {
    pub position: Point,
    pub is_new_stroke: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum MapperState {
    /// Waiting for a pointer to press.
    Idle,
    /// Following the pointer that pressed first.
    Tracking(PointerId),
}

#[derive(Debug)]
pub struct InputMapper {
    state: MapperState,
    surface: SurfaceSize,
}
impl InputMapper {
    #[must_use]
    pub fn new(surface: SurfaceSize) -> Self {
        Self {
            state: MapperState::Idle,
            surface,
        }
    }
    #[must_use]
    pub fn state(&self) -> MapperState {
        self.state
    }
    #[must_use]
    pub fn surface(&self) -> SurfaceSize {
        self.surface
    }
    /// The surface was resized. Later samples clamp to the new size, an active stroke continues.
    pub fn set_surface(&mut self, surface: SurfaceSize) {
        self.surface = surface;
    }
    /// Forget any tracked pointer. It must lift and press again before it draws.
    pub fn reset(&mut self) {
        if let MapperState::Tracking(pointer) = self.state {
            log::debug!("input mapper reset while tracking {pointer:?}");
        }
        self.state = MapperState::Idle;
    }
    /// Classify a single sample. Zero or one event out per sample in.
    pub fn map(&mut self, event: &PointerEvent) -> Option<MappedEvent> {
        match self.state {
            MapperState::Idle => {
                if event.kind != PointerKind::Down {
                    // Hover, or the tail of a gesture we never saw start.
                    return None;
                }
                self.state = MapperState::Tracking(event.pointer);
                Some(MappedEvent {
                    position: clamp(event.position, self.surface),
                    is_new_stroke: true,
                })
            }
            MapperState::Tracking(tracked) => {
                if event.pointer != tracked {
                    log::trace!("ignoring {:?} while tracking {tracked:?}", event.pointer);
                    return None;
                }
                if !event.is_pressed() {
                    self.state = MapperState::Idle;
                    return None;
                }
                let is_new_stroke = event.kind == PointerKind::Down;
                if is_new_stroke {
                    // Missed the lift somewhere.
                    log::warn!("{tracked:?} pressed again without lifting, starting a new stroke");
                }
                Some(MappedEvent {
                    position: clamp(event.position, self.surface),
                    is_new_stroke,
                })
            }
        }
    }
    /// Classify each sample in order, calling `on_event` for every emitted event.
    pub fn map_with<'a>(
        &mut self,
        events: impl IntoIterator<Item = &'a PointerEvent>,
        mut on_event: impl FnMut(MappedEvent),
    ) {
        for event in events {
            if let Some(mapped) = self.map(event) {
                on_event(mapped);
            }
        }
    }
    /// Classify a whole frame of samples at once.
    pub fn map_frame(&mut self, events: &[PointerEvent]) -> smallvec::SmallVec<[MappedEvent; 8]> {
        let mut out = smallvec::SmallVec::new();
        self.map_with(events, |mapped| out.push(mapped));
        out
    }
}
