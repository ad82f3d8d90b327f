//! # Drawing state
//!
//! The one piece of mutable application state: the current sketch and the selected color.
//! Applying a [`MappedEvent`] *replaces* the current sketch with a new value. Whatever was published
//! before stays valid and unchanged for anyone still holding it.

pub mod palette;

use crate::{
    color::Color,
    id::SketchFactory,
    input::MappedEvent,
    sketch::{EmptySketchError, Sketch},
};

#[derive(Clone, Debug)]
pub struct DrawingState {
    sketch: Sketch,
    selected_color: Color,
}
impl DrawingState {
    #[must_use]
    pub fn new(sketch: Sketch, selected_color: Color) -> Self {
        Self {
            sketch,
            selected_color,
        }
    }
    #[must_use]
    pub fn sketch(&self) -> &Sketch {
        &self.sketch
    }
    #[must_use]
    pub fn selected_color(&self) -> Color {
        self.selected_color
    }
    /// Change the color that the *next* stroke starts with. The stroke in progress keeps its own.
    pub fn select_color(&mut self, color: Color) {
        self.selected_color = color;
    }
    /// Apply an event, returning the resulting sketch.
    ///
    /// A new stroke starts in the selected color and its first point is the event's position.
    /// A continuation with no stroke to continue is a sequencing error from upstream. It is returned
    /// and the sketch is left as it was.
    pub fn try_apply(&mut self, event: MappedEvent) -> Result<&Sketch, EmptySketchError> {
        let base = if event.is_new_stroke {
            self.sketch.append_color(self.selected_color)
        } else {
            // Avoid a needless copy of the stroke list, `append_point` builds a fresh one anyhow.
            let id = self.sketch.id();
            std::mem::replace(&mut self.sketch, Sketch::with_id(id))
        };
        match base.append_point(event.position) {
            Ok(next) => {
                log::trace!("{} <- {:?}", next.id(), event);
                self.sketch = next;
                Ok(&self.sketch)
            }
            Err(e) => {
                // Put it back how we found it.
                self.sketch = base;
                Err(e)
            }
        }
    }
    /// Apply an event, logging and dropping it if it doesn't fit the current sketch.
    pub fn apply(&mut self, event: MappedEvent) -> &Sketch {
        if let Err(e) = self.try_apply(event) {
            log::warn!("dropped input event: {e}");
        }
        &self.sketch
    }
    /// Start over with a fresh, empty sketch.
    pub fn clear(&mut self, factory: &SketchFactory) -> &Sketch {
        self.sketch = factory.create_empty();
        log::debug!("cleared to {}", self.sketch.id());
        &self.sketch
    }
}
