//! # Drawing session
//!
//! Owns everything between the surface and the renderer: the input mapper, the palette selection,
//! the drawing state, and the slot the current sketch is published through.

use crate::surface::{PointerFrame, UiRequest};
use sketchpad_core::{
    state::{palette::Palette, DrawingState},
    InputMapper, Sketch, SketchFactory, SurfaceSize,
};
use std::sync::Arc;

/// Where the latest sketch is published for readers, like a renderer on another thread.
///
/// Readers get their own clone of the value, which is cheap as strokes share point storage, and
/// which never changes under them.
#[derive(Debug)]
pub struct SketchSlot(parking_lot::RwLock<Sketch>);
impl SketchSlot {
    #[must_use]
    pub fn new(sketch: Sketch) -> Self {
        Self(parking_lot::RwLock::new(sketch))
    }
    #[must_use]
    pub fn get(&self) -> Sketch {
        self.0.read().clone()
    }
    /// Replace the published value. The old value is dropped once its last reader lets go.
    pub fn publish(&self, sketch: Sketch) {
        *self.0.write() = sketch;
    }
}

pub struct Session {
    factory: Arc<SketchFactory>,
    mapper: InputMapper,
    palette: Palette,
    state: DrawingState,
    slot: Arc<SketchSlot>,
}
impl Session {
    /// Start a session on a fresh, empty sketch.
    #[must_use]
    pub fn new(factory: Arc<SketchFactory>, surface: SurfaceSize, palette: Palette) -> Self {
        let sketch = factory.create_empty();
        let slot = Arc::new(SketchSlot::new(sketch.clone()));
        let state = DrawingState::new(sketch, palette.selected());
        Self {
            factory,
            mapper: InputMapper::new(surface),
            palette,
            state,
            slot,
        }
    }
    /// The slot this session publishes into.
    #[must_use]
    pub fn slot(&self) -> Arc<SketchSlot> {
        self.slot.clone()
    }
    #[must_use]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }
    #[must_use]
    pub fn sketch(&self) -> &Sketch {
        self.state.sketch()
    }
    /// Apply one frame of input, then publish the result.
    pub fn process(&mut self, frame: &PointerFrame) {
        for request in frame.requests() {
            self.handle_request(*request);
        }
        let state = &mut self.state;
        self.mapper.map_with(frame.events(), |event| {
            state.apply(event);
        });
        self.slot.publish(self.state.sketch().clone());
    }
    fn handle_request(&mut self, request: UiRequest) {
        match request {
            UiRequest::SelectColor(index) => match self.palette.select(index) {
                Ok(color) => {
                    log::debug!("selected {color}");
                    self.state.select_color(color);
                    // A touch in progress must lift before it draws in the new color.
                    self.mapper.reset();
                }
                Err(e) => log::warn!("ignoring selection: {e}"),
            },
            UiRequest::Resize(size) => self.mapper.set_surface(size),
            UiRequest::Clear => {
                self.mapper.reset();
                self.state.clear(&self.factory);
            }
        }
    }
    /// Process frames until the surface goes away, then hand back the session.
    pub async fn run(
        mut self,
        mut frames: tokio::sync::broadcast::Receiver<PointerFrame>,
    ) -> Self {
        loop {
            match frames.recv().await {
                Ok(frame) => self.process(&frame),
                Err(tokio::sync::broadcast::error::RecvError::Lagged(num)) => {
                    log::warn!("Lost {num} pointer frames!");
                    // Whatever touch was in progress, we missed its continuation.
                    self.mapper.reset();
                }
                // Surface torn down, nothing more will come.
                Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                    self.mapper.reset();
                    return self;
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::Session;
    use crate::surface::{PointerFrame, Surface, UiRequest};
    use sketchpad_core::{
        input::PointerEvent,
        state::palette::{Palette, PaletteIndex},
        Color, Point, SketchFactory, SurfaceSize,
    };
    use std::sync::Arc;

    fn session() -> Session {
        Session::new(
            Arc::new(SketchFactory::new()),
            SurfaceSize::new(200.0, 100.0).unwrap(),
            Palette::default(),
        )
    }

    #[test]
    fn process_publishes() {
        let mut session = session();
        let slot = session.slot();
        let before = slot.get();
        session.process(&PointerFrame::new(
            vec![],
            vec![
                PointerEvent::down(100.0, 50.0),
                PointerEvent::moved(120.0, 50.0, true),
                PointerEvent::moved(9999.0, 50.0, true),
                PointerEvent::up(9999.0, 50.0),
            ],
        ));
        let after = slot.get();
        assert!(before.is_empty());
        assert_eq!(after.id(), before.id());
        assert_eq!(after.len(), 1);
        assert_eq!(
            after.last().unwrap().to_vec(),
            [
                Point::new(100.0, 50.0),
                Point::new(120.0, 50.0),
                Point::new(200.0, 50.0)
            ]
        );
        assert_eq!(after.last().unwrap().color(), Color::BLACK);
    }
    #[test]
    fn selection_restarts_touch() {
        let mut session = session();
        session.process(&PointerFrame::new(
            vec![],
            vec![PointerEvent::down(1.0, 1.0)],
        ));
        session.process(&PointerFrame::new(
            vec![UiRequest::SelectColor(PaletteIndex(2))],
            vec![
                // Still held, but the mapper was reset, so this is dropped.
                PointerEvent::moved(2.0, 2.0, true),
                PointerEvent::up(2.0, 2.0),
                PointerEvent::down(3.0, 3.0),
            ],
        ));
        let strokes = session.sketch().strokes();
        assert_eq!(strokes.len(), 2);
        assert_eq!(strokes[0].len(), 1);
        assert_eq!(strokes[1].color(), Color::RED);
    }
    #[test]
    fn bad_selection_ignored() {
        let mut session = session();
        session.process(&PointerFrame::new(
            vec![UiRequest::SelectColor(PaletteIndex(99))],
            vec![PointerEvent::down(1.0, 1.0)],
        ));
        assert_eq!(session.sketch().last().unwrap().color(), Color::BLACK);
    }
    #[test]
    fn clear_gets_new_id() {
        let mut session = session();
        let first = session.sketch().id();
        session.process(&PointerFrame::new(
            vec![UiRequest::Clear],
            vec![PointerEvent::down(1.0, 1.0)],
        ));
        assert!(session.sketch().id() > first);
        assert_eq!(session.sketch().len(), 1);
    }
    #[test]
    fn resize_clamps() {
        let mut session = session();
        session.process(&PointerFrame::new(
            vec![UiRequest::Resize(SurfaceSize::new(10.0, 10.0).unwrap())],
            vec![PointerEvent::down(50.0, 50.0)],
        ));
        assert_eq!(
            session.sketch().last().unwrap().first(),
            Some(Point::new(10.0, 10.0))
        );
    }
    #[tokio::test]
    async fn loop_ends_with_surface() {
        let session = session();
        let slot = session.slot();
        let mut surface = Surface::new(SurfaceSize::new(200.0, 100.0).unwrap());
        let frames = surface.frame_receiver();

        let producer = async move {
            surface.push_event(PointerEvent::down(5.0, 5.0));
            surface.finish();
            tokio::task::yield_now().await;
            surface.push_event(PointerEvent::moved(10.0, 5.0, true));
            surface.push_event(PointerEvent::up(10.0, 5.0));
            surface.finish();
            // Dropping the surface closes the channel.
        };
        let (session, ()) = tokio::join!(session.run(frames), producer);

        assert_eq!(
            session.sketch().last().unwrap().to_vec(),
            [Point::new(5.0, 5.0), Point::new(10.0, 5.0)]
        );
        assert_eq!(slot.get(), *session.sketch());
    }
}
