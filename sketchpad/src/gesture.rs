//! # Recorded gestures
//!
//! A gesture file is a TOML list of frames, each an optional palette selection, resize or clear,
//! followed by raw pointer samples. Replaying one drives a fresh sketch through the same surface,
//! loop, mapper and reducer that live input takes.
//!
//! ```toml
//! [surface]          # optional, overrides settings
//! width = 200.0
//! height = 100.0
//!
//! [[frame]]
//! select = "red"
//! events = [
//!     { kind = "down", position = { x = 100.0, y = 50.0 } },
//!     { kind = "move", position = { x = 120.0, y = 50.0 } },
//!     { kind = "move", position = { x = 9999.0, y = 50.0 }, pressed = true },
//!     { kind = "up", position = { x = 9999.0, y = 50.0 } },
//! ]
//! ```

use crate::{
    global::settings::{Settings, SurfaceConfig},
    session::Session,
    surface::{Surface, UiRequest},
};
use sketchpad_core::{
    input::PointerEvent,
    render,
    state::palette::{NamedColor, Palette},
    Sketch, SketchFactory, SurfaceSize,
};
use std::sync::Arc;

#[derive(serde::Deserialize, Debug, Default, Clone)]
#[serde(default)]
pub struct GestureFrame {
    pub select: Option<NamedColor>,
    pub resize: Option<SurfaceConfig>,
    pub clear: bool,
    pub events: Vec<PointerEvent>,
}

impl GestureFrame {
    /// The UI requests this frame makes, in the order they apply.
    pub fn requests(&self, palette: &Palette) -> anyhow::Result<Vec<UiRequest>> {
        let mut requests = Vec::new();
        if self.clear {
            requests.push(UiRequest::Clear);
        }
        if let Some(resize) = self.resize {
            requests.push(UiRequest::Resize(SurfaceSize::new(
                resize.width,
                resize.height,
            )?));
        }
        if let Some(name) = self.select {
            // By name, not by color: some names share a color.
            let index = name.default_index();
            anyhow::ensure!(palette.get(index).is_some(), "{name} is not in the palette");
            requests.push(UiRequest::SelectColor(index));
        }
        Ok(requests)
    }
}

#[derive(serde::Deserialize, Debug, Default, Clone)]
pub struct Gesture {
    #[serde(default)]
    pub surface: Option<SurfaceConfig>,
    #[serde(default, rename = "frame")]
    pub frames: Vec<GestureFrame>,
}
impl Gesture {
    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }
    /// Two strokes: a red drag that runs off the right edge, then a blue flick.
    #[must_use]
    pub fn demo() -> Self {
        Self {
            surface: Some(SurfaceConfig {
                width: 200.0,
                height: 100.0,
            }),
            frames: vec![
                GestureFrame {
                    select: Some(NamedColor::Red),
                    events: vec![
                        PointerEvent::down(100.0, 50.0),
                        PointerEvent::moved(120.0, 50.0, true),
                        PointerEvent::moved(9999.0, 50.0, true),
                        PointerEvent::up(9999.0, 50.0),
                    ],
                    ..GestureFrame::default()
                },
                GestureFrame {
                    select: Some(NamedColor::Blue),
                    events: vec![
                        PointerEvent::down(10.0, 90.0),
                        PointerEvent::moved(30.0, 70.0, true),
                        PointerEvent::moved(50.0, 50.0, false),
                    ],
                    ..GestureFrame::default()
                },
            ],
        }
    }
}

/// Replay `gesture` into a fresh sketch from `factory`.
///
/// Fails if the gesture names a color missing from the palette, or an invalid surface size.
pub fn replay(
    gesture: &Gesture,
    factory: Arc<SketchFactory>,
    settings: &Settings,
) -> anyhow::Result<Sketch> {
    let size = match gesture.surface {
        Some(surface) => SurfaceSize::new(surface.width, surface.height)?,
        None => settings.surface_size()?,
    };
    let palette = settings.palette();

    // Resolve everything up front, so a bad file fails before anything is drawn.
    let frames = gesture
        .frames
        .iter()
        .map(|frame| -> anyhow::Result<_> {
            Ok((frame.requests(&palette)?, frame.events.as_slice()))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let session = Session::new(factory, size, palette);
    let mut surface = Surface::new(size);
    let receiver = surface.frame_receiver();

    let feed = async move {
        for (requests, events) in frames {
            for request in requests {
                surface.push_request(request);
            }
            for &event in events {
                surface.push_event(event);
            }
            surface.finish();
            // Let the session catch up, so it never lags the channel.
            tokio::task::yield_now().await;
        }
        // Surface dropped here, which ends the session's loop.
    };

    let runtime = tokio::runtime::Builder::new_current_thread().build()?;
    let (session, ()) = runtime.block_on(async { tokio::join!(session.run(receiver), feed) });
    Ok(session.sketch().clone())
}

/// One-line description of a sketch, for logs.
#[must_use]
pub fn summarize(sketch: &Sketch, stroke_width: f32) -> String {
    let segments = render::segments(sketch, stroke_width).count();
    let ink: f32 = sketch.strokes().iter().map(|stroke| stroke.arc_length()).sum();
    let colors: Vec<String> = sketch
        .strokes()
        .iter()
        .map(|stroke| stroke.color().to_string())
        .collect();
    format!(
        "{}: {} strokes [{}], {} points, {segments} segments, {ink:.1}px of ink",
        sketch.id(),
        sketch.len(),
        colors.join(", "),
        sketch.point_count(),
    )
}
