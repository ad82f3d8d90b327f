//! # Surface events
//!
//! The drawing surface collects raw pointer samples and UI requests as they arrive, and at the end of
//! each host frame bundles them up and broadcasts them to every listener.
//!
//! Dropping the [`Surface`] closes the channel, which ends any loop listening to it.

use sketchpad_core::{input::PointerEvent, state::palette::PaletteIndex, SurfaceSize};
use std::sync::Arc;

/// Non-pointer input from the rest of the UI.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum UiRequest {
    /// The palette collaborator reported a selection.
    SelectColor(PaletteIndex),
    /// The surface changed size.
    Resize(SurfaceSize),
    /// Throw away the current sketch and start a fresh one.
    Clear,
}

#[derive(Default, Debug)]
pub struct PointerFrameInner {
    /// Applied before any of `events`.
    requests: Vec<UiRequest>,
    events: Vec<PointerEvent>,
}

/// One host frame's worth of input. Cheap to clone.
#[derive(Clone, Debug)]
pub struct PointerFrame(Arc<PointerFrameInner>);
impl PointerFrame {
    #[must_use]
    pub fn new(requests: Vec<UiRequest>, events: Vec<PointerEvent>) -> Self {
        Self(Arc::new(PointerFrameInner { requests, events }))
    }
    #[must_use]
    pub fn requests(&self) -> &[UiRequest] {
        &self.0.requests
    }
    #[must_use]
    pub fn events(&self) -> &[PointerEvent] {
        &self.0.events
    }
}

pub struct Surface {
    size: SurfaceSize,
    pending: PointerFrameInner,
    /// Finished frames nobody was listening for yet, oldest first.
    unsent: std::collections::VecDeque<PointerFrame>,
    frame_channel: tokio::sync::broadcast::Sender<PointerFrame>,
}
impl Surface {
    /// How many frames a listener may fall behind before it starts losing them.
    pub const CHANNEL_CAPACITY: usize = 64;

    #[must_use]
    pub fn new(size: SurfaceSize) -> Self {
        let (frame_channel, _) = tokio::sync::broadcast::channel(Self::CHANNEL_CAPACITY);
        Self {
            size,
            pending: PointerFrameInner::default(),
            unsent: std::collections::VecDeque::new(),
            frame_channel,
        }
    }
    #[must_use]
    pub fn size(&self) -> SurfaceSize {
        self.size
    }
    pub fn push_event(&mut self, event: PointerEvent) {
        self.pending.events.push(event);
    }
    /// Queue a UI request. If pointer samples are already pending, the current frame is finished
    /// first so the request can't jump ahead of them.
    pub fn push_request(&mut self, request: UiRequest) {
        if !self.pending.events.is_empty() {
            self.finish();
        }
        if let UiRequest::Resize(size) = request {
            self.size = size;
        }
        self.pending.requests.push(request);
    }
    /// This frame is complete. Broadcast everything collected so far.
    ///
    /// Frames are held back, in order, while nobody is listening. At most
    /// [`Self::CHANNEL_CAPACITY`] are kept, the oldest are dropped past that.
    pub fn finish(&mut self) {
        if !self.pending.events.is_empty() || !self.pending.requests.is_empty() {
            let frame = PointerFrame(Arc::new(std::mem::take(&mut self.pending)));
            self.unsent.push_back(frame);
        }
        if self.unsent.len() > Self::CHANNEL_CAPACITY {
            let num = self.unsent.len() - Self::CHANNEL_CAPACITY;
            log::warn!("No listener, dropping {num} pointer frames!");
            self.unsent.drain(..num);
        }
        while let Some(frame) = self.unsent.pop_front() {
            if let Err(err) = self.frame_channel.send(frame) {
                // No receivers. Keep it for when there are.
                self.unsent.push_front(err.0);
                break;
            }
        }
    }
    #[must_use]
    pub fn frame_receiver(&self) -> tokio::sync::broadcast::Receiver<PointerFrame> {
        self.frame_channel.subscribe()
    }
    /// Number of finished frames waiting for a listener.
    #[must_use]
    pub fn backlog(&self) -> usize {
        self.unsent.len()
    }
}
