use crate::core::data::frame_buffer::FrameBuffer;
use crate::core::data::frame_meta::FrameMeta;

/// A frame together with the parameters that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedFrame {
    pub frame: FrameBuffer,
    pub meta: FrameMeta,
}

/// The single in-memory slot holding the last frame shown before a scan.
///
/// Separate from the persisted history. Every store overwrites it; it is
/// never cleared.
#[derive(Debug, Default)]
pub struct PreviousStateSlot {
    slot: Option<LoadedFrame>,
}

impl PreviousStateSlot {
    pub fn store(&mut self, state: LoadedFrame) {
        self.slot = Some(state);
    }

    #[must_use]
    pub fn get(&self) -> Option<&LoadedFrame> {
        self.slot.as_ref()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }
}
