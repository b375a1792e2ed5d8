use crate::core::fractals::fractal_family::FractalFamily;
use std::path::PathBuf;

/// Discrete user intents consumed by the session controller.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Switch family, recentre on its seed point and reset the scale.
    SelectFamily(FractalFamily),
    SetQuality(usize),
    SetIterations(usize),
    /// Cursor position in display pixels.
    MoveCursor { x: f64, y: f64 },
    SetDisplaySize { width: u32, height: u32 },
    ZoomInAtCursor,
    ZoomOutAtCursor,
    ResetView,
    Regenerate,
    TogglePause,
    Cancel,
    Undo,
    Redo,
    Export(PathBuf),
    ToggleOverlay,
    ToggleFullscreen,
    /// Display-only pan, in screen pixels.
    PanView { dx: f64, dy: f64 },
    /// Display-only zoom multiplier.
    ZoomView(f64),
}

impl Command {
    /// Commands that are still honoured while a scan is running.
    #[must_use]
    pub fn allowed_while_generating(&self) -> bool {
        matches!(
            self,
            Self::TogglePause | Self::Cancel | Self::MoveCursor { .. } | Self::SetDisplaySize { .. }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// A new scan was queued.
    Started { generation: u64 },
    Applied,
    /// Nothing to do, e.g. undo at the oldest entry.
    NoOp,
    /// Not allowed in the current state or out of range.
    Rejected,
    /// Attempted and failed; the failure has been logged.
    Failed,
}
