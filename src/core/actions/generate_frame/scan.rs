use crate::core::actions::cancellation::CancelToken;
use crate::core::actions::generate_frame::ports::colour_map::ColourMap;
use crate::core::actions::generate_frame::ports::fractal_algorithm::FractalAlgorithm;
use crate::core::colour_mapping::smooth_hsv::{ColourSettings, SmoothHsvColourMap};
use crate::core::data::fractal_params::FractalParameters;
use crate::core::data::frame_buffer::{FrameBuffer, FrameBufferError};
use crate::core::fractals::escape::{EscapeEvaluator, EscapeResult};
use crate::core::util::viewport::{Viewport, ViewportError};
use std::error::Error;
use std::fmt;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq)]
pub enum ScanSetupError {
    Viewport(ViewportError),
    FrameBuffer(FrameBufferError),
}

impl fmt::Display for ScanSetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Viewport(err) => write!(f, "viewport error: {}", err),
            Self::FrameBuffer(err) => write!(f, "frame buffer error: {}", err),
        }
    }
}

impl Error for ScanSetupError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Viewport(err) => Some(err),
            Self::FrameBuffer(err) => Some(err),
        }
    }
}

impl From<ViewportError> for ScanSetupError {
    fn from(err: ViewportError) -> Self {
        Self::Viewport(err)
    }
}

impl From<FrameBufferError> for ScanSetupError {
    fn from(err: FrameBufferError) -> Self {
        Self::FrameBuffer(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Running,
    Paused,
    Completed,
    Canceled,
}

/// What a call to [`Scan::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStep {
    /// A batch of rows was written; `next_row` is the first row not yet written.
    Yielded { next_row: u32 },
    Paused { next_row: u32 },
    Completed,
    Canceled { rows_completed: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanProgress {
    pub rows_completed: u32,
    pub total_rows: u32,
    pub elapsed: Duration,
}

impl ScanProgress {
    #[must_use]
    pub fn fraction(&self) -> f64 {
        if self.total_rows == 0 {
            return 1.0;
        }

        f64::from(self.rows_completed) / f64::from(self.total_rows)
    }

    #[must_use]
    pub fn rows_per_second(&self) -> f64 {
        let seconds = self.elapsed.as_secs_f64();
        if seconds <= 0.0 {
            return 0.0;
        }

        f64::from(self.rows_completed) / seconds
    }

    /// `None` until at least one row has been timed.
    #[must_use]
    pub fn eta(&self) -> Option<Duration> {
        let rate = self.rows_per_second();
        if rate <= 0.0 {
            return None;
        }

        let remaining = self.total_rows.saturating_sub(self.rows_completed);
        Some(Duration::from_secs_f64(f64::from(remaining) / rate))
    }
}

/// A resumable top-to-bottom scan of one frame.
///
/// Each [`step`](Self::step) writes at most `rows_per_yield` rows and then
/// hands control back. Cancellation is polled before every row and once more
/// after the batch, so a cancel that lands during the final row still ends in
/// [`ScanState::Canceled`]. The frame is only released once the scan has
/// completed.
#[derive(Debug)]
pub struct Scan<A, M> {
    algorithm: A,
    colour_map: M,
    viewport: Viewport,
    frame: FrameBuffer,
    next_row: u32,
    rows_per_yield: u32,
    state: ScanState,
    started: Instant,
}

pub type FractalScan = Scan<EscapeEvaluator, SmoothHsvColourMap>;

impl<A, M> Scan<A, M>
where
    A: FractalAlgorithm,
    M: ColourMap<EscapeResult>,
{
    pub fn new(
        algorithm: A,
        colour_map: M,
        viewport: Viewport,
        rows_per_yield: u32,
    ) -> Result<Self, ScanSetupError> {
        let frame = FrameBuffer::new(viewport.width(), viewport.height())?;

        Ok(Self {
            algorithm,
            colour_map,
            viewport,
            frame,
            next_row: 0,
            rows_per_yield: rows_per_yield.max(1),
            state: ScanState::Running,
            started: Instant::now(),
        })
    }

    pub fn step<C: CancelToken + ?Sized>(&mut self, cancel: &C) -> ScanStep {
        match self.state {
            ScanState::Running => {}
            ScanState::Paused => {
                return ScanStep::Paused {
                    next_row: self.next_row,
                };
            }
            ScanState::Completed => return ScanStep::Completed,
            ScanState::Canceled => {
                return ScanStep::Canceled {
                    rows_completed: self.next_row,
                };
            }
        }

        let mut written = 0;
        while written < self.rows_per_yield && self.next_row < self.frame.height() {
            if cancel.is_cancelled() {
                return self.mark_canceled();
            }

            self.render_row(self.next_row);
            self.next_row += 1;
            written += 1;
        }

        if cancel.is_cancelled() {
            return self.mark_canceled();
        }

        if self.next_row == self.frame.height() {
            self.state = ScanState::Completed;
            return ScanStep::Completed;
        }

        ScanStep::Yielded {
            next_row: self.next_row,
        }
    }

    pub fn pause(&mut self) {
        if self.state == ScanState::Running {
            self.state = ScanState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state == ScanState::Paused {
            self.state = ScanState::Running;
        }
    }

    pub fn cancel(&mut self) {
        if matches!(self.state, ScanState::Running | ScanState::Paused) {
            self.mark_canceled();
        }
    }

    #[must_use]
    pub fn state(&self) -> ScanState {
        self.state
    }

    #[must_use]
    pub fn next_row(&self) -> u32 {
        self.next_row
    }

    #[must_use]
    pub fn progress(&self) -> ScanProgress {
        ScanProgress {
            rows_completed: self.next_row,
            total_rows: self.frame.height(),
            elapsed: self.started.elapsed(),
        }
    }

    /// Releases the frame once every row is written; `None` otherwise.
    #[must_use]
    pub fn into_frame(self) -> Option<FrameBuffer> {
        (self.state == ScanState::Completed).then_some(self.frame)
    }

    fn mark_canceled(&mut self) -> ScanStep {
        self.state = ScanState::Canceled;
        ScanStep::Canceled {
            rows_completed: self.next_row,
        }
    }

    fn render_row(&mut self, y: u32) {
        let Some(row) = self.frame.row_mut(y) else {
            return;
        };

        for (x, pixel) in row.iter_mut().enumerate() {
            let point = self.viewport.pixel_to_plane(x as f64, f64::from(y));
            *pixel = self.colour_map.map(self.algorithm.compute(point)).to_packed();
        }
    }
}

impl FractalScan {
    pub fn for_frame(
        params: &FractalParameters,
        width: u32,
        height: u32,
        colours: ColourSettings,
        rows_per_yield: u32,
    ) -> Result<Self, ScanSetupError> {
        let viewport = Viewport::for_params(width, height, params)?;

        Self::new(
            EscapeEvaluator::new(params),
            SmoothHsvColourMap::new(params.max_iterations(), colours),
            viewport,
            rows_per_yield,
        )
    }
}
