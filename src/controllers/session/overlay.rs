use crate::core::actions::generate_frame::scan::ScanProgress;
use crate::core::data::complex::Complex;
use crate::core::fractals::fractal_family::FractalFamily;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running,
    Paused,
    /// Cancel requested, waiting for the worker to stop.
    Canceling,
}

impl SessionState {
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "generating",
            Self::Paused => "paused",
            Self::Canceling => "canceling",
        }
    }

    #[must_use]
    pub fn is_generating(self) -> bool {
        self != Self::Idle
    }
}

/// Snapshot of everything the information panel shows.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayInfo {
    pub visible: bool,
    pub family: FractalFamily,
    pub center: Complex,
    pub scale: f64,
    pub view_zoom: f64,
    pub cursor_plane: Option<Complex>,
    pub quality_name: String,
    pub resolution: (u32, u32),
    pub iteration_name: String,
    pub max_iterations: u32,
    pub state: SessionState,
    pub progress: Option<ScanProgress>,
    pub last_generation_time: Option<Duration>,
    /// One-based cursor position and entry count.
    pub history_position: Option<(usize, usize)>,
    pub can_undo: bool,
    pub can_redo: bool,
}

impl fmt::Display for OverlayInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Fractal: {}", self.family)?;
        writeln!(f, "Center: ({:.10}, {:.10})", self.center.real, self.center.imag)?;
        writeln!(f, "Scale: {:.3e}  View zoom: {:.2}x", self.scale, self.view_zoom)?;
        if let Some(cursor) = self.cursor_plane {
            writeln!(f, "Cursor: ({:.10}, {:.10})", cursor.real, cursor.imag)?;
        }
        writeln!(
            f,
            "Quality: {} ({}x{})  Iterations: {} ({})",
            self.quality_name, self.resolution.0, self.resolution.1, self.iteration_name, self.max_iterations
        )?;

        match self.progress.filter(|_| self.state.is_generating()) {
            Some(progress) => {
                write!(
                    f,
                    "State: {} {}/{} rows ({:.0}%), {:.1} rows/s",
                    self.state.display_name(),
                    progress.rows_completed,
                    progress.total_rows,
                    progress.fraction() * 100.0,
                    progress.rows_per_second()
                )?;
                if let Some(eta) = progress.eta() {
                    write!(f, ", ETA {:.1}s", eta.as_secs_f64())?;
                }
                writeln!(f)?;
            }
            None => writeln!(f, "State: {}", self.state.display_name())?,
        }

        if let Some(time) = self.last_generation_time {
            writeln!(f, "Last generation: {:.2}s", time.as_secs_f64())?;
        }
        match self.history_position {
            Some((position, count)) => {
                write!(f, "History: {}/{}", position, count)?;
                let moves: Vec<&str> = [(self.can_undo, "undo"), (self.can_redo, "redo")]
                    .into_iter()
                    .filter_map(|(available, name)| available.then_some(name))
                    .collect();
                if !moves.is_empty() {
                    write!(f, " ({})", moves.join(", "))?;
                }
                Ok(())
            }
            None => write!(f, "History: empty"),
        }
    }
}
