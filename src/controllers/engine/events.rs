use crate::controllers::engine::job::FrameData;
use crate::core::actions::generate_frame::scan::ScanProgress;

#[derive(Debug)]
pub enum EngineEvent {
    /// Sent at every yield point.
    Progress {
        generation: u64,
        progress: ScanProgress,
    },
    Completed(FrameData),
    Canceled {
        generation: u64,
        rows_completed: u32,
    },
    Failed {
        generation: u64,
        message: String,
    },
}

impl EngineEvent {
    #[must_use]
    pub fn generation(&self) -> u64 {
        match self {
            Self::Progress { generation, .. }
            | Self::Canceled { generation, .. }
            | Self::Failed { generation, .. } => *generation,
            Self::Completed(frame) => frame.generation,
        }
    }

    /// Completed, Canceled and Failed end a scan.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Progress { .. })
    }
}
