use crate::core::data::frame_meta::FrameMeta;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

/// One finished frame on the history timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub meta: FrameMeta,
    pub created_at: DateTime<Local>,
    pub image_path: PathBuf,
}

impl Snapshot {
    #[must_use]
    pub fn image_path(&self) -> &Path {
        &self.image_path
    }
}
