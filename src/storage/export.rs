use crate::controllers::ports::frame_codec::{CodecError, FrameCodec};
use crate::core::data::frame_buffer::FrameBuffer;
use crate::presenters::file::image_codec::{ImageFileCodec, LosslessFormat};
use crate::storage::artifacts::export_file_name;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

/// Relative paths land in `export_directory`; absolute paths are kept.
#[must_use]
pub fn resolve_export_path(export_directory: &Path, requested: &Path) -> PathBuf {
    if requested.is_absolute() {
        requested.to_path_buf()
    } else {
        export_directory.join(requested)
    }
}

/// Where an export of a `width` x `height` frame goes. An empty request or an
/// existing directory gets a timestamped file name.
#[must_use]
pub fn export_target(
    export_directory: &Path,
    requested: &Path,
    width: u32,
    height: u32,
    now: &DateTime<Local>,
) -> PathBuf {
    let path = resolve_export_path(export_directory, requested);

    if requested.as_os_str().is_empty() || path.is_dir() {
        path.join(export_file_name(now, width, height))
    } else {
        path
    }
}

/// Writes `frame` losslessly, picking PNG or PPM from the extension.
pub fn export_frame(frame: &FrameBuffer, path: &Path) -> Result<(), CodecError> {
    let format = LosslessFormat::from_path(path)?;
    ImageFileCodec::new(format).write(frame, path)?;

    tracing::info!(
        path = %path.display(),
        width = frame.width(),
        height = frame.height(),
        "frame exported"
    );

    Ok(())
}
