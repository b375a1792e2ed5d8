use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

/// `fractal_<yyyyMMdd_HHmmss_mmm>_<W>x<H>.<ext>`; sorts by creation time.
#[must_use]
pub fn artifact_file_name(
    timestamp: &DateTime<Local>,
    width: u32,
    height: u32,
    extension: &str,
) -> String {
    format!(
        "fractal_{}_{}x{}.{}",
        timestamp.format("%Y%m%d_%H%M%S_%3f"),
        width,
        height,
        extension
    )
}

/// Like [`artifact_file_name`] inside `directory`, with a `_k` suffix when
/// an artifact from the same millisecond already exists.
#[must_use]
pub fn unique_artifact_path(
    directory: &Path,
    timestamp: &DateTime<Local>,
    width: u32,
    height: u32,
    extension: &str,
) -> PathBuf {
    let path = directory.join(artifact_file_name(timestamp, width, height, extension));
    if !path.exists() {
        return path;
    }

    let stem = format!(
        "fractal_{}_{}x{}",
        timestamp.format("%Y%m%d_%H%M%S_%3f"),
        width,
        height
    );

    (1..)
        .map(|k| directory.join(format!("{stem}_{k}.{extension}")))
        .find(|candidate| !candidate.exists())
        .unwrap_or(path)
}

/// Suggested name for a user export, `fractal_<yyyyMMdd_HHmmss>_<W>x<H>.png`.
#[must_use]
pub fn export_file_name(timestamp: &DateTime<Local>, width: u32, height: u32) -> String {
    format!(
        "fractal_{}_{}x{}.png",
        timestamp.format("%Y%m%d_%H%M%S"),
        width,
        height
    )
}
