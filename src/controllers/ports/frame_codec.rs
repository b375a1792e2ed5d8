use crate::core::data::frame_buffer::{FrameBuffer, FrameBufferError};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image codec error: {0}")]
    Image(#[from] image::ImageError),

    #[error("decoded frame is invalid: {0}")]
    Frame(#[from] FrameBufferError),

    #[error("unsupported or lossy image format: {path}")]
    UnsupportedFormat { path: PathBuf },
}

/// Lossless persistence of finished frames.
pub trait FrameCodec: Send + Sync {
    /// File extension without the dot.
    fn extension(&self) -> &str;

    fn write(&self, frame: &FrameBuffer, path: &Path) -> Result<(), CodecError>;

    fn read(&self, path: &Path) -> Result<FrameBuffer, CodecError>;
}
