use crate::controllers::ports::frame_codec::{CodecError, FrameCodec};
use crate::core::data::frame_buffer::FrameBuffer;
use image::{DynamicImage, ImageFormat, RgbaImage};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LosslessFormat {
    Png,
    Ppm,
}

impl LosslessFormat {
    /// Picks the format from the extension; no extension means PNG.
    pub fn from_path(path: &Path) -> Result<Self, CodecError> {
        let Some(extension) = path.extension().and_then(|ext| ext.to_str()) else {
            return Ok(Self::Png);
        };

        match extension.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "ppm" | "pnm" => Ok(Self::Ppm),
            _ => Err(CodecError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Ppm => "ppm",
        }
    }
}

/// Writes and reads frames through the `image` crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageFileCodec {
    format: LosslessFormat,
}

impl ImageFileCodec {
    #[must_use]
    pub const fn new(format: LosslessFormat) -> Self {
        Self { format }
    }

    #[must_use]
    pub const fn png() -> Self {
        Self::new(LosslessFormat::Png)
    }

    #[must_use]
    pub const fn format(&self) -> LosslessFormat {
        self.format
    }
}

impl Default for ImageFileCodec {
    fn default() -> Self {
        Self::png()
    }
}

impl FrameCodec for ImageFileCodec {
    fn extension(&self) -> &str {
        self.format.extension()
    }

    fn write(&self, frame: &FrameBuffer, path: &Path) -> Result<(), CodecError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let rgba = RgbaImage::from_raw(frame.width(), frame.height(), frame.to_rgba_bytes())
            .ok_or_else(|| CodecError::UnsupportedFormat {
                path: path.to_path_buf(),
            })?;

        match self.format {
            LosslessFormat::Png => rgba.save_with_format(path, ImageFormat::Png)?,
            // PPM has no alpha channel; frames are always opaque.
            LosslessFormat::Ppm => DynamicImage::ImageRgba8(rgba)
                .to_rgb8()
                .save_with_format(path, ImageFormat::Pnm)?,
        }

        Ok(())
    }

    fn read(&self, path: &Path) -> Result<FrameBuffer, CodecError> {
        let format = match self.format {
            LosslessFormat::Png => ImageFormat::Png,
            LosslessFormat::Ppm => ImageFormat::Pnm,
        };
        let bytes = fs::read(path)?;
        let rgba = image::load_from_memory_with_format(&bytes, format)?.to_rgba8();
        let (width, height) = rgba.dimensions();

        Ok(FrameBuffer::from_rgba_bytes(width, height, rgba.as_raw())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::data::colour::Colour;
    use crate::core::data::point::Point;
    use tempfile::tempdir;

    fn sample_frame() -> FrameBuffer {
        let mut frame = FrameBuffer::filled(4, 3, Colour::opaque(10, 200, 30)).unwrap();
        frame
            .set_pixel(Point { x: 3, y: 2 }, Colour::opaque(255, 0, 128))
            .unwrap();
        frame
    }

    #[test]
    fn test_png_preserves_pixels() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("frame.png");
        let codec = ImageFileCodec::png();

        codec.write(&sample_frame(), &path).unwrap();

        assert_eq!(codec.read(&path).unwrap(), sample_frame());
    }

    #[test]
    fn test_ppm_preserves_opaque_pixels() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("frame.ppm");
        let codec = ImageFileCodec::new(LosslessFormat::Ppm);

        codec.write(&sample_frame(), &path).unwrap();

        assert_eq!(codec.read(&path).unwrap(), sample_frame());
        assert!(fs::read(&path).unwrap().starts_with(b"P6"));
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("frame.png");

        ImageFileCodec::png().write(&sample_frame(), &path).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_read_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let result = ImageFileCodec::png().read(&dir.path().join("absent.png"));

        assert!(matches!(result, Err(CodecError::Io(_))));
    }

    #[test]
    fn test_read_garbage_is_image_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("garbage.png");
        fs::write(&path, b"not a png").unwrap();

        assert!(matches!(
            ImageFileCodec::png().read(&path),
            Err(CodecError::Image(_))
        ));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(LosslessFormat::from_path(Path::new("a.PNG")).unwrap(), LosslessFormat::Png);
        assert_eq!(LosslessFormat::from_path(Path::new("a.pnm")).unwrap(), LosslessFormat::Ppm);
        assert_eq!(LosslessFormat::from_path(Path::new("noext")).unwrap(), LosslessFormat::Png);
        assert!(matches!(
            LosslessFormat::from_path(Path::new("a.jpg")),
            Err(CodecError::UnsupportedFormat { .. })
        ));
    }
}
