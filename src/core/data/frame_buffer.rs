use crate::core::data::colour::Colour;
use crate::core::data::point::Point;
use rayon::prelude::*;
use std::error::Error;
use std::fmt;

const BYTES_PER_PIXEL: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameBufferError {
    InvalidSize {
        width: u32,
        height: u32,
    },
    PixelOutsideBounds {
        pixel: Point,
        width: u32,
        height: u32,
    },
    BoundsMismatch {
        expected: usize,
        actual: usize,
    },
}

impl fmt::Display for FrameBufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSize { width, height } => {
                write!(f, "frame size must be positive: {}x{}", width, height)
            }
            Self::PixelOutsideBounds {
                pixel,
                width,
                height,
            } => {
                write!(
                    f,
                    "pixel at x:{}, y:{} outside of {}x{} frame",
                    pixel.x, pixel.y, width, height
                )
            }
            Self::BoundsMismatch { expected, actual } => {
                write!(
                    f,
                    "frame expects {} values but {} were supplied",
                    expected, actual
                )
            }
        }
    }
}

impl Error for FrameBufferError {}

/// Row-major packed `0xAARRGGBB` pixels with dimensions fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

fn pixel_count(width: u32, height: u32) -> Result<usize, FrameBufferError> {
    if width == 0 || height == 0 {
        return Err(FrameBufferError::InvalidSize { width, height });
    }

    Ok(width as usize * height as usize)
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> Result<Self, FrameBufferError> {
        let count = pixel_count(width, height)?;

        Ok(Self {
            width,
            height,
            pixels: vec![0; count],
        })
    }

    pub fn filled(width: u32, height: u32, colour: Colour) -> Result<Self, FrameBufferError> {
        let count = pixel_count(width, height)?;

        Ok(Self {
            width,
            height,
            pixels: vec![colour.to_packed(); count],
        })
    }

    /// Rebuilds a frame from tightly packed 8-bit RGBA bytes.
    pub fn from_rgba_bytes(width: u32, height: u32, bytes: &[u8]) -> Result<Self, FrameBufferError> {
        let expected = pixel_count(width, height)? * BYTES_PER_PIXEL;

        if expected != bytes.len() {
            return Err(FrameBufferError::BoundsMismatch {
                expected,
                actual: bytes.len(),
            });
        }

        let pixels = bytes
            .par_chunks_exact(BYTES_PER_PIXEL)
            .map(|px| {
                Colour {
                    r: px[0],
                    g: px[1],
                    b: px[2],
                    a: px[3],
                }
                .to_packed()
            })
            .collect();

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    #[must_use]
    pub fn row(&self, y: u32) -> Option<&[u32]> {
        if y >= self.height {
            return None;
        }

        let start = y as usize * self.width as usize;
        Some(&self.pixels[start..start + self.width as usize])
    }

    pub fn row_mut(&mut self, y: u32) -> Option<&mut [u32]> {
        if y >= self.height {
            return None;
        }

        let start = y as usize * self.width as usize;
        Some(&mut self.pixels[start..start + self.width as usize])
    }

    #[must_use]
    pub fn pixel(&self, pixel: Point) -> Option<Colour> {
        self.index_of(pixel)
            .map(|index| Colour::from_packed(self.pixels[index]))
    }

    pub fn set_pixel(&mut self, pixel: Point, colour: Colour) -> Result<(), FrameBufferError> {
        let index = self
            .index_of(pixel)
            .ok_or(FrameBufferError::PixelOutsideBounds {
                pixel,
                width: self.width,
                height: self.height,
            })?;

        self.pixels[index] = colour.to_packed();
        Ok(())
    }

    /// Unpacks the frame into 8-bit RGBA bytes for image codecs.
    #[must_use]
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![0; self.pixels.len() * BYTES_PER_PIXEL];

        bytes
            .par_chunks_exact_mut(BYTES_PER_PIXEL)
            .zip(self.pixels.par_iter())
            .for_each(|(dst, &packed)| {
                dst.copy_from_slice(&Colour::from_packed(packed).to_rgba());
            });

        bytes
    }

    fn index_of(&self, pixel: Point) -> Option<usize> {
        if pixel.x < 0 || pixel.y < 0 {
            return None;
        }

        let (x, y) = (pixel.x as u32, pixel.y as u32);
        if x >= self.width || y >= self.height {
            return None;
        }

        Some(y as usize * self.width as usize + x as usize)
    }
}
