use crate::core::colour_mapping::smooth_hsv::ColourSettings;
use crate::core::data::fractal_params::FractalParameters;
use crate::core::data::frame_buffer::FrameBuffer;
use std::time::Duration;

/// Everything the worker needs to run one scan.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanJob {
    pub params: FractalParameters,
    pub width: u32,
    pub height: u32,
    pub colours: ColourSettings,
    pub rows_per_yield: u32,
}

#[derive(Debug)]
pub struct FrameData {
    pub generation: u64,
    pub frame: FrameBuffer,
    pub duration: Duration,
}
