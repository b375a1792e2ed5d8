use crate::core::data::fractal_params::FractalParameters;
use crate::core::data::view_transform::ViewTransform;
use std::time::Duration;

/// Parameters that produced a frame, kept alongside its pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameMeta {
    pub params: FractalParameters,
    pub view: ViewTransform,
    pub width: u32,
    pub height: u32,
    pub generation_time: Duration,
    pub quality_index: usize,
    pub iteration_index: usize,
}
