use crate::core::actions::cancellation::CancelToken;
use crate::core::actions::generate_frame::scan::{FractalScan, ScanSetupError, ScanStep};
use crate::core::colour_mapping::smooth_hsv::ColourSettings;
use crate::core::data::fractal_params::FractalParameters;
use crate::core::data::frame_buffer::FrameBuffer;

/// Runs a whole scan on the calling thread.
///
/// Returns `Ok(None)` if `cancel` fires before the last row is written.
pub fn generate_frame<C: CancelToken + ?Sized>(
    params: &FractalParameters,
    width: u32,
    height: u32,
    colours: ColourSettings,
    cancel: &C,
) -> Result<Option<FrameBuffer>, ScanSetupError> {
    let mut scan = FractalScan::for_frame(params, width, height, colours, height)?;

    loop {
        match scan.step(cancel) {
            ScanStep::Yielded { .. } => continue,
            ScanStep::Completed => return Ok(scan.into_frame()),
            ScanStep::Paused { .. } | ScanStep::Canceled { .. } => return Ok(None),
        }
    }
}
