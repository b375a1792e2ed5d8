pub mod hsv;
pub mod smooth_hsv;
