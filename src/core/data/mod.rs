pub mod colour;
pub mod complex;
pub mod fractal_params;
pub mod frame_buffer;
pub mod frame_meta;
pub mod point;
pub mod view_transform;
