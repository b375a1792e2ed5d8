pub mod generate_frame;
pub mod ports;
pub mod scan;
