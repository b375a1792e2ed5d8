pub mod engine;
pub mod ports;
pub mod session;
