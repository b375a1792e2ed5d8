pub mod engine;
pub mod events;
pub mod job;
pub mod ports;
