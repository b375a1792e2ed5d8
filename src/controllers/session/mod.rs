pub mod command;
pub mod controller;
pub mod overlay;
pub mod presets;
pub mod previous_state;
