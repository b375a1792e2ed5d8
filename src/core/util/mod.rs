pub mod display_mapping;
pub mod viewport;
