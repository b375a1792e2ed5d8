pub mod artifacts;
pub mod export;
pub mod history;
pub mod snapshot;
