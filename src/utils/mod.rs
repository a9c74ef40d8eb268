pub mod logging;
pub mod pacing;
