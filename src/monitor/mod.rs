mod controller;
pub mod decision;
mod loop_worker;
mod stats;

pub use controller::MonitorController;
pub use loop_worker::{monitor_loop, MonitorDeps};
pub use stats::{MonitorStats, StatsSnapshot};
