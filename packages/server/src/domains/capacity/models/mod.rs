pub mod capacity_log;

pub use capacity_log::CapacityLog;
