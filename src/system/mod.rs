pub mod collector;
pub mod metrics;
pub mod platform;
pub mod process;
pub mod reader;
pub mod snapshot;
