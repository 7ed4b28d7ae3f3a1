pub mod action;
pub mod app;
pub mod config;
pub mod event;
pub mod format;
#[cfg(feature = "perf-tracing")]
pub mod trace;
pub mod system;
#[cfg(test)]
mod test_support;
pub mod ui;
