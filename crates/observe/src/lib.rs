//! Logging setup shared by the migrator binary and its tests: subscriber
//! initialization, the log configuration and a panic hook that reports
//! through `tracing`.
pub mod config;
pub mod panic_hook;
pub mod tracing;

pub use config::Config;
