pub mod config;
pub mod debug;
pub mod generate;
pub mod metrics;
