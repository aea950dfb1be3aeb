// Library module for testable functions

pub mod cli;
pub mod config;
pub mod ingestion;

pub use config::Config;
pub use ingestion::run_pipeline;
