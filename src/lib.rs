pub mod error;
pub mod loader;
pub mod platform;
pub mod report;
pub mod runner;
pub mod utils;

// Re-export common items
pub use report::summarize;
pub use runner::run_load_test;
