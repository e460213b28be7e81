pub mod analytics;
pub mod config;
pub mod error;
pub mod period;
pub mod report;
pub mod visit;
pub mod visitor;
