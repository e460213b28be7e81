pub mod backend;
pub mod catalog;
pub mod queries;
pub mod schema;
pub mod settings;
pub mod store_impl;
pub mod visits;

pub use backend::DuckDbBackend;

/// Re-export the `duckdb` crate so consumers (especially tests) can use
/// `pagetally_duckdb::duckdb::params!` without an extra dependency.
pub use duckdb;
