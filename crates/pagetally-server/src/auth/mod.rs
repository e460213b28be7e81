pub mod basic;

pub use basic::{require_admin, Credentials};
