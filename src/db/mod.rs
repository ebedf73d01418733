//! Database access.
//!
//! A single-connection probe used by the `test-connection` command.

pub mod probe;

pub use probe::ConnectionTester;
