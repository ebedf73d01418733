//! Schema export via pg_dump.
//!
//! - Argument construction for a schema-only dump
//! - Scoped environment overlay carrying the password to the child
//! - Bounded execution and atomic output writing

pub mod command;
pub mod env_overlay;
pub mod extractor;

pub use command::{PASSWORD_VAR, schema_dump_args};
pub use env_overlay::EnvOverlay;
pub use extractor::SchemaExtractor;
