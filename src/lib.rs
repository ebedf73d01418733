//! Supabase schema tools library.
//!
//! Exports the schema of a Supabase-hosted PostgreSQL database with `pg_dump`
//! and checks that the session pooler accepts the configured credential.

pub mod commands;
pub mod config;
pub mod credential;
pub mod db;
pub mod dump;
pub mod error;
pub mod models;

pub use config::{Cli, Command, Config};
pub use credential::Credential;
pub use db::ConnectionTester;
pub use dump::SchemaExtractor;
pub use error::{ToolError, ToolResult};
