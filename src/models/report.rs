//! Results reported by the two commands.

use humansize::{DECIMAL, format_size};
use std::path::PathBuf;

/// Result of a successful schema export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpOutcome {
    pub path: PathBuf,
    pub bytes_written: u64,
}

impl DumpOutcome {
    /// Human readable size of the written file, e.g. "12.34 kB".
    pub fn size_display(&self) -> String {
        format_size(self.bytes_written, DECIMAL)
    }
}

/// Values returned by the connection tester's diagnostic queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    /// Output of `SELECT version()`
    pub server_version: String,
    /// Number of tables in the configured schema
    pub table_count: i64,
}

impl ProbeReport {
    /// Product name at the start of the version string ("PostgreSQL 15.1 on ...").
    pub fn product_name(&self) -> Option<&str> {
        self.server_version.split_whitespace().next()
    }
}
