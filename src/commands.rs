//! The `dump-schema` and `test-connection` commands.
//!
//! Both commands read the password first and stop with a configuration error
//! if it is missing, before any process is spawned or socket opened. Other
//! failures are written to `out` and turned into a `false` outcome.

use crate::config::Config;
use crate::credential::{Credential, PASSWORD_ENV_VAR};
use crate::db::ConnectionTester;
use crate::dump::SchemaExtractor;
use crate::error::{ToolError, ToolResult};
use std::io::Write;
use tracing::error;

/// Export the schema with pg_dump.
///
/// Returns `Ok(true)` when the file was written, `Ok(false)` when the failure
/// was reported to `out`, and `Err` only for configuration or console errors.
pub async fn dump_schema<F, W>(config: &Config, lookup: F, out: &mut W) -> ToolResult<bool>
where
    F: FnOnce(&str) -> Option<String>,
    W: Write,
{
    config.validate()?;
    let credential = Credential::from_lookup(lookup)?;
    let extractor = SchemaExtractor::from_config(config);

    writeln!(out, "Running {}...", extractor.program_name()).map_err(console)?;

    match extractor.extract(&credential).await {
        Ok(outcome) => {
            writeln!(
                out,
                "Schema successfully exported to {} ({})",
                outcome.path.display(),
                outcome.size_display()
            )
            .map_err(console)?;
            Ok(true)
        }
        Err(ToolError::DumpFailed {
            program,
            status,
            stderr,
            ..
        }) => {
            error!(program = %program, status = %status, "Schema export failed");
            writeln!(out, "{} failed with {}", program, status).map_err(console)?;
            writeln!(out, "Error: {}", stderr).map_err(console)?;
            Ok(false)
        }
        Err(ToolError::Timeout { operation, .. }) => {
            error!(program = %operation, "Schema export timed out");
            writeln!(out, "{} timed out", operation).map_err(console)?;
            Ok(false)
        }
        Err(e) => {
            error!(error = %e, "Schema export failed");
            writeln!(out, "{}", e).map_err(console)?;
            Ok(false)
        }
    }
}

/// Check that the session pooler accepts the credential.
///
/// Prints whether the password was found before anything else, then the
/// server version and table count. Any connection or query failure is
/// printed and reported as `Ok(false)`.
pub async fn test_connection<F, W>(config: &Config, lookup: F, out: &mut W) -> ToolResult<bool>
where
    F: FnOnce(&str) -> Option<String>,
    W: Write,
{
    config.validate()?;
    let raw = lookup(PASSWORD_ENV_VAR).filter(|v| !v.is_empty());
    writeln!(
        out,
        "Password found: {}",
        if raw.is_some() { "Yes" } else { "No" }
    )
    .map_err(console)?;
    let credential = Credential::from_lookup(|_| raw)?;

    let tester = ConnectionTester::from_config(config);
    writeln!(
        out,
        "Connecting to {} (Session Pooler)...",
        tester.target().endpoint()
    )
    .map_err(console)?;

    match tester.probe(&credential).await {
        Ok(report) => {
            writeln!(
                out,
                "Connected successfully! PostgreSQL version: {}",
                report.server_version
            )
            .map_err(console)?;
            writeln!(
                out,
                "Found {} tables in {} schema",
                report.table_count,
                tester.schema()
            )
            .map_err(console)?;
            Ok(true)
        }
        Err(e) => {
            error!(error = %e, "Connection test failed");
            let detail = match &e {
                ToolError::Connection { message, .. } => message.clone(),
                other => other.to_string(),
            };
            writeln!(out, "Connection failed: {}", detail).map_err(console)?;
            if let Some(hint) = e.suggestion() {
                writeln!(out, "Hint: {}", hint).map_err(console)?;
            }
            Ok(false)
        }
    }
}

fn console(e: std::io::Error) -> ToolError {
    ToolError::io(format!("Failed to write to console: {}", e))
}
