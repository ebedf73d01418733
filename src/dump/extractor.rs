//! Schema export through an external pg_dump process.

use crate::config::Config;
use crate::credential::Credential;
use crate::dump::command::{PASSWORD_VAR, schema_dump_args};
use crate::dump::env_overlay::EnvOverlay;
use crate::error::{ToolError, ToolResult};
use crate::models::{ConnectionTarget, DumpOutcome};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Runs pg_dump against one target and stores its output.
#[derive(Debug, Clone)]
pub struct SchemaExtractor {
    program: PathBuf,
    target: ConnectionTarget,
    schema: String,
    output: PathBuf,
    timeout: Duration,
}

impl SchemaExtractor {
    pub fn new(
        program: impl Into<PathBuf>,
        target: ConnectionTarget,
        schema: impl Into<String>,
        output: impl Into<PathBuf>,
        timeout: Duration,
    ) -> Self {
        Self {
            program: program.into(),
            target,
            schema: schema.into(),
            output: output.into(),
            timeout,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.pg_dump,
            config.dump_target(),
            &config.schema,
            &config.output,
            config.dump_timeout_duration(),
        )
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn program_name(&self) -> String {
        self.program.display().to_string()
    }

    pub fn args(&self) -> Vec<String> {
        schema_dump_args(&self.target, &self.schema)
    }

    /// Run pg_dump and write its stdout to the output file.
    ///
    /// The file is only replaced when pg_dump exits with status 0. On every
    /// other path the previous file, if any, is left as it was.
    pub async fn extract(&self, credential: &Credential) -> ToolResult<DumpOutcome> {
        let program = self.program_name();
        let overlay = EnvOverlay::new().set(PASSWORD_VAR, credential.expose());

        let mut command = Command::new(&self.program);
        command
            .args(self.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        overlay.apply(&mut command);

        debug!(
            program = %program,
            args = ?self.args(),
            env = ?overlay,
            "Spawning pg_dump"
        );

        let child = command.spawn().map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ToolError::tool_not_found(&program),
            _ => ToolError::invocation(&program, e.to_string()),
        })?;

        info!(
            endpoint = %self.target,
            schema = %self.schema,
            timeout_secs = self.timeout.as_secs(),
            "pg_dump started"
        );

        // Dropping the child on timeout kills it (kill_on_drop).
        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => {
                result.map_err(|e| ToolError::invocation(&program, e.to_string()))?
            }
            Err(_) => {
                warn!(program = %program, "pg_dump timed out");
                return Err(ToolError::timeout(&program, self.timeout.as_secs()));
            }
        };

        if !output.status.success() {
            warn!(program = %program, status = %output.status, "pg_dump failed");
            return Err(ToolError::dump_failed(&program, output.status, &output.stderr));
        }

        write_atomic(&self.output, &output.stdout).await?;

        info!(
            path = %self.output.display(),
            bytes = output.stdout.len(),
            "Schema written"
        );

        Ok(DumpOutcome {
            path: self.output.clone(),
            bytes_written: output.stdout.len() as u64,
        })
    }
}

/// Write `contents` to a sibling temp file, then rename it over `path`.
async fn write_atomic(path: &Path, contents: &[u8]) -> ToolResult<()> {
    let tmp = temp_path(path);
    let destination = path.display().to_string();

    if let Err(e) = tokio::fs::write(&tmp, contents).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(ToolError::output_write(destination, e.to_string()));
    }

    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(ToolError::output_write(destination, e.to_string()));
    }

    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(path.file_name().unwrap_or_else(|| path.as_os_str()));
    name.push(format!(".{}.tmp", std::process::id()));
    path.with_file_name(name)
}
