//! Error types for the schema tools.
//!
//! Every failure the two commands can hit maps onto one `ToolError` variant.
//! Variants that have an obvious remedy carry a suggestion that is printed
//! alongside the message.

use std::process::ExitStatus;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("{variable} must be set in .env")]
    MissingCredential { variable: String },

    #[error("{program} not found. Please install postgresql-client")]
    ToolNotFound { program: String },

    #[error("{program} failed with {status}")]
    DumpFailed {
        program: String,
        /// `None` when the process was terminated by a signal.
        code: Option<i32>,
        status: String,
        stderr: String,
    },

    #[error("Error running {program}: {message}")]
    Invocation { program: String, message: String },

    #[error("Failed to write schema to {path}: {message}")]
    OutputWrite { path: String, message: String },

    #[error("Timeout: {operation} exceeded {elapsed_secs}s")]
    Timeout {
        operation: String,
        elapsed_secs: u64,
    },

    #[error("I/O error: {message}")]
    Io { message: String },

    #[error("Connection failed: {message}")]
    Connection { message: String, suggestion: String },

    #[error("Database error: {message}")]
    Database {
        message: String,
        /// e.g. "28P01" for invalid password
        sql_state: Option<String>,
        suggestion: String,
    },
}

impl ToolError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing credential error.
    pub fn missing_credential(variable: impl Into<String>) -> Self {
        Self::MissingCredential {
            variable: variable.into(),
        }
    }

    /// Create a tool-not-found error.
    pub fn tool_not_found(program: impl Into<String>) -> Self {
        Self::ToolNotFound {
            program: program.into(),
        }
    }

    /// Create a dump failure from the child's exit status and stderr.
    pub fn dump_failed(program: impl Into<String>, status: ExitStatus, stderr: &[u8]) -> Self {
        let status_text = match status.code() {
            Some(code) => format!("return code {}", code),
            None => status.to_string(),
        };
        Self::DumpFailed {
            program: program.into(),
            code: status.code(),
            status: status_text,
            stderr: String::from_utf8_lossy(stderr).trim_end().to_string(),
        }
    }

    /// Create an invocation error for a child process that could not be run or awaited.
    pub fn invocation(program: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invocation {
            program: program.into(),
            message: message.into(),
        }
    }

    /// Create an output file write error.
    pub fn output_write(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::OutputWrite {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a timeout error.
    pub fn timeout(operation: impl Into<String>, elapsed_secs: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            elapsed_secs,
        }
    }

    /// Create an I/O error.
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Create a connection error with a helpful suggestion.
    pub fn connection(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Create a database error with optional SQL state.
    pub fn database(
        message: impl Into<String>,
        sql_state: Option<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self::Database {
            message: message.into(),
            sql_state,
            suggestion: suggestion.into(),
        }
    }

    /// Get the suggestion for this error, if available.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::MissingCredential { .. } => {
                Some("Add the database password to .env or export it in the shell")
            }
            Self::Connection { suggestion, .. } => Some(suggestion),
            Self::Database { suggestion, .. } => Some(suggestion),
            Self::Timeout { .. } => Some("Check network connectivity or raise the timeout"),
            _ => None,
        }
    }

    /// Whether this error was raised before any subprocess or network activity.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. } | Self::MissingCredential { .. })
    }
}

/// Convert sqlx errors to ToolError.
impl From<sqlx::Error> for ToolError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Configuration(msg) => ToolError::connection(
                msg.to_string(),
                "Check the host, port, user and database settings",
            ),
            sqlx::Error::Database(db_err) => {
                let code = db_err.code().map(|c| c.to_string());
                let suggestion = match code.as_deref() {
                    Some("28P01") | Some("28000") => {
                        "Verify SUPABASE_DATABASE_PASSWORD and the pooler user name"
                    }
                    Some("3D000") => "Check that the database name exists",
                    Some("42P01") => "Check the referenced table or schema",
                    _ => "Check the SQL and the database server logs",
                };
                ToolError::database(db_err.message(), code, suggestion)
            }
            sqlx::Error::RowNotFound => ToolError::database(
                "No rows returned",
                None,
                "Verify the query conditions match existing data",
            ),
            sqlx::Error::Io(io_err) => {
                let suggestion = if io_err.kind() == std::io::ErrorKind::ConnectionRefused {
                    "Check that the database host and port are reachable"
                } else {
                    "Check network connectivity and database server status"
                };
                ToolError::connection(format!("I/O error: {}", io_err), suggestion)
            }
            sqlx::Error::Tls(tls_err) => ToolError::connection(
                format!("TLS error: {}", tls_err),
                "Verify TLS configuration and certificates",
            ),
            sqlx::Error::Protocol(msg) => ToolError::connection(
                format!("Protocol error: {}", msg),
                "Check database server compatibility",
            ),
            sqlx::Error::ColumnDecode { index, source } => ToolError::database(
                format!("Failed to decode column {}: {}", index, source),
                None,
                "Check the column type of the diagnostic query",
            ),
            sqlx::Error::Decode(source) => ToolError::database(
                format!("Decode error: {}", source),
                None,
                "Check the column type of the diagnostic query",
            ),
            _ => ToolError::connection(
                format!("Unknown database error: {}", err),
                "Check the database server status",
            ),
        }
    }
}

/// Result type alias for tool operations.
pub type ToolResult<T> = Result<T, ToolError>;
