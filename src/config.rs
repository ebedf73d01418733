//! Configuration handling for the schema tools.
//!
//! Every connection parameter is a CLI flag backed by an environment variable
//! with a documented default. The database password is not part of this
//! structure; see [`crate::credential`].

use crate::error::{ToolError, ToolResult};
use crate::models::ConnectionTarget;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PROJECT_REF: &str = "dyowbujltaepepjzlnjb";
pub const DEFAULT_DATABASE: &str = "postgres";
pub const DEFAULT_SCHEMA: &str = "public";
pub const DEFAULT_USER: &str = "postgres";
/// Direct connection port used by pg_dump.
pub const DEFAULT_DUMP_PORT: u16 = 5432;
/// Session pooler port used by the connection tester.
pub const DEFAULT_POOLER_PORT: u16 = 6543;
pub const DEFAULT_OUTPUT_FILE: &str = "supabase_schema.sql";
pub const DEFAULT_PG_DUMP: &str = "pg_dump";
pub const DEFAULT_DUMP_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Command line interface.
#[derive(Parser, Debug, Clone)]
#[command(name = "supabase-schema-tools")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub config: Config,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Export the schema with pg_dump into the output file
    DumpSchema,
    /// Connect through the session pooler and run diagnostic queries
    TestConnection,
}

/// Connection and runtime settings shared by both commands.
#[derive(Args, Debug, Clone)]
pub struct Config {
    /// Supabase project reference (the `<ref>` in db.<ref>.supabase.co)
    #[arg(
        long,
        global = true,
        default_value = DEFAULT_PROJECT_REF,
        env = "SUPABASE_PROJECT_REF"
    )]
    pub project_ref: String,

    /// Database host override (defaults to db.<project_ref>.supabase.co)
    #[arg(long, global = true, env = "SUPABASE_DB_HOST")]
    pub host: Option<String>,

    /// Database name
    #[arg(
        long = "dbname",
        global = true,
        default_value = DEFAULT_DATABASE,
        env = "SUPABASE_DB_NAME"
    )]
    pub database: String,

    /// Schema to dump and count tables in
    #[arg(
        long,
        global = true,
        default_value = DEFAULT_SCHEMA,
        env = "SUPABASE_DB_SCHEMA"
    )]
    pub schema: String,

    /// Database user (the pooler user is `<user>.<project_ref>`)
    #[arg(
        long,
        global = true,
        default_value = DEFAULT_USER,
        env = "SUPABASE_DB_USER"
    )]
    pub user: String,

    /// Port used by pg_dump (direct connection)
    #[arg(
        long,
        global = true,
        default_value_t = DEFAULT_DUMP_PORT,
        env = "SUPABASE_DUMP_PORT"
    )]
    pub dump_port: u16,

    /// Port used by the connection tester (session pooler)
    #[arg(
        long,
        global = true,
        default_value_t = DEFAULT_POOLER_PORT,
        env = "SUPABASE_POOLER_PORT"
    )]
    pub pooler_port: u16,

    /// File the schema is written to
    #[arg(
        short,
        long,
        global = true,
        value_name = "FILE",
        default_value = DEFAULT_OUTPUT_FILE,
        env = "SUPABASE_SCHEMA_OUTPUT"
    )]
    pub output: PathBuf,

    /// pg_dump executable (looked up on PATH unless a path is given)
    #[arg(
        long = "pg-dump",
        global = true,
        value_name = "PROGRAM",
        default_value = DEFAULT_PG_DUMP,
        env = "PG_DUMP_PATH"
    )]
    pub pg_dump: PathBuf,

    /// Upper bound for the pg_dump run in seconds
    #[arg(
        long,
        global = true,
        default_value_t = DEFAULT_DUMP_TIMEOUT_SECS,
        env = "SUPABASE_DUMP_TIMEOUT"
    )]
    pub dump_timeout: u64,

    /// Connection timeout in seconds
    #[arg(
        long,
        global = true,
        default_value_t = DEFAULT_CONNECT_TIMEOUT_SECS,
        env = "SUPABASE_CONNECT_TIMEOUT"
    )]
    pub connect_timeout: u64,

    /// Per-query timeout in seconds
    #[arg(
        long,
        global = true,
        default_value_t = DEFAULT_QUERY_TIMEOUT_SECS,
        env = "SUPABASE_QUERY_TIMEOUT"
    )]
    pub query_timeout: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(
        long,
        global = true,
        default_value = DEFAULT_LOG_LEVEL,
        env = "SUPABASE_LOG_LEVEL"
    )]
    pub log_level: String,

    /// Enable JSON logging format
    #[arg(long, global = true, env = "SUPABASE_JSON_LOGS")]
    pub json_logs: bool,

    /// Enable logging output on stderr (off by default; RUST_LOG also enables it)
    #[arg(long, global = true, env = "SUPABASE_ENABLE_LOGS")]
    pub enable_logs: bool,
}

impl Config {
    /// Create a default configuration (useful for testing).
    pub fn default_config() -> Self {
        Self {
            project_ref: DEFAULT_PROJECT_REF.to_string(),
            host: None,
            database: DEFAULT_DATABASE.to_string(),
            schema: DEFAULT_SCHEMA.to_string(),
            user: DEFAULT_USER.to_string(),
            dump_port: DEFAULT_DUMP_PORT,
            pooler_port: DEFAULT_POOLER_PORT,
            output: PathBuf::from(DEFAULT_OUTPUT_FILE),
            pg_dump: PathBuf::from(DEFAULT_PG_DUMP),
            dump_timeout: DEFAULT_DUMP_TIMEOUT_SECS,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT_SECS,
            query_timeout: DEFAULT_QUERY_TIMEOUT_SECS,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            json_logs: false,
            enable_logs: false,
        }
    }

    /// Reject values that cannot produce a usable connection.
    pub fn validate(&self) -> ToolResult<()> {
        let required = [
            ("project ref", &self.project_ref),
            ("database", &self.database),
            ("schema", &self.schema),
            ("user", &self.user),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ToolError::config(format!("{} cannot be empty", name)));
            }
        }
        if !self
            .project_ref
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(ToolError::config(format!(
                "project ref contains invalid characters: {}",
                self.project_ref
            )));
        }
        if matches!(&self.host, Some(h) if h.trim().is_empty()) {
            return Err(ToolError::config("host cannot be empty"));
        }
        if self.dump_port == 0 || self.pooler_port == 0 {
            return Err(ToolError::config("ports must be greater than 0"));
        }
        if self.dump_timeout == 0 || self.connect_timeout == 0 || self.query_timeout == 0 {
            return Err(ToolError::config("timeouts must be greater than 0"));
        }
        if self.output.as_os_str().is_empty() {
            return Err(ToolError::config("output file cannot be empty"));
        }
        Ok(())
    }

    /// Database host: the override if given, else the project's Supabase host.
    pub fn host(&self) -> String {
        match &self.host {
            Some(host) => host.clone(),
            None => format!("db.{}.supabase.co", self.project_ref),
        }
    }

    /// Target pg_dump connects to: direct port, plain user.
    pub fn dump_target(&self) -> ConnectionTarget {
        ConnectionTarget::new(self.host(), self.dump_port, &self.user, &self.database)
    }

    /// Target the connection tester uses: session pooler, project-qualified user.
    pub fn pooler_target(&self) -> ConnectionTarget {
        ConnectionTarget::new(
            self.host(),
            self.pooler_port,
            format!("{}.{}", self.user, self.project_ref),
            &self.database,
        )
    }

    pub fn dump_timeout_duration(&self) -> Duration {
        Duration::from_secs(self.dump_timeout)
    }

    pub fn connect_timeout_duration(&self) -> Duration {
        Duration::from_secs(self.connect_timeout)
    }

    pub fn query_timeout_duration(&self) -> Duration {
        Duration::from_secs(self.query_timeout)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default_config();
        assert_eq!(config.dump_port, 5432);
        assert_eq!(config.pooler_port, 6543);
        assert_eq!(config.output, PathBuf::from("supabase_schema.sql"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_host_from_project_ref() {
        let config = Config::default_config();
        assert_eq!(config.host(), "db.dyowbujltaepepjzlnjb.supabase.co");
    }

    #[test]
    fn test_host_override() {
        let config = Config {
            host: Some("127.0.0.1".to_string()),
            ..Config::default_config()
        };
        assert_eq!(config.host(), "127.0.0.1");
        assert_eq!(config.pooler_target().host, "127.0.0.1");

        let empty = Config {
            host: Some(" ".to_string()),
            ..Config::default_config()
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_dump_target_uses_direct_port_and_plain_user() {
        let target = Config::default_config().dump_target();
        assert_eq!(target.port, 5432);
        assert_eq!(target.user, "postgres");
        assert_eq!(target.database, "postgres");
    }

    #[test]
    fn test_pooler_target_qualifies_user() {
        let target = Config::default_config().pooler_target();
        assert_eq!(target.port, 6543);
        assert_eq!(target.user, "postgres.dyowbujltaepepjzlnjb");
        assert_eq!(target.host, "db.dyowbujltaepepjzlnjb.supabase.co");
    }

    #[test]
    fn test_timeout_durations() {
        let config = Config::default_config();
        assert_eq!(config.dump_timeout_duration(), Duration::from_secs(60));
        assert_eq!(config.connect_timeout_duration(), Duration::from_secs(10));
        assert_eq!(config.query_timeout_duration(), Duration::from_secs(30));
    }

    #[test]
    fn test_validate_rejects_empty_schema() {
        let config = Config {
            schema: "  ".to_string(),
            ..Config::default_config()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("schema"));
    }

    #[test]
    fn test_validate_rejects_bad_project_ref() {
        let config = Config {
            project_ref: "evil.example.com/".to_string(),
            ..Config::default_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = Config {
            dump_timeout: 0,
            ..Config::default_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_subcommand_with_global_flags() {
        let cli = Cli::try_parse_from([
            "supabase-schema-tools",
            "dump-schema",
            "--project-ref",
            "abcdef",
            "-o",
            "out.sql",
            "--dump-timeout",
            "5",
        ])
        .unwrap();
        assert_eq!(cli.command, Command::DumpSchema);
        assert_eq!(cli.config.project_ref, "abcdef");
        assert_eq!(cli.config.output, PathBuf::from("out.sql"));
        assert_eq!(cli.config.dump_timeout, 5);
    }

    #[test]
    fn test_parse_requires_subcommand() {
        assert!(Cli::try_parse_from(["supabase-schema-tools"]).is_err());
    }

    #[test]
    fn test_parse_test_connection() {
        let cli =
            Cli::try_parse_from(["supabase-schema-tools", "test-connection", "--schema", "app"])
                .unwrap();
        assert_eq!(cli.command, Command::TestConnection);
        assert_eq!(cli.config.schema, "app");
    }
}
