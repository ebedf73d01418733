//! Exit status of the `supabase-schema-tools` binary.
//!
//! Reported failures keep the default status; only configuration errors exit
//! non-zero.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::process::{Command, Output};

fn run(dir: &Path, args: &[&str], envs: &[(&str, &str)]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_supabase-schema-tools"));
    command
        .args(args)
        .current_dir(dir)
        .env_remove("SUPABASE_DATABASE_PASSWORD")
        .env_remove("RUST_LOG");
    for (key, value) in envs {
        command.env(key, value);
    }
    command.output().unwrap()
}

#[test]
fn test_reported_dump_failure_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("pg_dump");
    std::fs::write(
        &script,
        "#!/bin/sh\necho 'pg_dump: error: connection to server failed' >&2\nexit 1\n",
    )
    .unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
    let output = dir.path().join("supabase_schema.sql");

    let result = run(
        dir.path(),
        &["dump-schema"],
        &[
            ("SUPABASE_DATABASE_PASSWORD", "pw"),
            ("PG_DUMP_PATH", script.to_str().unwrap()),
            ("SUPABASE_SCHEMA_OUTPUT", output.to_str().unwrap()),
        ],
    );

    assert!(result.status.success());
    let stdout = String::from_utf8(result.stdout).unwrap();
    assert!(stdout.contains("failed with return code 1"));
    assert!(!output.exists());
}

#[test]
fn test_missing_password_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("supabase_schema.sql");

    let result = run(
        dir.path(),
        &["dump-schema"],
        &[
            ("PG_DUMP_PATH", "/nonexistent/pg_dump"),
            ("SUPABASE_SCHEMA_OUTPUT", output.to_str().unwrap()),
        ],
    );

    assert!(!result.status.success());
    let stderr = String::from_utf8(result.stderr).unwrap();
    assert!(stderr.contains("SUPABASE_DATABASE_PASSWORD must be set"));
    assert!(!output.exists());
}
