//! pg_dump argument construction.

use crate::models::ConnectionTarget;

/// Variable pg_dump reads the password from.
pub const PASSWORD_VAR: &str = "PGPASSWORD";

/// Build the argument vector for a schema-only dump of one schema.
///
/// Ownership and privilege statements are left out so the output can be
/// replayed against another project.
pub fn schema_dump_args(target: &ConnectionTarget, schema: &str) -> Vec<String> {
    vec![
        format!("--host={}", target.host),
        format!("--port={}", target.port),
        format!("--username={}", target.user),
        format!("--dbname={}", target.database),
        "--schema-only".to_string(),
        "--no-owner".to_string(),
        "--no-privileges".to_string(),
        format!("--schema={}", schema),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_dump_args() {
        let target =
            ConnectionTarget::new("db.dyowbujltaepepjzlnjb.supabase.co", 5432, "postgres", "postgres");
        assert_eq!(
            schema_dump_args(&target, "public"),
            vec![
                "--host=db.dyowbujltaepepjzlnjb.supabase.co",
                "--port=5432",
                "--username=postgres",
                "--dbname=postgres",
                "--schema-only",
                "--no-owner",
                "--no-privileges",
                "--schema=public",
            ]
        );
    }

    #[test]
    fn test_args_never_contain_password_flag() {
        let target = ConnectionTarget::new("localhost", 5432, "postgres", "postgres");
        let args = schema_dump_args(&target, "public");
        assert!(args.iter().all(|a| !a.contains("password")));
    }
}
