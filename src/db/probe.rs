//! Connectivity check against the session pooler.
//!
//! Opens a single connection (no pool), runs two read-only queries and closes
//! the connection again whatever the outcome.

use crate::config::Config;
use crate::credential::Credential;
use crate::error::{ToolError, ToolResult};
use crate::models::{ConnectionTarget, ProbeReport};
use sqlx::{Connection, PgConnection};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, warn};

const VERSION_QUERY: &str = "SELECT version()";
const TABLE_COUNT_QUERY: &str =
    "SELECT count(*) FROM information_schema.tables WHERE table_schema = $1";

/// Runs the diagnostic queries against one target.
#[derive(Debug, Clone)]
pub struct ConnectionTester {
    target: ConnectionTarget,
    schema: String,
    connect_timeout: Duration,
    query_timeout: Duration,
}

impl ConnectionTester {
    pub fn new(
        target: ConnectionTarget,
        schema: impl Into<String>,
        connect_timeout: Duration,
        query_timeout: Duration,
    ) -> Self {
        Self {
            target,
            schema: schema.into(),
            connect_timeout,
            query_timeout,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.pooler_target(),
            &config.schema,
            config.connect_timeout_duration(),
            config.query_timeout_duration(),
        )
    }

    pub fn target(&self) -> &ConnectionTarget {
        &self.target
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// Connect, query and disconnect.
    pub async fn probe(&self, credential: &Credential) -> ToolResult<ProbeReport> {
        let options = self.target.connect_options(credential);

        info!(endpoint = %self.target, "Connecting to database");
        let mut conn = bounded(
            "connect",
            self.connect_timeout,
            PgConnection::connect_with(&options),
        )
        .await?;
        debug!(endpoint = %self.target, "Connected");

        let result = self.run_queries(&mut conn).await;

        // Closed on success and failure alike.
        if let Err(e) = conn.close().await {
            warn!(error = %e, "Failed to close connection cleanly");
        } else {
            debug!("Connection closed");
        }

        result
    }

    async fn run_queries(&self, conn: &mut PgConnection) -> ToolResult<ProbeReport> {
        let server_version: String = bounded(
            "version query",
            self.query_timeout,
            sqlx::query_scalar::<_, String>(VERSION_QUERY).fetch_one(&mut *conn),
        )
        .await?;
        debug!(version = %server_version, "Got server version");

        let table_count: i64 = bounded(
            "table count query",
            self.query_timeout,
            sqlx::query_scalar::<_, i64>(TABLE_COUNT_QUERY)
                .bind(self.schema.as_str())
                .fetch_one(&mut *conn),
        )
        .await?;
        debug!(schema = %self.schema, table_count, "Counted tables");

        Ok(ProbeReport {
            server_version,
            table_count,
        })
    }
}

/// Await a database future with an upper bound.
async fn bounded<T, F>(operation: &str, limit: Duration, fut: F) -> ToolResult<T>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result.map_err(ToolError::from),
        Err(_) => Err(ToolError::timeout(operation, limit.as_secs())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_uses_pooler() {
        let tester = ConnectionTester::from_config(&Config::default_config());
        assert_eq!(tester.target().port, 6543);
        assert_eq!(tester.target().user, "postgres.dyowbujltaepepjzlnjb");
        assert_eq!(tester.schema(), "public");
    }

    #[tokio::test]
    async fn test_bounded_times_out() {
        let err = bounded::<(), _>("sleep", Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await
        .unwrap_err();
        assert!(matches!(err, ToolError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_bounded_maps_sqlx_error() {
        let err = bounded::<(), _>("query", Duration::from_secs(1), async {
            Err(sqlx::Error::RowNotFound)
        })
        .await
        .unwrap_err();
        assert!(matches!(err, ToolError::Database { .. }));
    }
}
