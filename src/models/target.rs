//! Connection target model.
//!
//! A target holds everything needed to reach a database except the password,
//! so it can be logged and displayed freely.

use crate::credential::Credential;
use sqlx::postgres::PgConnectOptions;

/// Host, port, user and database of a PostgreSQL endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionTarget {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub database: String,
}

impl ConnectionTarget {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        user: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            user: user.into(),
            database: database.into(),
        }
    }

    /// `host:port`, as printed before connecting.
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Build sqlx connect options for this target with the given credential.
    pub fn connect_options(&self, credential: &Credential) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(credential.expose())
            .database(&self.database)
            .application_name(env!("CARGO_PKG_NAME"))
    }
}

/// Password-free form: `user@host:port/database`.
impl std::fmt::Display for ConnectionTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}@{}:{}/{}",
            self.user, self.host, self.port, self.database
        )
    }
}
