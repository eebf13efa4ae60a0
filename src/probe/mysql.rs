// MySQL probe via sqlx. Status queries go over the text protocol (plain `&str`
// executes), since SHOW statements are not reliably preparable.

use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlRow};
use sqlx::{ConnectOptions, Connection, Executor, Row};
use std::time::Duration;

use super::{BackendProbe, ProbeError, ProbeReport, format_uptime};
use crate::config::MySqlConfig;
use crate::models::BackendKind;

pub struct MySqlProbe {
    config: MySqlConfig,
}

impl MySqlProbe {
    pub fn new(config: MySqlConfig) -> Self {
        Self { config }
    }

    fn connect_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.config.host)
            .port(self.config.port)
            .username(&self.config.username)
            .password(&self.config.password)
            .database(&self.config.database)
    }

    async fn collect(&self, conn: &mut MySqlConnection) -> Result<ProbeReport, ProbeError> {
        let version_row = fetch_one(conn, "SELECT VERSION()").await?;
        let version = text_column(&version_row, 0);

        let uptime_seconds = status_value(conn, "Uptime")
            .await?
            .and_then(|v| v.parse::<u64>().ok());
        let connections = status_value(conn, "Threads_connected").await?;
        let queries = status_value(conn, "Queries").await?;

        let databases = fetch_column(conn, "SHOW DATABASES").await?;
        let tables_query = format!(
            "SHOW TABLES FROM `{}`",
            self.config.database.replace('`', "``")
        );
        let tables = fetch_column(conn, &tables_query).await?;

        let mut report = ProbeReport {
            version,
            uptime_seconds,
            ..Default::default()
        };
        let metrics = &mut report.metrics;
        if let Some(secs) = uptime_seconds {
            metrics.insert("uptime".into(), format_uptime(secs));
        }
        if let Some(c) = connections {
            metrics.insert("connections".into(), c);
        }
        if let Some(q) = queries {
            metrics.insert("queries".into(), q);
        }
        metrics.insert("databaseCount".into(), databases.len().to_string());
        metrics.insert("databases".into(), databases.join(", "));
        metrics.insert("tableCount".into(), tables.len().to_string());
        metrics.insert("tables".into(), tables.join(", "));
        Ok(report)
    }
}

#[async_trait::async_trait]
impl BackendProbe for MySqlProbe {
    fn kind(&self) -> BackendKind {
        BackendKind::Relational
    }

    fn timeout(&self) -> Duration {
        self.config.timeout()
    }

    #[tracing::instrument(skip(self), fields(backend = "mysql", host = %self.config.host, port = self.config.port))]
    async fn check(&self) -> Result<ProbeReport, ProbeError> {
        let mut conn = self
            .connect_options()
            .connect()
            .await
            .map_err(connect_error)?;
        let result = self.collect(&mut conn).await;
        if let Err(e) = conn.close().await {
            tracing::debug!(error = %e, "mysql close failed");
        }
        result
    }
}

fn connect_error(e: sqlx::Error) -> ProbeError {
    match e {
        sqlx::Error::Io(io) => ProbeError::Unreachable(io.to_string()),
        sqlx::Error::Database(db) => ProbeError::Rejected(db.message().to_string()),
        other => ProbeError::Rejected(other.to_string()),
    }
}

fn query_error(query: &str, e: sqlx::Error) -> ProbeError {
    ProbeError::Query {
        query: query.to_string(),
        reason: e.to_string(),
    }
}

async fn fetch_one(conn: &mut MySqlConnection, query: &str) -> Result<MySqlRow, ProbeError> {
    (&mut *conn)
        .fetch_one(query)
        .await
        .map_err(|e| query_error(query, e))
}

/// First column of every row, as text.
async fn fetch_column(
    conn: &mut MySqlConnection,
    query: &str,
) -> Result<Vec<String>, ProbeError> {
    let rows = (&mut *conn)
        .fetch_all(query)
        .await
        .map_err(|e| query_error(query, e))?;
    Ok(rows.iter().filter_map(|r| text_column(r, 0)).collect())
}

/// `Value` column of `SHOW STATUS LIKE '<name>'`, if the variable exists.
async fn status_value(
    conn: &mut MySqlConnection,
    name: &str,
) -> Result<Option<String>, ProbeError> {
    let query = format!("SHOW STATUS LIKE '{}'", name);
    let row = (&mut *conn)
        .fetch_optional(query.as_str())
        .await
        .map_err(|e| query_error(&query, e))?;
    Ok(row.and_then(|r| text_column(&r, 1)))
}

// SHOW output is sometimes typed as binary depending on server collation; read the raw text.
fn text_column(row: &MySqlRow, idx: usize) -> Option<String> {
    row.try_get_unchecked::<String, _>(idx).ok()
}
