// Redis probe: INFO, DBSIZE and a SET/GET round trip on a short-lived key.

use redis::aio::MultiplexedConnection;
use redis::{ConnectionAddr, ConnectionInfo, RedisConnectionInfo, RedisError};
use std::collections::HashMap;
use std::time::Duration;

use super::{BackendProbe, ProbeError, ProbeReport, format_uptime};
use crate::config::RedisConfig;
use crate::models::BackendKind;

const SMOKE_KEY: &str = "devdash:smoke_test";
const SMOKE_TTL_SECS: u64 = 60;

pub struct RedisProbe {
    config: RedisConfig,
}

impl RedisProbe {
    pub fn new(config: RedisConfig) -> Self {
        Self { config }
    }

    fn connection_info(&self) -> ConnectionInfo {
        ConnectionInfo {
            addr: ConnectionAddr::Tcp(self.config.host.clone(), self.config.port),
            redis: RedisConnectionInfo {
                db: self.config.db,
                password: self.config.password.clone(),
                ..Default::default()
            },
        }
    }

    async fn collect(&self, con: &mut MultiplexedConnection) -> Result<ProbeReport, ProbeError> {
        let info: String = redis::cmd("INFO")
            .query_async(con)
            .await
            .map_err(|e| query_error("INFO", e))?;
        let keys: u64 = redis::cmd("DBSIZE")
            .query_async(con)
            .await
            .map_err(|e| query_error("DBSIZE", e))?;

        let stamp = format!("devdash {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
        let _: () = redis::cmd("SET")
            .arg(SMOKE_KEY)
            .arg(&stamp)
            .arg("EX")
            .arg(SMOKE_TTL_SECS)
            .query_async(con)
            .await
            .map_err(|e| query_error("SET", e))?;
        let read_back: Option<String> = redis::cmd("GET")
            .arg(SMOKE_KEY)
            .query_async(con)
            .await
            .map_err(|e| query_error("GET", e))?;

        let fields = parse_info(&info);
        let uptime_seconds = fields
            .get("uptime_in_seconds")
            .and_then(|v| v.parse::<u64>().ok());

        let mut report = ProbeReport {
            version: fields.get("redis_version").map(|v| v.to_string()),
            uptime_seconds,
            ..Default::default()
        };
        let metrics = &mut report.metrics;
        if let Some(secs) = uptime_seconds {
            metrics.insert("uptime".into(), format_uptime(secs));
        }
        if let Some(clients) = fields.get("connected_clients") {
            metrics.insert("connectedClients".into(), clients.to_string());
        }
        if let Some(mem) = fields.get("used_memory_human") {
            metrics.insert("memoryUsed".into(), mem.to_string());
        }
        metrics.insert("keys".into(), keys.to_string());
        let smoke = if read_back.as_deref() == Some(stamp.as_str()) {
            "ok"
        } else {
            "mismatch"
        };
        metrics.insert("smokeTest".into(), smoke.into());
        Ok(report)
    }
}

#[async_trait::async_trait]
impl BackendProbe for RedisProbe {
    fn kind(&self) -> BackendKind {
        BackendKind::Cache
    }

    fn timeout(&self) -> Duration {
        self.config.timeout()
    }

    #[tracing::instrument(skip(self), fields(backend = "redis", host = %self.config.host, port = self.config.port))]
    async fn check(&self) -> Result<ProbeReport, ProbeError> {
        let client = redis::Client::open(self.connection_info())
            .map_err(|e| ProbeError::Rejected(e.to_string()))?;
        // Dropping the multiplexed connection closes the socket.
        let mut con = client
            .get_multiplexed_async_connection()
            .await
            .map_err(connect_error)?;
        self.collect(&mut con).await
    }
}

fn connect_error(e: RedisError) -> ProbeError {
    if e.is_timeout() {
        ProbeError::Unreachable(format!("timed out: {}", e))
    } else if e.is_connection_refusal() || e.is_io_error() {
        ProbeError::Unreachable(e.to_string())
    } else {
        ProbeError::Rejected(e.to_string())
    }
}

fn query_error(query: &str, e: RedisError) -> ProbeError {
    if e.is_io_error() || e.is_connection_dropped() {
        return ProbeError::Unreachable(e.to_string());
    }
    ProbeError::Query {
        query: query.to_string(),
        reason: e.to_string(),
    }
}

/// `key:value` lines of an INFO reply; section headers and blanks are skipped.
fn parse_info(info: &str) -> HashMap<&str, &str> {
    info.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .filter_map(|l| l.split_once(':'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const INFO_SAMPLE: &str = "# Server\r\nredis_version:7.2.4\r\nuptime_in_seconds:3725\r\n\r\n# Clients\r\nconnected_clients:2\r\n# Memory\r\nused_memory:1048576\r\nused_memory_human:1.00M\r\n";

    #[test]
    fn parse_info_reads_fields_across_sections() {
        let fields = parse_info(INFO_SAMPLE);
        assert_eq!(fields.get("redis_version"), Some(&"7.2.4"));
        assert_eq!(fields.get("uptime_in_seconds"), Some(&"3725"));
        assert_eq!(fields.get("connected_clients"), Some(&"2"));
        assert_eq!(fields.get("used_memory_human"), Some(&"1.00M"));
        assert!(!fields.contains_key("# Server"));
    }

    #[test]
    fn parse_info_keeps_colons_in_values() {
        let fields = parse_info("executable:/usr/bin/redis-server\nconfig:C:\\redis.conf\n");
        assert_eq!(fields.get("config"), Some(&"C:\\redis.conf"));
    }

    #[test]
    fn connection_info_carries_db_and_password() {
        let probe = RedisProbe::new(RedisConfig {
            host: "cache.local".into(),
            port: 6380,
            password: Some("secret".into()),
            db: 2,
            timeout_ms: 100,
        });
        let info = probe.connection_info();
        assert_eq!(info.redis.db, 2);
        assert_eq!(info.redis.password.as_deref(), Some("secret"));
        match info.addr {
            ConnectionAddr::Tcp(host, port) => {
                assert_eq!(host, "cache.local");
                assert_eq!(port, 6380);
            }
            other => panic!("unexpected addr: {:?}", other),
        }
    }
}
