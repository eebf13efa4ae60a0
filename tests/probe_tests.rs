// Backend probes against unreachable or refusing endpoints

use devdash::config::{MySqlConfig, RedisConfig};
use devdash::models::{BackendKind, BackendState};
use devdash::probe::{MySqlProbe, RedisProbe, probe};
use std::time::{Duration, Instant};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// A localhost port that was free a moment ago.
fn closed_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

fn mysql_config(host: &str, port: u16) -> MySqlConfig {
    MySqlConfig {
        host: host.into(),
        port,
        database: "app".into(),
        username: "dev".into(),
        password: "devpass".into(),
        timeout_ms: 1000,
    }
}

fn redis_config(host: &str, port: u16) -> RedisConfig {
    RedisConfig {
        host: host.into(),
        port,
        password: None,
        db: 0,
        timeout_ms: 1000,
    }
}

#[tokio::test]
async fn test_mysql_probe_closed_port_is_unavailable() {
    let health = probe(&MySqlProbe::new(mysql_config("127.0.0.1", closed_port()))).await;
    assert_eq!(health.service, BackendKind::Relational);
    assert_eq!(health.state, BackendState::Unavailable);
    assert!(health.metrics.is_empty());
    assert!(health.version.is_none());
    assert!(health.message.starts_with("MySQL "));
}

#[tokio::test]
async fn test_redis_probe_closed_port_is_unavailable() {
    let health = probe(&RedisProbe::new(redis_config("127.0.0.1", closed_port()))).await;
    assert_eq!(health.service, BackendKind::Cache);
    assert_eq!(health.state, BackendState::Unavailable);
    assert!(health.metrics.is_empty());
    assert!(health.message.starts_with("Redis "));
}

#[tokio::test]
async fn test_probes_on_unresolvable_host_are_unavailable() {
    let host = "devdash-no-such-host.invalid";
    let mysql_probe = MySqlProbe::new(mysql_config(host, 3306));
    let redis_probe = RedisProbe::new(redis_config(host, 6379));
    let start = Instant::now();
    let (mysql, redis) = tokio::join!(probe(&mysql_probe), probe(&redis_probe));
    assert!(start.elapsed() < Duration::from_secs(3));
    for health in [mysql, redis] {
        assert_eq!(health.state, BackendState::Unavailable);
        assert!(health.metrics.is_empty());
        assert!(!health.message.is_empty());
    }
}

/// Answer the first connection with a MySQL ERR packet (1045, SQLSTATE 28000) instead
/// of a handshake, the way a server refusing the credentials does.
async fn access_denied_server() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut payload = vec![0xff, 0x15, 0x04];
        payload.extend_from_slice(b"#28000");
        payload.extend_from_slice(b"Access denied for user 'dev'@'localhost' (using password: YES)");
        let len = payload.len() as u32;
        let mut packet = vec![len as u8, (len >> 8) as u8, (len >> 16) as u8, 0];
        packet.extend_from_slice(&payload);
        socket.write_all(&packet).await.unwrap();
        let mut buf = [0u8; 512];
        while let Ok(n) = socket.read(&mut buf).await {
            if n == 0 {
                break;
            }
        }
    });
    port
}

#[tokio::test]
async fn test_mysql_probe_access_denied_is_error() {
    let port = access_denied_server().await;
    let health = probe(&MySqlProbe::new(mysql_config("127.0.0.1", port))).await;
    assert_eq!(health.service, BackendKind::Relational);
    assert_eq!(health.state, BackendState::Error);
    assert!(health.metrics.is_empty());
    assert!(health.version.is_none());
    assert!(health.message.starts_with("MySQL connection rejected"));
    assert!(health.message.contains("Access denied for user 'dev'"));
}
