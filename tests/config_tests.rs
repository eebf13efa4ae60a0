// Config loading and validation tests

use devdash::config::{AppConfig, ProviderKind};

const VALID_CONFIG: &str = r#"
[server]
port = 8081
host = "0.0.0.0"

[mysql]
host = "127.0.0.1"
port = 3306
database = "app"
username = "dev"
password = "devpass"

[redis]
host = "127.0.0.1"
port = 6379
"#;

#[test]
fn test_config_loads_from_str() {
    let config = AppConfig::load_from_str(VALID_CONFIG).expect("load_from_str");
    assert_eq!(config.server.port, 8081);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.mysql.database, "app");
    assert_eq!(config.mysql.username, "dev");
    assert_eq!(config.mysql.password, "devpass");
    assert_eq!(config.redis.port, 6379);
}

#[test]
fn test_config_defaults_when_omitted() {
    let config = AppConfig::load_from_str(VALID_CONFIG).expect("valid");
    assert_eq!(config.inventory.provider, ProviderKind::Cli);
    assert_eq!(config.inventory.program, "docker");
    assert_eq!(config.inventory.version_args, vec!["--version".to_string()]);
    assert_eq!(config.inventory.version_marker, "Docker version");
    assert_eq!(
        config.inventory.list_args.last().map(String::as_str),
        Some("{{.Names}}\t{{.Status}}\t{{.Image}}")
    );
    assert_eq!(config.inventory.timeout_ms, 5000);
    assert_eq!(config.mysql.timeout_ms, 3000);
    assert_eq!(config.redis.timeout_ms, 3000);
    assert_eq!(config.redis.db, 0);
    assert!(config.redis.password.is_none());
}

#[test]
fn test_config_loads_docker_api_provider() {
    let with_inventory = format!(
        "{}\n[inventory]\nprovider = \"docker_api\"\ntimeout_ms = 1500\n",
        VALID_CONFIG
    );
    let config = AppConfig::load_from_str(&with_inventory).expect("valid");
    assert_eq!(config.inventory.provider, ProviderKind::DockerApi);
    assert_eq!(config.inventory.timeout_ms, 1500);
}

#[test]
fn test_config_validation_rejects_invalid_port() {
    let bad = VALID_CONFIG.replace("port = 8081", "port = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("server.port"));
}

#[test]
fn test_config_validation_rejects_empty_server_host() {
    let bad = VALID_CONFIG.replace("host = \"0.0.0.0\"", "host = \"\"");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("server.host"));
}

#[test]
fn test_config_validation_rejects_empty_mysql_database() {
    let bad = VALID_CONFIG.replace("database = \"app\"", "database = \"\"");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("mysql.database"));
}

#[test]
fn test_config_validation_rejects_empty_mysql_username() {
    let bad = VALID_CONFIG.replace("username = \"dev\"", "username = \"\"");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("mysql.username"));
}

#[test]
fn test_config_validation_rejects_mysql_port_zero() {
    let bad = VALID_CONFIG.replace("port = 3306", "port = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("mysql.port"));
}

#[test]
fn test_config_validation_rejects_negative_redis_db() {
    let bad = format!("{}db = -1\n", VALID_CONFIG);
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("redis.db"));
}

#[test]
fn test_config_validation_rejects_redis_timeout_zero() {
    let bad = format!("{}timeout_ms = 0\n", VALID_CONFIG);
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("redis.timeout_ms"));
}

#[test]
fn test_config_validation_rejects_empty_inventory_program() {
    let bad = format!("{}\n[inventory]\nprogram = \" \"\n", VALID_CONFIG);
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("inventory.program"));
}

#[test]
fn test_config_validation_rejects_inventory_timeout_zero() {
    let bad = format!("{}\n[inventory]\ntimeout_ms = 0\n", VALID_CONFIG);
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("inventory.timeout_ms"));
}

#[test]
fn test_config_validation_rejects_missing_section() {
    let bad = VALID_CONFIG.replace("[redis]", "[cache]");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(!err.to_string().is_empty());
}

#[test]
fn test_config_validation_rejects_invalid_toml() {
    let err = AppConfig::load_from_str("not valid toml [[[").unwrap_err();
    assert!(!err.to_string().is_empty());
}

#[test]
fn test_config_load_from_file_via_env() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, VALID_CONFIG).unwrap();
    unsafe { std::env::set_var("CONFIG_FILE", path.to_str().unwrap()) };
    let result = AppConfig::load();
    unsafe { std::env::remove_var("CONFIG_FILE") };
    let config = result.expect("load from CONFIG_FILE");
    assert_eq!(config.server.port, 8081);
    assert_eq!(config.mysql.host, "127.0.0.1");
}
