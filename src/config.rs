use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub inventory: InventoryConfig,
    pub mysql: MySqlConfig,
    pub redis: RedisConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

/// Where the container listing comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Run the listing command and parse its tab-separated output.
    #[default]
    Cli,
    /// Ask the Docker daemon over its local socket.
    DockerApi,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InventoryConfig {
    #[serde(default)]
    pub provider: ProviderKind,
    #[serde(default = "default_program")]
    pub program: String,
    #[serde(default = "default_version_args")]
    pub version_args: Vec<String>,
    /// Substring the version probe output must contain for the tool to count as available.
    #[serde(default = "default_version_marker")]
    pub version_marker: String,
    /// Must make the tool print `NAME\tSTATUS[\tIMAGE]` lines without a header.
    #[serde(default = "default_list_args")]
    pub list_args: Vec<String>,
    #[serde(default = "default_inventory_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            program: default_program(),
            version_args: default_version_args(),
            version_marker: default_version_marker(),
            list_args: default_list_args(),
            timeout_ms: default_inventory_timeout_ms(),
        }
    }
}

impl InventoryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn default_program() -> String {
    "docker".into()
}

fn default_version_args() -> Vec<String> {
    vec!["--version".into()]
}

fn default_version_marker() -> String {
    "Docker version".into()
}

fn default_list_args() -> Vec<String> {
    vec![
        "ps".into(),
        "-a".into(),
        "--format".into(),
        "{{.Names}}\t{{.Status}}\t{{.Image}}".into(),
    ]
}

fn default_inventory_timeout_ms() -> u64 {
    5000
}

#[derive(Debug, Clone, Deserialize)]
pub struct MySqlConfig {
    pub host: String,
    #[serde(default = "default_mysql_port")]
    pub port: u16,
    pub database: String,
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_probe_timeout_ms")]
    pub timeout_ms: u64,
}

impl MySqlConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn default_mysql_port() -> u16 {
    3306
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub host: String,
    #[serde(default = "default_redis_port")]
    pub port: u16,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub db: i64,
    #[serde(default = "default_probe_timeout_ms")]
    pub timeout_ms: u64,
}

impl RedisConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn default_redis_port() -> u16 {
    6379
}

fn default_probe_timeout_ms() -> u64 {
    3000
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("reading config {}: {}", path, e))?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(!self.server.host.is_empty(), "server.host must be non-empty");
        if self.inventory.provider == ProviderKind::Cli {
            anyhow::ensure!(
                !self.inventory.program.trim().is_empty(),
                "inventory.program must be non-empty"
            );
            anyhow::ensure!(
                !self.inventory.list_args.is_empty(),
                "inventory.list_args must be non-empty"
            );
        }
        anyhow::ensure!(
            self.inventory.timeout_ms > 0,
            "inventory.timeout_ms must be > 0, got {}",
            self.inventory.timeout_ms
        );
        anyhow::ensure!(!self.mysql.host.is_empty(), "mysql.host must be non-empty");
        anyhow::ensure!(
            self.mysql.port > 0,
            "mysql.port must be between 1 and 65535, got {}",
            self.mysql.port
        );
        anyhow::ensure!(
            !self.mysql.database.is_empty(),
            "mysql.database must be non-empty"
        );
        anyhow::ensure!(
            !self.mysql.username.is_empty(),
            "mysql.username must be non-empty"
        );
        anyhow::ensure!(
            self.mysql.timeout_ms > 0,
            "mysql.timeout_ms must be > 0, got {}",
            self.mysql.timeout_ms
        );
        anyhow::ensure!(!self.redis.host.is_empty(), "redis.host must be non-empty");
        anyhow::ensure!(
            self.redis.port > 0,
            "redis.port must be between 1 and 65535, got {}",
            self.redis.port
        );
        anyhow::ensure!(
            self.redis.db >= 0,
            "redis.db must be >= 0, got {}",
            self.redis.db
        );
        anyhow::ensure!(
            self.redis.timeout_ms > 0,
            "redis.timeout_ms must be > 0, got {}",
            self.redis.timeout_ms
        );
        Ok(())
    }
}
