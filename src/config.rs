use thiserror::Error;

/// 設定のエラー
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 環境変数の値が不正
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// データベース接続先の設定
///
/// 資格情報は含まない。`Library::connect`が引数で受け取る。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            max_connections: 5,
            connect_timeout_secs: 5,
        }
    }
}

impl DatabaseConfig {
    /// 環境変数から読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            host: std::env::var("LIBRARY_DB_HOST").unwrap_or(defaults.host),
            port: parse_env("LIBRARY_DB_PORT", defaults.port)?,
            max_connections: parse_env("LIBRARY_DB_MAX_CONNECTIONS", defaults.max_connections)?,
            connect_timeout_secs: parse_env(
                "LIBRARY_DB_CONNECT_TIMEOUT_SECS",
                defaults.connect_timeout_secs,
            )?,
        })
    }
}

/// サーバーの設定
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database: DatabaseConfig,
    pub database_name: String,
    pub username: String,
    pub password: String,
    pub port: u16,
}

impl ServerConfig {
    /// 環境変数から読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            database: DatabaseConfig::from_env()?,
            database_name: std::env::var("LIBRARY_DB_NAME").unwrap_or_else(|_| "library".into()),
            username: std::env::var("LIBRARY_DB_USER").unwrap_or_else(|_| "postgres".into()),
            password: std::env::var("LIBRARY_DB_PASSWORD").unwrap_or_default(),
            port: parse_env("PORT", 3000)?,
        })
    }
}

fn parse_env<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(value) => parse_value(name, &value),
        Err(_) => Ok(default),
    }
}

fn parse_value<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        name,
        value: value.to_string(),
    })
}
