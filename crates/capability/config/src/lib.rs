//! 应用运行配置加载。

use std::env;

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env: {0}")]
    Missing(String),
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 时序存储后端选择。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// InfluxDB v2 HTTP API。
    Influx(InfluxConfig),
    /// 进程内存储（本地演示与测试）。
    Memory,
}

/// InfluxDB 连接参数。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfluxConfig {
    pub url: String,
    pub token: String,
    pub org: String,
    pub bucket: String,
}

/// 应用运行配置。
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http_addr: String,
    pub store: StoreBackend,
    pub store_timeout_ms: u64,
    pub cors_allow_any: bool,
}

impl AppConfig {
    /// 从环境变量读取配置。
    pub fn from_env() -> Result<Self, ConfigError> {
        let http_addr = match read_optional("SENSOR_HTTP_ADDR") {
            Some(addr) => addr,
            None => match read_optional("PORT") {
                Some(port) => {
                    let port = port
                        .parse::<u16>()
                        .map_err(|_| ConfigError::Invalid("PORT".to_string(), port))?;
                    format!("0.0.0.0:{port}")
                }
                None => "127.0.0.1:3001".to_string(),
            },
        };
        let store = read_store_backend()?;
        let store_timeout_ms = read_u64_with_default("SENSOR_STORE_TIMEOUT_MS", 5000)?;
        if store_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "SENSOR_STORE_TIMEOUT_MS".to_string(),
                "0".to_string(),
            ));
        }
        let cors_allow_any = read_bool_with_default("SENSOR_CORS_ALLOW_ANY", true);

        Ok(Self {
            http_addr,
            store,
            store_timeout_ms,
            cors_allow_any,
        })
    }
}

fn read_store_backend() -> Result<StoreBackend, ConfigError> {
    let kind = env::var("SENSOR_STORE").unwrap_or_else(|_| "influx".to_string());
    match kind.trim().to_ascii_lowercase().as_str() {
        "memory" => Ok(StoreBackend::Memory),
        "influx" | "" => Ok(StoreBackend::Influx(InfluxConfig {
            url: read_required("INFLUX_URL")?,
            token: read_required("INFLUX_TOKEN")?,
            org: read_required("INFLUX_ORG")?,
            bucket: read_required("INFLUX_BUCKET")?,
        })),
        _ => Err(ConfigError::Invalid("SENSOR_STORE".to_string(), kind)),
    }
}

fn read_required(key: &str) -> Result<String, ConfigError> {
    read_optional(key).ok_or_else(|| ConfigError::Missing(key.to_string()))
}

fn read_u64_with_default(key: &str, default: u64) -> Result<u64, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    value
        .parse::<u64>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_optional(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}

fn read_bool_with_default(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "on"),
        Err(_) => default,
    }
}
