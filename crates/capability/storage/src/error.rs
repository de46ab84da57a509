//! 存储层错误类型
//!
//! 失败来源：
//! - 传输层：连接失败、请求超时（`From<reqwest::Error>`）
//! - InfluxDB 拒绝请求：非 2xx 状态，`status()` 返回状态码
//! - 响应解析：CSV 结构异常、流内错误表、`_time`/`_value` 无法解析
//! - 写入前校验：点不满足 line protocol 的约束

#[derive(Debug)]
pub struct StorageError {
    message: String,
    status: Option<u16>,
}

impl StorageError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
        }
    }

    /// InfluxDB 以非 2xx 状态拒绝请求。
    pub fn rejected(operation: &str, status: u16, body: &str) -> Self {
        Self {
            message: format!("influx {operation} failed: status {status}: {}", body.trim()),
            status: Some(status),
        }
    }

    /// 服务端返回的 HTTP 状态码（仅在请求被拒绝时存在）。
    pub fn status(&self) -> Option<u16> {
        self.status
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for StorageError {}

impl From<reqwest::Error> for StorageError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            "timed out"
        } else if err.is_connect() {
            "connect failed"
        } else {
            "transport error"
        };
        Self {
            message: format!("influx request {kind}: {err}"),
            status: err.status().map(|status| status.as_u16()),
        }
    }
}
