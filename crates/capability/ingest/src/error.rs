/// 服务错误。
///
/// - `Validation`：客户端错误，存储未被访问
/// - `StoreWrite` / `StoreQuery`：存储失败，消息只写日志，不回传调用方
/// - `Timeout`：存储调用超过配置的等待上限
#[derive(Debug, thiserror::Error)]
pub enum SensorError {
    #[error("{0}")]
    Validation(String),
    #[error("store write failed: {0}")]
    StoreWrite(String),
    #[error("store query failed: {0}")]
    StoreQuery(String),
    #[error("store timeout: {0}")]
    Timeout(&'static str),
}

impl SensorError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// 是否为客户端错误。
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
