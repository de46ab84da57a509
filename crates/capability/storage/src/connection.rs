//! HTTP 连接管理
//!
//! 提供时序存储使用的 HTTP 客户端初始化：
//! - http_client：带请求超时的 reqwest 客户端（内部连接池，可跨请求共享）

use crate::error::StorageError;
use std::time::Duration;

/// 建立 HTTP 客户端
///
/// # 参数
/// - `timeout`：单个请求的整体超时
///
/// # 返回
/// - `Result<reqwest::Client, StorageError>`：客户端或错误
pub fn http_client(timeout: Duration) -> Result<reqwest::Client, StorageError> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
        .build()?;
    Ok(client)
}
