//! 稳定的 DTO 与 API 响应契约。

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 标准 API 响应封装（失败响应与指标快照使用）。
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

/// 失败响应的错误体。
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiError {
                code: code.into(),
                message: message.into(),
            }),
        }
    }
}

/// 单条读数写入请求体。
///
/// `value`、`temperature` 与 `timestamp` 保留原始 JSON 值，类型检查放在
/// 写入服务中完成，以便类型错误同样返回 400 而不是提取器的 422。
#[derive(Debug, Default, Deserialize)]
pub struct InsertMeasurementRequest {
    #[serde(default)]
    pub value: Option<Value>,
    /// 旧版客户端的读数字段名。
    #[serde(default)]
    pub temperature: Option<Value>,
    #[serde(default, alias = "deviceId")]
    pub device_id: Option<String>,
    #[serde(default, alias = "clientId")]
    pub client_id: Option<String>,
    #[serde(default, alias = "sensorType")]
    pub sensor_type: Option<String>,
    #[serde(default)]
    pub timestamp: Option<Value>,
}

impl InsertMeasurementRequest {
    /// 取出读数：同时提供两个字段时以 `temperature` 为准。
    pub fn take_reading(&mut self) -> Option<Value> {
        self.temperature.take().or_else(|| self.value.take())
    }
}

/// 写入成功确认。
#[derive(Debug, Serialize)]
pub struct InsertAck {
    pub success: bool,
}

impl InsertAck {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// 最近读数查询参数。
#[derive(Debug, Default, Deserialize)]
pub struct MeasurementsQuery {
    #[serde(default, alias = "deviceId")]
    pub device_id: Option<String>,
}

/// 查询结果行。`time` 为 RFC 3339（UTC，毫秒精度）。
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct MeasurementRowDto {
    pub time: String,
    pub value: f64,
    pub device_id: String,
}

/// 指标快照。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshotDto {
    pub points_accepted: u64,
    pub points_rejected: u64,
    pub write_failure: u64,
    pub query_success: u64,
    pub query_failure: u64,
    pub store_timeouts: u64,
    pub write_latency_ms_total: u64,
    pub write_latency_ms_count: u64,
}
