//! HTTP 响应辅助函数和 DTO 转换
//!
//! - 错误响应：bad_request_error, sensor_error
//! - DTO 转换：row_to_dto
//!
//! 设计原则：
//! - 所有错误返回统一的 ApiResponse 格式
//! - 存储错误只返回通用提示，细节留在日志中

use api_contract::{ApiResponse, MeasurementRowDto};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, SecondsFormat, Utc};
use domain::MeasurementRow;
use sensor_ingest::SensorError;

/// 错误请求响应
pub fn bad_request_error(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::<()>::error("INVALID.REQUEST", message.into())),
    )
        .into_response()
}

/// 服务错误响应
pub fn sensor_error(err: SensorError) -> Response {
    let (code, message) = match err {
        SensorError::Validation(message) => return bad_request_error(message),
        SensorError::StoreWrite(_) => ("STORE.WRITE_FAILED", "failed to insert"),
        SensorError::StoreQuery(_) => ("STORE.QUERY_FAILED", "failed to query"),
        SensorError::Timeout(_) => ("STORE.TIMEOUT", "store timeout"),
    };
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::<()>::error(code, message)),
    )
        .into_response()
}

/// MeasurementRow 转 MeasurementRowDto
pub fn row_to_dto(row: MeasurementRow) -> MeasurementRowDto {
    MeasurementRowDto {
        time: format_time(row.ts_ms),
        value: row.value,
        device_id: row.device_id,
    }
}

fn format_time(ts_ms: i64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(ts_ms) {
        Some(time) => time.to_rfc3339_opts(SecondsFormat::Millis, true),
        None => ts_ms.to_string(),
    }
}
