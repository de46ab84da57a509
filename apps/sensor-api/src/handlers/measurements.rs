//! 读数写入与最近窗口查询 handlers
//!
//! - POST /insert - 写入单条读数（flush 成功后才确认）
//! - GET /query?device_id= - 最近 30 分钟读数，可按设备过滤
//! - GET /temperature?device_id= - `/query` 的兼容别名

use crate::AppState;
use crate::utils::response::{bad_request_error, row_to_dto, sensor_error};
use api_contract::{InsertAck, InsertMeasurementRequest, MeasurementRowDto, MeasurementsQuery};
use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sensor_ingest::MeasurementSubmission;

/// 写入单条读数
///
/// # 流程
///
/// 1. 解析 JSON 请求体（格式错误返回 `400`）
/// 2. 调用 `service.insert` 完成校验、映射、写入与 flush
/// 3. 返回 `{"success": true}`
///
/// # 错误处理
///
/// - `400 BAD REQUEST`: 缺少 device_id、value 缺失或为 0、字段类型错误
/// - `500 INTERNAL SERVER ERROR`: 写入/flush 失败或超时
pub async fn insert_measurement(
    State(state): State<AppState>,
    payload: Result<Json<InsertMeasurementRequest>, JsonRejection>,
) -> Response {
    let Json(mut req) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return bad_request_error(rejection.body_text()),
    };
    let submission = MeasurementSubmission {
        value: req.take_reading(),
        device_id: req.device_id,
        client_id: req.client_id,
        sensor_type: req.sensor_type,
        timestamp: req.timestamp,
    };
    match state.service.insert(submission).await {
        Ok(_) => (StatusCode::OK, Json(InsertAck::ok())).into_response(),
        Err(err) => sensor_error(err),
    }
}

/// 查询最近窗口内的读数
///
/// 结果按存储迭代顺序返回，不保证时间有序；窗口内无数据时返回空数组。
///
/// # 错误处理
///
/// - `400 BAD REQUEST`: device_id 含控制字符
/// - `500 INTERNAL SERVER ERROR`: 查询失败（不返回部分结果）
pub async fn list_measurements(
    State(state): State<AppState>,
    query: Result<Query<MeasurementsQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return bad_request_error(rejection.body_text()),
    };
    match state.service.query_recent(query.device_id).await {
        Ok(rows) => {
            let data: Vec<MeasurementRowDto> = rows.into_iter().map(row_to_dto).collect();
            (StatusCode::OK, Json(data)).into_response()
        }
        Err(err) => sensor_error(err),
    }
}
