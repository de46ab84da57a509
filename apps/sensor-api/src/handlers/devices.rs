//! 设备目录 handlers
//!
//! - GET /devices - 存储中出现过的全部 device_id（去重，顺序不保证）

use crate::AppState;
use crate::utils::response::sensor_error;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

pub async fn list_devices(State(state): State<AppState>) -> Response {
    match state.service.list_devices().await {
        Ok(devices) => (StatusCode::OK, Json(devices)).into_response(),
        Err(err) => sensor_error(err),
    }
}
