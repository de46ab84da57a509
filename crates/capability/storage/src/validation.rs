//! 验证辅助函数
//!
//! 存储边界上的最后一道检查：
//! - ensure_point：标签与 measurement 非空且能被 line protocol 无歧义编码、
//!   value 为有限数、时间戳在可存储范围内

use crate::error::StorageError;
use domain::{
    MeasurementPoint, is_storable_timestamp, measurement_name_violation, tag_value_violation,
};

/// 验证点满足持久化前提
pub fn ensure_point(point: &MeasurementPoint) -> Result<(), StorageError> {
    if point.device_id.is_empty() {
        return Err(StorageError::new("device_id required"));
    }
    if point.measurement.is_empty() {
        return Err(StorageError::new("measurement required"));
    }
    if point.client_id.is_empty() {
        return Err(StorageError::new("client_id required"));
    }
    if let Some(rule) = measurement_name_violation(&point.measurement) {
        return Err(StorageError::new(format!("measurement {rule}")));
    }
    for (tag, value) in [("device_id", &point.device_id), ("client_id", &point.client_id)] {
        if let Some(rule) = tag_value_violation(value) {
            return Err(StorageError::new(format!("{tag} {rule}")));
        }
    }
    if !point.value.is_finite() {
        return Err(StorageError::new("value must be finite"));
    }
    if !is_storable_timestamp(point.ts_ms) {
        return Err(StorageError::new(format!(
            "timestamp {} out of range",
            point.ts_ms
        )));
    }
    Ok(())
}
