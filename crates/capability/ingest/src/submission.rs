//! 写入请求校验与映射
//!
//! 规则：
//! - `value` 缺失、为 null、为 0、为空字符串或 false 时拒绝（"value required"）。
//!   0 值读数同样被拒绝，这是有意保留的严格行为。
//! - `device_id` 去除首尾空格后不能为空。
//! - `client_id` 缺省为 `unknown`，`sensor_type` 缺省为 `temperature`。
//! - 标签值不能以 `\` 结尾；`sensor_type` 不能以 `#` 或 `_` 开头。
//! - `timestamp` 接受毫秒时间戳或 RFC 3339 字符串，无法解析或超出
//!   可存储范围时使用服务端时间。

use crate::error::SensorError;
use domain::{
    DEFAULT_CLIENT_ID, DEFAULT_SENSOR_TYPE, MeasurementPoint, is_storable_timestamp,
    measurement_name_violation, tag_value_violation,
};
use serde_json::Value;

/// 一次写入提交的原始字段。
#[derive(Debug, Clone, Default)]
pub struct MeasurementSubmission {
    pub value: Option<Value>,
    pub device_id: Option<String>,
    pub client_id: Option<String>,
    pub sensor_type: Option<String>,
    pub timestamp: Option<Value>,
}

impl MeasurementSubmission {
    /// 校验并映射为待写入的点。
    pub fn into_point(self, now_ms: i64) -> Result<MeasurementPoint, SensorError> {
        let value = parse_value(self.value.as_ref())?;
        let device_id = required_tag(self.device_id, "device_id")?;
        let client_id = optional_tag(self.client_id, "client_id", DEFAULT_CLIENT_ID)?;
        let measurement = optional_tag(self.sensor_type, "sensor_type", DEFAULT_SENSOR_TYPE)?;
        if let Some(rule) = measurement_name_violation(&measurement) {
            return Err(SensorError::validation(format!("sensor_type {rule}")));
        }
        let ts_ms = parse_timestamp(self.timestamp.as_ref()).unwrap_or(now_ms);
        Ok(MeasurementPoint {
            measurement,
            device_id,
            client_id,
            value,
            ts_ms,
        })
    }
}

fn parse_value(value: Option<&Value>) -> Result<f64, SensorError> {
    let number = match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => {
            return Err(SensorError::validation("value required"));
        }
        Some(Value::Number(number)) => number
            .as_f64()
            .ok_or_else(|| SensorError::validation("value must be a number"))?,
        Some(Value::String(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return Err(SensorError::validation("value required"));
            }
            text.parse::<f64>()
                .map_err(|_| SensorError::validation("value must be a number"))?
        }
        Some(_) => return Err(SensorError::validation("value must be a number")),
    };
    if number.is_nan() || number == 0.0 {
        return Err(SensorError::validation("value required"));
    }
    if !number.is_finite() {
        return Err(SensorError::validation("value must be finite"));
    }
    Ok(number)
}

fn required_tag(value: Option<String>, field: &str) -> Result<String, SensorError> {
    let trimmed = value.as_deref().map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Err(SensorError::validation(format!("{field} required")));
    }
    ensure_tag_value(trimmed, field)?;
    Ok(trimmed.to_string())
}

fn optional_tag(value: Option<String>, field: &str, default: &str) -> Result<String, SensorError> {
    match value.as_deref().map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => {
            ensure_tag_value(trimmed, field)?;
            Ok(trimmed.to_string())
        }
        _ => Ok(default.to_string()),
    }
}

fn ensure_printable(value: &str, field: &str) -> Result<(), SensorError> {
    if value.chars().any(char::is_control) {
        return Err(SensorError::validation(format!(
            "{field} contains control characters"
        )));
    }
    Ok(())
}

fn ensure_tag_value(value: &str, field: &str) -> Result<(), SensorError> {
    ensure_printable(value, field)?;
    if let Some(rule) = tag_value_violation(value) {
        return Err(SensorError::validation(format!("{field} {rule}")));
    }
    Ok(())
}

/// 解析调用方提供的时间；0、缺失、无法解析或超出可存储范围时返回 `None`。
fn parse_timestamp(value: Option<&Value>) -> Option<i64> {
    let ts_ms = match value? {
        Value::Number(number) => match number.as_i64() {
            Some(ms) => ms,
            None => {
                let ms = number.as_f64()?;
                if !ms.is_finite() || ms.abs() > i64::MAX as f64 {
                    return None;
                }
                ms.trunc() as i64
            }
        },
        Value::String(text) => {
            let text = text.trim();
            match text.parse::<i64>() {
                Ok(ms) => ms,
                Err(_) => chrono::DateTime::parse_from_rfc3339(text)
                    .ok()?
                    .timestamp_millis(),
            }
        }
        _ => return None,
    };
    if ts_ms == 0 || !is_storable_timestamp(ts_ms) {
        return None;
    }
    chrono::DateTime::from_timestamp_millis(ts_ms).map(|_| ts_ms)
}

/// 规整查询用的设备过滤值。
///
/// 去除首尾空格；空值表示不过滤；包含控制字符时拒绝。
pub fn normalize_device_filter(device_id: Option<String>) -> Result<Option<String>, SensorError> {
    match device_id.as_deref().map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => {
            ensure_printable(trimmed, "device_id")?;
            Ok(Some(trimmed.to_string()))
        }
        _ => Ok(None),
    }
}
