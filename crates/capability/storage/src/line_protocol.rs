//! InfluxDB line protocol 编码
//!
//! `measurement,device_id=..,client_id=.. value=<float> <ts_ms>`，
//! 写入请求使用 `precision=ms`。

use domain::{CLIENT_ID_TAG, DEVICE_ID_TAG, MeasurementPoint, VALUE_FIELD};

fn escape_measurement(value: &str, out: &mut String) {
    for ch in value.chars() {
        match ch {
            ',' | ' ' => {
                out.push('\\');
                out.push(ch);
            }
            '\n' => out.push_str("\\n"),
            _ => out.push(ch),
        }
    }
}

fn escape_tag(value: &str, out: &mut String) {
    for ch in value.chars() {
        match ch {
            ',' | '=' | ' ' => {
                out.push('\\');
                out.push(ch);
            }
            '\n' => out.push_str("\\n"),
            _ => out.push(ch),
        }
    }
}

/// 编码单个点（不含结尾换行）。
pub fn encode_point(point: &MeasurementPoint) -> String {
    let mut line = String::with_capacity(64);
    escape_measurement(&point.measurement, &mut line);
    line.push(',');
    // 标签按键名排序写入，与 InfluxDB 推荐的规范形式一致。
    line.push_str(CLIENT_ID_TAG);
    line.push('=');
    escape_tag(&point.client_id, &mut line);
    line.push(',');
    line.push_str(DEVICE_ID_TAG);
    line.push('=');
    escape_tag(&point.device_id, &mut line);
    line.push(' ');
    line.push_str(VALUE_FIELD);
    line.push('=');
    line.push_str(&format_float(point.value));
    line.push(' ');
    line.push_str(&point.ts_ms.to_string());
    line
}

/// 编码多个点，每行一个。
pub fn encode_points(points: &[MeasurementPoint]) -> String {
    let mut body = String::new();
    for point in points {
        body.push_str(&encode_point(point));
        body.push('\n');
    }
    body
}

fn format_float(value: f64) -> String {
    // f64 的 Display 不使用指数形式；整数值保留为 `22`，仍按 float 字段解析。
    value.to_string()
}
