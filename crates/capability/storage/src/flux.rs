//! Flux 查询构造
//!
//! 查询文本由结构化参数拼装，所有外部输入都经 `string_literal` 转义后
//! 才进入字符串字面量，无法闭合引号或触发 `${}` 插值。

use crate::models::RangeQuery;
use domain::{DEVICE_ID_TAG, MIN_TIMESTAMP_MS};
use std::fmt::Write;

/// 渲染 Flux 字符串字面量（含两侧引号）。
///
/// 转义 `\`、`"`、`${` 以及换行/制表等控制字符。
pub fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    let mut chars = value.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '$' if chars.peek() == Some(&'{') => out.push_str("\\$"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

/// 渲染负向持续时间字面量，如 `-30m`。
pub fn negative_duration(ms: i64) -> String {
    let ms = ms.max(0);
    if ms == 0 {
        "-0s".to_string()
    } else if ms % 3_600_000 == 0 {
        format!("-{}h", ms / 3_600_000)
    } else if ms % 60_000 == 0 {
        format!("-{}m", ms / 60_000)
    } else if ms % 1000 == 0 {
        format!("-{}s", ms / 1000)
    } else {
        format!("-{ms}ms")
    }
}

/// 最近窗口范围查询：range + `_field` 过滤 + 可选 device_id 过滤。
pub fn range_query(bucket: &str, query: &RangeQuery) -> String {
    let mut flux = String::new();
    let _ = writeln!(flux, "from(bucket: {})", string_literal(bucket));
    let _ = writeln!(flux, "  |> range(start: {})", negative_duration(query.lookback_ms));
    let _ = writeln!(
        flux,
        "  |> filter(fn: (r) => r._field == {})",
        string_literal(&query.field)
    );
    if let Some(device_id) = query.device_id.as_deref() {
        let _ = writeln!(
            flux,
            "  |> filter(fn: (r) => r.{DEVICE_ID_TAG} == {})",
            string_literal(device_id)
        );
    }
    flux
}

/// 标签去重取值查询（无时间边界）。
///
/// `schema.tagValues` 默认只看最近 30 天，这里显式从最早可存储时间开始。
pub fn tag_values_query(bucket: &str, tag: &str) -> String {
    format!(
        "import \"influxdata/influxdb/schema\"\n\
         schema.tagValues(bucket: {}, tag: {}, start: time(v: {}))\n",
        string_literal(bucket),
        string_literal(tag),
        earliest_start_ns()
    )
}

/// 最早可存储时间（纳秒），`time(v: int)` 以纳秒解释整数。
fn earliest_start_ns() -> i64 {
    MIN_TIMESTAMP_MS * 1_000_000
}
