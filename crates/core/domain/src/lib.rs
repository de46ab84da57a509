pub mod data;

pub use data::{MeasurementPoint, MeasurementRow};

/// 未指定 sensor_type 时使用的 measurement 名称。
pub const DEFAULT_SENSOR_TYPE: &str = "temperature";

/// 未指定 client_id 时写入的标签值。
pub const DEFAULT_CLIENT_ID: &str = "unknown";

/// 设备标签名（主标签）。
pub const DEVICE_ID_TAG: &str = "device_id";

/// 客户端标签名（次标签）。
pub const CLIENT_ID_TAG: &str = "client_id";

/// 唯一的数值字段名。
pub const VALUE_FIELD: &str = "value";

/// 查询接口固定的回看窗口：最近 30 分钟。
pub const QUERY_LOOKBACK_MS: i64 = 30 * 60 * 1000;

/// 可存储的最早时间（毫秒）。InfluxDB 以 i64 纳秒保存时间，约为 1677-09-21。
pub const MIN_TIMESTAMP_MS: i64 = -9_223_372_036_854;

/// 可存储的最晚时间（毫秒），约为 2262-04-11。
pub const MAX_TIMESTAMP_MS: i64 = 9_223_372_036_854;

/// 时间戳能否按 `precision=ms` 写入并以 RFC 3339 读回。
pub fn is_storable_timestamp(ts_ms: i64) -> bool {
    (MIN_TIMESTAMP_MS..=MAX_TIMESTAMP_MS).contains(&ts_ms)
}

/// 检查 measurement 名称；返回不满足的规则。
///
/// `#` 开头的行在 line protocol 中是注释，`_` 前缀为 InfluxDB 保留。
pub fn measurement_name_violation(name: &str) -> Option<&'static str> {
    if name.starts_with('#') {
        Some("must not start with '#'")
    } else if name.starts_with('_') {
        Some("must not start with '_'")
    } else if name.ends_with('\\') {
        Some("must not end with '\\'")
    } else {
        None
    }
}

/// 检查标签值；结尾的 `\` 会转义其后的分隔符。
pub fn tag_value_violation(value: &str) -> Option<&'static str> {
    if value.ends_with('\\') {
        Some("must not end with '\\'")
    } else {
        None
    }
}

/// 查询时间窗口（毫秒，闭区间）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start_ms: i64,
    pub end_ms: i64,
}

impl TimeWindow {
    /// 以 `now_ms` 为终点、向前回看 `lookback_ms` 的窗口。
    pub fn lookback(now_ms: i64, lookback_ms: i64) -> Self {
        Self {
            start_ms: now_ms.saturating_sub(lookback_ms),
            end_ms: now_ms,
        }
    }

    pub fn contains(&self, ts_ms: i64) -> bool {
        ts_ms >= self.start_ms && ts_ms <= self.end_ms
    }
}

/// 当前 UTC 时间（毫秒）。
pub fn now_epoch_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|duration| duration.as_millis() as i64)
        .unwrap_or(0)
}
