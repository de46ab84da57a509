//! 存储层数据模型
//!
//! - PointBatch：一次 flush 的待写入点集合（每个请求独立持有）
//! - RangeQuery：最近窗口查询参数

use domain::{MeasurementPoint, QUERY_LOOKBACK_MS, VALUE_FIELD};

/// 待写入的点集合。
///
/// 由调用方按请求构造，`push` 只追加到本批次，真正落盘发生在
/// `TimeSeriesStore::flush`。批次不跨请求共享。
#[derive(Debug, Clone, Default)]
pub struct PointBatch {
    points: Vec<MeasurementPoint>,
}

impl PointBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, point: MeasurementPoint) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[MeasurementPoint] {
        &self.points
    }

    pub fn into_points(self) -> Vec<MeasurementPoint> {
        self.points
    }
}

impl From<MeasurementPoint> for PointBatch {
    fn from(point: MeasurementPoint) -> Self {
        Self {
            points: vec![point],
        }
    }
}

/// 最近窗口范围查询。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeQuery {
    /// 相对当前时间的回看长度（毫秒）。
    pub lookback_ms: i64,
    /// 字段过滤（固定为 `value`）。
    pub field: String,
    /// 设备过滤；`None` 表示全部设备。
    pub device_id: Option<String>,
}

impl RangeQuery {
    /// 固定 30 分钟窗口，可选设备过滤。
    pub fn recent(device_id: Option<String>) -> Self {
        Self {
            lookback_ms: QUERY_LOOKBACK_MS,
            field: VALUE_FIELD.to_string(),
            device_id,
        }
    }
}
