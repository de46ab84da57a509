//! 时序存储内存实现
//!
//! 用于本地演示（`SENSOR_STORE=memory`）和测试。

use crate::error::StorageError;
use crate::models::{PointBatch, RangeQuery};
use crate::traits::TimeSeriesStore;
use crate::validation::ensure_point;
use domain::{MeasurementPoint, MeasurementRow, TimeWindow, VALUE_FIELD, now_epoch_ms};
use std::sync::RwLock;

/// 内存时序存储
///
/// 按写入顺序保存全部点；查询以当前时间为窗口终点。
pub struct InMemoryTimeSeriesStore {
    points: RwLock<Vec<MeasurementPoint>>,
}

impl InMemoryTimeSeriesStore {
    /// 创建空存储
    pub fn new() -> Self {
        Self {
            points: RwLock::new(Vec::new()),
        }
    }

    /// 当前累计的点数量（用于测试）
    pub fn len(&self) -> usize {
        self.points.read().map(|points| points.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryTimeSeriesStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl TimeSeriesStore for InMemoryTimeSeriesStore {
    async fn flush(&self, batch: PointBatch) -> Result<usize, StorageError> {
        for point in batch.points() {
            ensure_point(point)?;
        }
        let count = batch.len();
        let mut points = self
            .points
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        points.extend(batch.into_points());
        Ok(count)
    }

    async fn query_range(&self, query: &RangeQuery) -> Result<Vec<MeasurementRow>, StorageError> {
        let window = TimeWindow::lookback(now_epoch_ms(), query.lookback_ms);
        let points = self
            .points
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        // 所有点只有 `value` 一个字段。
        if query.field != VALUE_FIELD {
            return Ok(Vec::new());
        }
        let rows = points
            .iter()
            .filter(|point| window.contains(point.ts_ms))
            .filter(|point| match query.device_id.as_deref() {
                Some(device_id) => point.device_id == device_id,
                None => true,
            })
            .map(|point| MeasurementRow {
                ts_ms: point.ts_ms,
                value: point.value,
                device_id: point.device_id.clone(),
            })
            .collect();
        Ok(rows)
    }

    async fn device_ids(&self) -> Result<Vec<String>, StorageError> {
        let points = self
            .points
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        let mut devices: Vec<String> = Vec::new();
        for point in points.iter() {
            if !devices.iter().any(|device| device == &point.device_id) {
                devices.push(point.device_id.clone());
            }
        }
        Ok(devices)
    }
}
