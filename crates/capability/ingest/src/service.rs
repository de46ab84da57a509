//! 写入 / 查询 / 设备目录服务。

use crate::error::SensorError;
use crate::submission::{MeasurementSubmission, normalize_device_filter};
use domain::{MeasurementPoint, MeasurementRow, now_epoch_ms};
use sensor_storage::{PointBatch, RangeQuery, StorageError, TimeSeriesStore};
use sensor_telemetry::{
    record_point_accepted, record_point_rejected, record_query_failure, record_query_success,
    record_store_timeout, record_write_failure, record_write_latency_ms,
};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// 服务入口
///
/// 启动时构造一次，持有共享的存储句柄；除此之外不保存任何跨请求状态，
/// 可被 clone 到每个请求并发使用。
#[derive(Clone)]
pub struct SensorService {
    store: Arc<dyn TimeSeriesStore>,
    timeout: Duration,
}

impl SensorService {
    /// `timeout` 为每次存储调用的等待上限。
    pub fn new(store: Arc<dyn TimeSeriesStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// 校验提交并写入一个点，flush 成功后返回写入的点。
    ///
    /// 校验失败时不会访问存储；flush 失败或超时时不确认写入。
    pub async fn insert(
        &self,
        submission: MeasurementSubmission,
    ) -> Result<MeasurementPoint, SensorError> {
        let point = submission.into_point(now_epoch_ms()).inspect_err(|err| {
            record_point_rejected();
            info!(target: "sensor.ingest", reason = %err, "point_rejected");
        })?;

        let mut batch = PointBatch::new();
        batch.push(point.clone());
        let started = Instant::now();
        let result = self.bounded("flush", self.store.flush(batch)).await;
        record_write_latency_ms(started.elapsed().as_millis() as u64);

        match result {
            Ok(Ok(_)) => {
                record_point_accepted();
                info!(
                    target: "sensor.ingest",
                    measurement = %point.measurement,
                    device_id = %point.device_id,
                    client_id = %point.client_id,
                    ts_ms = point.ts_ms,
                    "point_written"
                );
                Ok(point)
            }
            Ok(Err(err)) => {
                record_write_failure();
                warn!(target: "sensor.ingest", device_id = %point.device_id, error = %err, "store_write_failed");
                Err(SensorError::StoreWrite(err.to_string()))
            }
            Err(err) => {
                record_write_failure();
                warn!(target: "sensor.ingest", device_id = %point.device_id, error = %err, "store_write_timeout");
                Err(err)
            }
        }
    }

    /// 查询最近窗口内的读数，可按设备过滤，按存储迭代顺序返回。
    pub async fn query_recent(
        &self,
        device_id: Option<String>,
    ) -> Result<Vec<MeasurementRow>, SensorError> {
        let device_id = normalize_device_filter(device_id)?;
        let query = RangeQuery::recent(device_id);
        let rows = self
            .bounded("query", self.store.query_range(&query))
            .await
            .and_then(|result| result.map_err(query_failed))
            .inspect_err(|err| {
                record_query_failure();
                warn!(target: "sensor.query", error = %err, "recent_query_failed");
            })?;
        record_query_success();
        Ok(rows)
    }

    /// 列出存储中出现过的全部 device_id（顺序不保证）。
    pub async fn list_devices(&self) -> Result<Vec<String>, SensorError> {
        let devices = self
            .bounded("devices", self.store.device_ids())
            .await
            .and_then(|result| result.map_err(query_failed))
            .inspect_err(|err| {
                record_query_failure();
                warn!(target: "sensor.query", error = %err, "device_catalog_failed");
            })?;
        record_query_success();
        Ok(devices)
    }

    /// 对一次存储调用施加超时。
    async fn bounded<T>(
        &self,
        operation: &'static str,
        future: impl Future<Output = Result<T, StorageError>>,
    ) -> Result<Result<T, StorageError>, SensorError> {
        tokio::time::timeout(self.timeout, future)
            .await
            .map_err(|_| {
                record_store_timeout();
                SensorError::Timeout(operation)
            })
    }
}

fn query_failed(err: StorageError) -> SensorError {
    SensorError::StoreQuery(err.to_string())
}
