//! InfluxDB v2 时序存储实现
//!
//! - 写入：`POST /api/v2/write`，line protocol，`precision=ms`
//! - 查询：`POST /api/v2/query`，Flux，响应为 CSV
//!
//! 每次 `flush` 对应一次 HTTP 写请求，服务端返回 2xx 才视为已持久化。

pub mod csv;

use crate::error::StorageError;
use crate::flux::{range_query, tag_values_query};
use crate::line_protocol::encode_points;
use crate::models::{PointBatch, RangeQuery};
use crate::traits::TimeSeriesStore;
use crate::validation::ensure_point;
use self::csv::{FluxRecord, parse_records};
use domain::{DEVICE_ID_TAG, MeasurementRow};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use std::time::Duration;
use tracing::debug;

/// InfluxDB 连接参数。
#[derive(Debug, Clone)]
pub struct InfluxSettings {
    pub url: String,
    pub token: String,
    pub org: String,
    pub bucket: String,
}

/// InfluxDB v2 存储
///
/// 内部的 `reqwest::Client` 自带连接池，可被多个请求并发共享。
pub struct InfluxStore {
    client: reqwest::Client,
    settings: InfluxSettings,
}

impl InfluxStore {
    pub fn new(client: reqwest::Client, settings: InfluxSettings) -> Self {
        Self { client, settings }
    }

    /// 按给定请求超时创建 HTTP 客户端并构造存储。
    pub fn connect(settings: InfluxSettings, timeout: Duration) -> Result<Self, StorageError> {
        let client = crate::connection::http_client(timeout)?;
        Ok(Self::new(client, settings))
    }

    pub fn bucket(&self) -> &str {
        &self.settings.bucket
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.settings.url.trim_end_matches('/'), path)
    }

    fn token_header(&self) -> String {
        format!("Token {}", self.settings.token)
    }

    async fn run_query(&self, flux: String) -> Result<Vec<FluxRecord>, StorageError> {
        debug!(target: "sensor.storage", flux = %flux, "influx_query");
        let body = serde_json::json!({
            "query": flux,
            "type": "flux",
            "dialect": {
                "header": true,
                "annotations": [],
                "delimiter": ","
            }
        });
        let response = self
            .client
            .post(self.endpoint("/api/v2/query"))
            .query(&[("org", self.settings.org.as_str())])
            .header(AUTHORIZATION, self.token_header())
            .header(ACCEPT, "application/csv")
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(StorageError::rejected("query", status.as_u16(), &text));
        }
        parse_records(&text)
    }
}

#[async_trait::async_trait]
impl TimeSeriesStore for InfluxStore {
    async fn flush(&self, batch: PointBatch) -> Result<usize, StorageError> {
        if batch.is_empty() {
            return Ok(0);
        }
        for point in batch.points() {
            ensure_point(point)?;
        }
        let body = encode_points(batch.points());
        let response = self
            .client
            .post(self.endpoint("/api/v2/write"))
            .query(&[
                ("org", self.settings.org.as_str()),
                ("bucket", self.settings.bucket.as_str()),
                ("precision", "ms"),
            ])
            .header(AUTHORIZATION, self.token_header())
            .header(CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(StorageError::rejected("write", status.as_u16(), &text));
        }
        Ok(batch.len())
    }

    async fn query_range(&self, query: &RangeQuery) -> Result<Vec<MeasurementRow>, StorageError> {
        let records = self
            .run_query(range_query(&self.settings.bucket, query))
            .await?;
        let mut rows = Vec::with_capacity(records.len());
        for record in &records {
            rows.push(row_from_record(record)?);
        }
        Ok(rows)
    }

    async fn device_ids(&self) -> Result<Vec<String>, StorageError> {
        let records = self
            .run_query(tag_values_query(&self.settings.bucket, DEVICE_ID_TAG))
            .await?;
        let mut devices = Vec::with_capacity(records.len());
        for record in &records {
            let value = record
                .get("_value")
                .ok_or_else(|| StorageError::new("missing _value column"))?;
            devices.push(value.to_string());
        }
        Ok(devices)
    }
}

fn row_from_record(record: &FluxRecord) -> Result<MeasurementRow, StorageError> {
    let time = record
        .get("_time")
        .ok_or_else(|| StorageError::new("missing _time column"))?;
    let ts_ms = chrono::DateTime::parse_from_rfc3339(time)
        .map_err(|err| StorageError::new(format!("invalid _time {time}: {err}")))?
        .timestamp_millis();
    let value = record
        .get("_value")
        .ok_or_else(|| StorageError::new("missing _value column"))?;
    let value = value
        .parse::<f64>()
        .map_err(|_| StorageError::new(format!("invalid _value {value}")))?;
    // 同一 bucket 内可能存在未打 device_id 标签的外部数据。
    let device_id = record.get(DEVICE_ID_TAG).unwrap_or_default().to_string();
    Ok(MeasurementRow {
        ts_ms,
        value,
        device_id,
    })
}
