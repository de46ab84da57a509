use domain::{MeasurementPoint, QUERY_LOOKBACK_MS, now_epoch_ms};
use sensor_storage::{InMemoryTimeSeriesStore, PointBatch, RangeQuery, TimeSeriesStore};
use std::sync::Arc;

fn sample_point(device_id: &str, value: f64, ts_ms: i64) -> MeasurementPoint {
    MeasurementPoint {
        measurement: "temperature".to_string(),
        device_id: device_id.to_string(),
        client_id: "client1".to_string(),
        value,
        ts_ms,
    }
}

#[tokio::test]
async fn flush_then_query_recent() {
    let store = InMemoryTimeSeriesStore::new();
    let now = now_epoch_ms();
    let mut batch = PointBatch::new();
    batch.push(sample_point("sensorA", 22.0, now - 1000));
    batch.push(sample_point("sensorB", 25.0, now - 500));
    let written = store.flush(batch).await.expect("flush");
    assert_eq!(written, 2);
    assert_eq!(store.len(), 2);

    let rows = store.query_range(&RangeQuery::recent(None)).await.expect("query");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].device_id, "sensorA");
    assert_eq!(rows[1].device_id, "sensorB");
}

#[tokio::test]
async fn query_filters_by_device() {
    let store = InMemoryTimeSeriesStore::new();
    let now = now_epoch_ms();
    for (device, value) in [("sensorA", 1.0), ("sensorB", 2.0), ("sensorA", 3.0)] {
        store
            .flush(PointBatch::from(sample_point(device, value, now - 100)))
            .await
            .expect("flush");
    }

    let rows = store
        .query_range(&RangeQuery::recent(Some("sensorA".to_string())))
        .await
        .expect("query");
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|row| row.device_id == "sensorA"));
    assert_eq!(rows[1].value, 3.0);
}

#[tokio::test]
async fn query_excludes_points_outside_window() {
    let store = InMemoryTimeSeriesStore::new();
    let now = now_epoch_ms();
    store
        .flush(PointBatch::from(sample_point("old", 1.0, now - QUERY_LOOKBACK_MS - 60_000)))
        .await
        .expect("flush");
    store
        .flush(PointBatch::from(sample_point("fresh", 2.0, now - 60_000)))
        .await
        .expect("flush");

    let rows = store.query_range(&RangeQuery::recent(None)).await.expect("query");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].device_id, "fresh");

    // 设备目录没有时间边界。
    let devices = store.device_ids().await.expect("devices");
    assert_eq!(devices, vec!["old".to_string(), "fresh".to_string()]);
}

#[tokio::test]
async fn device_ids_are_distinct() {
    let store = InMemoryTimeSeriesStore::new();
    let now = now_epoch_ms();
    for device in ["sensorA", "sensorB", "sensorA", "sensorC", "sensorB"] {
        store
            .flush(PointBatch::from(sample_point(device, 1.0, now)))
            .await
            .expect("flush");
    }
    let devices = store.device_ids().await.expect("devices");
    assert_eq!(devices.len(), 3);
}

#[tokio::test]
async fn flush_rejects_invalid_point_without_writing() {
    let store = InMemoryTimeSeriesStore::new();
    let now = now_epoch_ms();
    let mut batch = PointBatch::new();
    batch.push(sample_point("sensorA", 1.0, now));
    batch.push(sample_point("", 2.0, now));
    assert!(store.flush(batch).await.is_err());

    let mut batch = PointBatch::new();
    batch.push(sample_point("sensorA", f64::NAN, now));
    assert!(store.flush(batch).await.is_err());
    assert!(store.is_empty());
}

#[tokio::test]
async fn flush_rejects_points_line_protocol_cannot_carry() {
    let store = InMemoryTimeSeriesStore::new();
    let now = now_epoch_ms();

    let mut comment = sample_point("sensorA", 1.0, now);
    comment.measurement = "#temp".to_string();
    let mut reserved = sample_point("sensorA", 1.0, now);
    reserved.measurement = "_temp".to_string();
    let trailing_backslash = sample_point("sensorA\\", 1.0, now);
    let far_future = sample_point("sensorA", 1.0, 9_000_000_000_000_000_000);

    for point in [comment, reserved, trailing_backslash, far_future] {
        assert!(store.flush(PointBatch::from(point)).await.is_err());
    }
    assert!(store.is_empty());
    assert!(store.device_ids().await.expect("devices").is_empty());
}

#[tokio::test]
async fn duplicate_points_are_both_kept() {
    let store = InMemoryTimeSeriesStore::new();
    let point = sample_point("sensorA", 22.0, now_epoch_ms());
    store.flush(PointBatch::from(point.clone())).await.expect("flush");
    store.flush(PointBatch::from(point)).await.expect("flush");
    let rows = store.query_range(&RangeQuery::recent(None)).await.expect("query");
    assert_eq!(rows.len(), 2);
}

#[tokio::test]
async fn concurrent_flushes_are_all_visible() {
    let store = Arc::new(InMemoryTimeSeriesStore::new());
    let now = now_epoch_ms();
    let mut handles = Vec::new();
    for index in 0..16 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            let device = format!("sensor-{index}");
            store
                .flush(PointBatch::from(sample_point(&device, index as f64 + 1.0, now)))
                .await
        }));
    }
    for handle in handles {
        handle.await.expect("join").expect("flush");
    }
    assert_eq!(store.len(), 16);
    assert_eq!(store.device_ids().await.expect("devices").len(), 16);
}
