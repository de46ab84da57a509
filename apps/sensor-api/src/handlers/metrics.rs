//! 计数快照
//!
//! - GET /metrics

use api_contract::{ApiResponse, MetricsSnapshotDto};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sensor_telemetry::metrics;

pub async fn get_metrics() -> Response {
    let snapshot = metrics().snapshot();
    (
        StatusCode::OK,
        Json(ApiResponse::success(MetricsSnapshotDto {
            points_accepted: snapshot.points_accepted,
            points_rejected: snapshot.points_rejected,
            write_failure: snapshot.write_failure,
            query_success: snapshot.query_success,
            query_failure: snapshot.query_failure,
            store_timeouts: snapshot.store_timeouts,
            write_latency_ms_total: snapshot.write_latency_ms_total,
            write_latency_ms_count: snapshot.write_latency_ms_count,
        })),
    )
        .into_response()
}
