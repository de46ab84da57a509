//! 路由定义
//!
//! 集中管理所有 API 路由，将路径映射到对应的 handlers：
//! - 健康检查：/health
//! - 写入：/insert
//! - 查询：/query（别名 /temperature）
//! - 设备目录：/devices
//! - 计数快照：/metrics
//!
//! 所有路由同时挂载在 / 与 /api/ 两种前缀下。

use super::AppState;
use super::handlers::*;
use crate::middleware::request_context;
use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// 创建 API 路由
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/insert", post(insert_measurement))
        .route("/query", get(list_measurements))
        .route("/temperature", get(list_measurements))
        .route("/devices", get(list_devices))
        .route("/metrics", get(get_metrics))
}

/// 组装完整应用：双前缀路由 + 请求上下文 + 追踪 + 可选 CORS
pub fn create_app(state: AppState, cors_allow_any: bool) -> Router {
    let api = create_api_router();
    let app = Router::new()
        .merge(api.clone())
        .nest("/api", api)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // 注入 request_id/trace_id
        .layer(middleware::from_fn(request_context));
    if cors_allow_any {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

#[cfg(test)]
mod tests {
    use super::create_app;
    use crate::AppState;
    use async_trait::async_trait;
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
    };
    use domain::MeasurementRow;
    use http_body_util::BodyExt;
    use sensor_ingest::SensorService;
    use sensor_storage::{
        InMemoryTimeSeriesStore, PointBatch, RangeQuery, StorageError, TimeSeriesStore,
    };
    use serde_json::{Value, json};
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    struct BrokenStore;

    #[async_trait]
    impl TimeSeriesStore for BrokenStore {
        async fn flush(&self, _batch: PointBatch) -> Result<usize, StorageError> {
            Err(StorageError::new("influx write failed: status 503: secret detail"))
        }

        async fn query_range(
            &self,
            _query: &RangeQuery,
        ) -> Result<Vec<MeasurementRow>, StorageError> {
            Err(StorageError::new("influx query error: secret detail"))
        }

        async fn device_ids(&self) -> Result<Vec<String>, StorageError> {
            Err(StorageError::new("influx query error: secret detail"))
        }
    }

    fn app_with(store: Arc<dyn TimeSeriesStore>) -> Router {
        let state = AppState {
            service: SensorService::new(store, Duration::from_secs(2)),
        };
        create_app(state, true)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request")
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(req).await.expect("response");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json")
        };
        (status, value)
    }

    #[tokio::test]
    async fn insert_then_query_by_device() {
        let app = app_with(Arc::new(InMemoryTimeSeriesStore::new()));
        let (status, body) = send(
            &app,
            post_json(
                "/insert",
                json!({
                    "value": 22.0,
                    "device_id": "sensorA",
                    "client_id": "client1",
                    "sensor_type": "temperature"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "success": true }));

        let (status, body) = send(&app, get("/query?device_id=sensorA")).await;
        assert_eq!(status, StatusCode::OK);
        let rows = body.as_array().expect("array");
        let latest = rows.last().expect("row");
        assert_eq!(latest["value"], json!(22.0));
        assert_eq!(latest["device_id"], json!("sensorA"));
        assert!(latest["time"].as_str().expect("time").ends_with('Z'));
    }

    #[tokio::test]
    async fn missing_device_is_rejected_and_not_stored() {
        let store = Arc::new(InMemoryTimeSeriesStore::new());
        let app = app_with(store.clone());
        let (status, body) = send(&app, post_json("/insert", json!({ "value": 31.5 }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["error"]["code"], json!("INVALID.REQUEST"));
        assert_eq!(body["error"]["message"], json!("device_id required"));

        let (_, body) = send(&app, get("/query")).await;
        assert_eq!(body, json!([]));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn zero_value_is_rejected() {
        let app = app_with(Arc::new(InMemoryTimeSeriesStore::new()));
        let (status, body) = send(
            &app,
            post_json("/insert", json!({ "value": 0, "device_id": "sensorA" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], json!("value required"));
    }

    #[tokio::test]
    async fn malformed_body_is_bad_request() {
        let app = app_with(Arc::new(InMemoryTimeSeriesStore::new()));
        let req = Request::builder()
            .method("POST")
            .uri("/insert")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .expect("request");
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], json!("INVALID.REQUEST"));
    }

    #[tokio::test]
    async fn devices_lists_both_sensors_under_api_prefix() {
        let app = app_with(Arc::new(InMemoryTimeSeriesStore::new()));
        for (device, value) in [("sensorA", 22.0), ("sensorB", 25.0)] {
            let (status, _) = send(
                &app,
                post_json(
                    "/api/insert",
                    json!({ "temperature": value, "device_id": device, "client_id": "client1" }),
                ),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }
        let (status, body) = send(&app, get("/api/devices")).await;
        assert_eq!(status, StatusCode::OK);
        let devices = body.as_array().expect("array");
        assert_eq!(devices.len(), 2);
        assert!(devices.contains(&json!("sensorA")));
        assert!(devices.contains(&json!("sensorB")));

        let (status, body) = send(&app, get("/api/temperature")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().expect("array").len(), 2);
    }

    #[tokio::test]
    async fn temperature_field_wins_over_value() {
        let app = app_with(Arc::new(InMemoryTimeSeriesStore::new()));
        let (status, _) = send(
            &app,
            post_json(
                "/insert",
                json!({ "value": 1.0, "temperature": 25.5, "device_id": "sensorA" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let (_, body) = send(&app, get("/query?device_id=sensorA")).await;
        let rows = body.as_array().expect("array");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["value"], json!(25.5));
    }

    #[tokio::test]
    async fn comment_like_sensor_type_is_rejected_before_write() {
        let store = Arc::new(InMemoryTimeSeriesStore::new());
        let app = app_with(store.clone());
        let (status, body) = send(
            &app,
            post_json(
                "/insert",
                json!({ "value": 22, "device_id": "sensorA", "sensor_type": "#temp" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], json!("INVALID.REQUEST"));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn out_of_range_timestamp_uses_server_time() {
        let app = app_with(Arc::new(InMemoryTimeSeriesStore::new()));
        let (status, _) = send(
            &app,
            post_json(
                "/insert",
                json!({ "value": 22, "device_id": "sensorA", "timestamp": 9e18 }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let (_, body) = send(&app, get("/query")).await;
        let rows = body.as_array().expect("array");
        assert_eq!(rows.len(), 1);
        let time = rows[0]["time"].as_str().expect("time");
        assert!(time.ends_with('Z'));
        assert!(time.contains('T'));
    }

    #[tokio::test]
    async fn store_failures_are_generic_500() {
        let app = app_with(Arc::new(BrokenStore));
        let (status, body) = send(
            &app,
            post_json("/insert", json!({ "value": 1.5, "device_id": "sensorA" })),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], json!("STORE.WRITE_FAILED"));
        assert!(!body.to_string().contains("secret detail"));

        let (status, body) = send(&app, get("/query")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], json!("STORE.QUERY_FAILED"));
        assert!(body.get("data").is_some_and(Value::is_null));

        let (status, body) = send(&app, get("/devices")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.to_string().contains("secret detail"));
    }

    #[tokio::test]
    async fn responses_carry_request_ids() {
        let app = app_with(Arc::new(InMemoryTimeSeriesStore::new()));
        let response = app.oneshot(get("/health")).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        assert!(response.headers().contains_key("x-trace-id"));
    }

    #[tokio::test]
    async fn metrics_snapshot_is_exposed() {
        let app = app_with(Arc::new(InMemoryTimeSeriesStore::new()));
        let (status, body) = send(&app, get("/metrics")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));
        assert!(body["data"]["pointsAccepted"].is_u64());
    }
}
