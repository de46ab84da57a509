//! 传感器读数 HTTP API：写入、最近窗口查询、设备目录。

mod handlers;
mod middleware;
mod routes;
mod utils;

use sensor_config::{AppConfig, StoreBackend};
use sensor_ingest::SensorService;
use sensor_storage::{InMemoryTimeSeriesStore, InfluxSettings, InfluxStore, TimeSeriesStore};
use sensor_telemetry::init_tracing;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub service: SensorService,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在），便于直接 cargo run 启动
    dotenvy::dotenv().ok();
    // 从环境变量加载运行配置
    let config = AppConfig::from_env()?;
    // 初始化结构化日志
    init_tracing();

    let timeout = Duration::from_millis(config.store_timeout_ms);
    // 存储客户端启动时创建一次，进程内所有请求共享
    let store: Arc<dyn TimeSeriesStore> = match &config.store {
        StoreBackend::Influx(influx) => {
            info!(url = %influx.url, org = %influx.org, bucket = %influx.bucket, "store_backend_influx");
            Arc::new(InfluxStore::connect(
                InfluxSettings {
                    url: influx.url.clone(),
                    token: influx.token.clone(),
                    org: influx.org.clone(),
                    bucket: influx.bucket.clone(),
                },
                timeout,
            )?)
        }
        StoreBackend::Memory => {
            info!("store_backend_memory");
            Arc::new(InMemoryTimeSeriesStore::new())
        }
    };
    let state = AppState {
        service: SensorService::new(store, timeout),
    };
    let app = routes::create_app(state, config.cors_allow_any);

    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    info!(addr = %config.http_addr, "sensor_api_listening");
    axum::serve(listener, app).await?;
    Ok(())
}
