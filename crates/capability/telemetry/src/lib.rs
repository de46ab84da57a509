//! 追踪、请求 ID 与基础计数。

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{EnvFilter, fmt};

/// 请求级追踪标识。
#[derive(Debug, Clone)]
pub struct RequestIds {
    pub request_id: String,
    pub trace_id: String,
}

/// 计数快照。
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsSnapshot {
    pub points_accepted: u64,
    pub points_rejected: u64,
    pub write_failure: u64,
    pub query_success: u64,
    pub query_failure: u64,
    pub store_timeouts: u64,
    pub write_latency_ms_total: u64,
    pub write_latency_ms_count: u64,
}

/// 进程级计数器。
pub struct TelemetryMetrics {
    points_accepted: AtomicU64,
    points_rejected: AtomicU64,
    write_failure: AtomicU64,
    query_success: AtomicU64,
    query_failure: AtomicU64,
    store_timeouts: AtomicU64,
    write_latency_ms_total: AtomicU64,
    write_latency_ms_count: AtomicU64,
}

impl TelemetryMetrics {
    pub fn new() -> Self {
        Self {
            points_accepted: AtomicU64::new(0),
            points_rejected: AtomicU64::new(0),
            write_failure: AtomicU64::new(0),
            query_success: AtomicU64::new(0),
            query_failure: AtomicU64::new(0),
            store_timeouts: AtomicU64::new(0),
            write_latency_ms_total: AtomicU64::new(0),
            write_latency_ms_count: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            points_accepted: self.points_accepted.load(Ordering::Relaxed),
            points_rejected: self.points_rejected.load(Ordering::Relaxed),
            write_failure: self.write_failure.load(Ordering::Relaxed),
            query_success: self.query_success.load(Ordering::Relaxed),
            query_failure: self.query_failure.load(Ordering::Relaxed),
            store_timeouts: self.store_timeouts.load(Ordering::Relaxed),
            write_latency_ms_total: self.write_latency_ms_total.load(Ordering::Relaxed),
            write_latency_ms_count: self.write_latency_ms_count.load(Ordering::Relaxed),
        }
    }
}

impl Default for TelemetryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

static METRICS: OnceLock<TelemetryMetrics> = OnceLock::new();

/// 获取全局计数实例。
pub fn metrics() -> &'static TelemetryMetrics {
    METRICS.get_or_init(TelemetryMetrics::new)
}

/// 初始化 tracing（默认 info）。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}

/// 生成新的 request_id 与 trace_id。
pub fn new_request_ids() -> RequestIds {
    RequestIds {
        request_id: uuid::Uuid::new_v4().to_string(),
        trace_id: uuid::Uuid::new_v4().to_string(),
    }
}

/// 记录写入成功的读数。
pub fn record_point_accepted() {
    metrics().points_accepted.fetch_add(1, Ordering::Relaxed);
}

/// 记录校验失败被拒绝的读数。
pub fn record_point_rejected() {
    metrics().points_rejected.fetch_add(1, Ordering::Relaxed);
}

/// 记录写入/flush 失败次数。
pub fn record_write_failure() {
    metrics().write_failure.fetch_add(1, Ordering::Relaxed);
}

/// 记录查询成功次数。
pub fn record_query_success() {
    metrics().query_success.fetch_add(1, Ordering::Relaxed);
}

/// 记录查询失败次数。
pub fn record_query_failure() {
    metrics().query_failure.fetch_add(1, Ordering::Relaxed);
}

/// 记录存储调用超时次数。
pub fn record_store_timeout() {
    metrics().store_timeouts.fetch_add(1, Ordering::Relaxed);
}

/// 记录写入延迟（毫秒）。
pub fn record_write_latency_ms(latency_ms: u64) {
    let metrics = metrics();
    metrics
        .write_latency_ms_total
        .fetch_add(latency_ms, Ordering::Relaxed);
    metrics
        .write_latency_ms_count
        .fetch_add(1, Ordering::Relaxed);
}
