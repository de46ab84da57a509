//! # Sensor Storage 模块
//!
//! 时序存储抽象层：服务只依赖 [`TimeSeriesStore`] trait，具体后端在启动时
//! 构造一次并以 `Arc<dyn TimeSeriesStore>` 注入到各请求。
//!
//! ## 模块说明
//!
//! - [`traits`]：存储接口（flush / 范围查询 / 设备标签枚举）
//! - [`models`]：`PointBatch`、`RangeQuery`
//! - [`error`]：存储错误类型
//! - [`validation`]：写入前的点校验
//! - [`flux`]：Flux 查询构造（字面量转义，防止查询注入）
//! - [`line_protocol`]：line protocol 编码
//! - [`connection`]：HTTP 客户端初始化
//! - [`influx`]：InfluxDB v2 实现（生产环境）
//! - [`in_memory`]：内存实现（演示与测试）
//!
//! ## 写入语义
//!
//! 没有跨请求共享的写缓冲：每次写入由调用方构造自己的 `PointBatch`，
//! `flush` 返回成功才表示数据已被存储确认。
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use sensor_storage::{InMemoryTimeSeriesStore, PointBatch, RangeQuery, TimeSeriesStore};
//!
//! let store = InMemoryTimeSeriesStore::new();
//! store.flush(PointBatch::from(point)).await?;
//! let rows = store.query_range(&RangeQuery::recent(Some("sensorA".into()))).await?;
//! ```

pub mod connection;
pub mod error;
pub mod flux;
pub mod in_memory;
pub mod influx;
pub mod line_protocol;
pub mod models;
pub mod traits;
pub mod validation;

pub use connection::*;
pub use error::*;
pub use models::*;
pub use traits::*;
pub use validation::*;

pub use in_memory::InMemoryTimeSeriesStore;
pub use influx::{InfluxSettings, InfluxStore};
