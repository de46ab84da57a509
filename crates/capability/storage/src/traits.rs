//! 存储接口 Trait 定义
//!
//! 设计原则：
//! - 实现必须可被多个请求并发调用（`Send + Sync`）
//! - 所有接口返回 StorageError
//! - 使用 async_trait 支持动态分发

use crate::error::StorageError;
use crate::models::{PointBatch, RangeQuery};
use async_trait::async_trait;
use domain::MeasurementRow;

/// 时序存储接口
///
/// 对应外部时序引擎的写入、范围查询与标签枚举能力。
#[async_trait]
pub trait TimeSeriesStore: Send + Sync {
    /// 写入并 flush 一批点，返回写入数量。
    ///
    /// 返回 `Ok` 即表示存储已确认持久化；失败时整批视为未确认。
    async fn flush(&self, batch: PointBatch) -> Result<usize, StorageError>;

    /// 执行最近窗口范围查询，按存储迭代顺序返回结果行。
    ///
    /// 迭代中途出错时返回错误，已收集的部分结果丢弃。
    async fn query_range(&self, query: &RangeQuery) -> Result<Vec<MeasurementRow>, StorageError>;

    /// 枚举整个 bucket 内 `device_id` 标签的去重取值（无时间边界）。
    async fn device_ids(&self) -> Result<Vec<String>, StorageError>;
}
