/// 待写入时序存储的一条读数。
///
/// 进入存储前 `device_id` 非空、`client_id` 已填充默认值、`value` 为有限数。
/// 写入后不可变：服务只追加，不更新也不删除。
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementPoint {
    /// measurement（序列/表）名称，来自 sensor_type。
    pub measurement: String,
    pub device_id: String,
    pub client_id: String,
    pub value: f64,
    pub ts_ms: i64,
}

/// 查询结果行：(time, value, device_id)。
///
/// 顺序为存储迭代顺序，调用方如需时间有序需自行排序。
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementRow {
    pub ts_ms: i64,
    pub value: f64,
    pub device_id: String,
}
