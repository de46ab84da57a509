//! 读数写入、最近窗口查询与设备目录服务。
//!
//! HTTP 层只负责提取参数和映射状态码，所有校验、映射与存储交互都在
//! [`SensorService`] 中完成。

mod error;
mod service;
mod submission;

pub use error::SensorError;
pub use service::SensorService;
pub use submission::{MeasurementSubmission, normalize_device_filter};
