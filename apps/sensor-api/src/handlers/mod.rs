//! Handlers 模块

pub mod devices;
pub mod health;
pub mod measurements;
pub mod metrics;

pub use devices::*;
pub use health::*;
pub use measurements::*;
pub use metrics::*;
