//! 数据模型
//!
//! 每个业务模块分为 entities（业务实体）、requests（请求参数）、responses（响应体）。

pub mod achievements;
pub mod activity_logs;
pub mod admin;
pub mod auth;
pub mod common;
pub mod courses;
pub mod exercises;
pub mod labs;
pub mod portal;
pub mod schools;
pub mod sessions;
pub mod simulations;
pub mod users;

pub use common::*;

/// 进程启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
