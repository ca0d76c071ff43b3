//! 数据模型定义
//!
//! 按业务领域划分，每个领域下分为：
//! - `entities`: 业务实体
//! - `requests`: 请求参数
//! - `responses`: 响应结构

pub mod common;
pub mod enrollments;
pub mod exams;
pub mod results;
pub mod students;

pub use common::{ApiResponse, PaginationInfo, PaginationQuery};

use serde::Serialize;
use ts_rs::TS;

/// 应用启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// API 业务错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[repr(i32)]
#[ts(export, export_to = "../frontend/src/types/generated/api.ts")]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    NotFound = 1004,
    InternalServerError = 1005,

    // 考试相关
    ExamNotFound = 2000,
    ExamConfigInvalid = 2001,
    StudentNotFound = 2100,

    // 等级表相关
    GradingScaleNotFound = 3000,

    // 录入会话相关
    GradingSessionNotFound = 3100,
    MarksInvalid = 3101,
    RemarksInvalid = 3102,

    // 提交相关
    ResultNotEnrolled = 3200,
    ResultOutOfRange = 3201,
    ResultSubmitFailed = 3202,
}
