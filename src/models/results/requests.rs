use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::pagination::PaginationQuery;

/// 开启录入会话请求
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct OpenSessionRequest {
    // 为空时使用默认等级表
    pub scale_id: Option<String>,
}

/// 分数输入：数字或文本（文本会被解析，空白表示清除）
#[derive(Debug, Clone, PartialEq, Deserialize, TS)]
#[serde(untagged)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub enum MarksInput {
    Number(f64),
    Text(String),
}

/// 录入分数请求，`marks` 为 null 表示清除
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct UpdateMarksRequest {
    #[serde(default)]
    pub marks: Option<MarksInput>,
}

/// 标记/取消缺考请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct UpdateAbsenceRequest {
    pub absent: bool,
}

/// 更新评语请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct UpdateRemarksRequest {
    #[serde(default)]
    pub remarks: Option<String>,
}

/// 切换等级表请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct ChangeScaleRequest {
    pub scale_id: String,
}

/// 考试报告查询参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct ReportQuery {
    pub scale_id: Option<String>,
}

/// 成绩列表查询参数（HTTP 请求）
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct ResultListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    /// 仅返回缺考 / 非缺考记录
    pub is_absent: Option<bool>,
}

// 用于存储层的内部查询参数
#[derive(Debug, Clone, Default)]
pub struct ResultListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub is_absent: Option<bool>,
}

impl From<ResultListParams> for ResultListQuery {
    fn from(params: ResultListParams) -> Self {
        Self {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            is_absent: params.is_absent,
        }
    }
}
