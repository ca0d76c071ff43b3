use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 报名状态：已报名
pub const ENROLLED_STATUS: &str = "ENROLLED";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct ExamEnrollment {
    // 报名ID
    pub id: i64,
    pub exam_id: i64,
    pub student_id: i64,
    // 报名状态
    pub status: String,
    // 是否已发放准考证
    pub hall_ticket_issued: bool,
    // 报名时间
    pub enrolled_at: chrono::DateTime<chrono::Utc>,
}
