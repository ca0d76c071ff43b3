use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::Result;
use crate::grading::{ExamParams, PassPolicy};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct Exam {
    // 考试ID
    pub id: i64,
    pub section_id: i64,
    // 考试名称
    pub title: String,
    // 科目
    pub subject_name: String,
    // 学期/考试批次
    pub session_title: String,
    // 满分
    pub max_marks: f64,
    // 及格分，为空时按满分的 33% 计算
    pub passing_marks: Option<f64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Exam {
    /// 计分参数，满分或及格分非法时返回错误
    pub fn params(&self, pass_policy: PassPolicy) -> Result<ExamParams> {
        ExamParams::new(self.max_marks, self.passing_marks, pass_policy)
    }
}
