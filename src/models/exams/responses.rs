use serde::Serialize;
use ts_rs::TS;

use super::entities::Exam;
use crate::grading::ExamParams;

// 考试概要（会话视图与报告中使用）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct ExamSummary {
    pub id: i64,
    pub title: String,
    pub subject_name: String,
    pub session_title: String,
    pub max_marks: f64,
    // 实际生效的及格分
    pub passing_marks: f64,
}

impl ExamSummary {
    pub fn new(exam: &Exam, params: &ExamParams) -> Self {
        Self {
            id: exam.id,
            title: exam.title.clone(),
            subject_name: exam.subject_name.clone(),
            session_title: exam.session_title.clone(),
            max_marks: params.max_marks,
            passing_marks: params.passing_marks,
        }
    }
}
