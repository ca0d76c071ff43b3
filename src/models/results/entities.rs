use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 已保存的考试成绩
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct ExamResult {
    // 成绩ID
    pub id: i64,
    pub exam_id: i64,
    pub student_id: i64,
    // 得分
    pub obtained_marks: Option<f64>,
    // 百分比（两位小数）
    pub percentage: Option<f64>,
    // 等级
    pub grade_label: Option<String>,
    // 评语
    pub remarks: Option<String>,
    // 是否及格
    pub is_passed: Option<bool>,
    // 是否缺考
    pub is_absent: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl ExamResult {
    pub fn to_record(&self) -> ResultRecord {
        ResultRecord {
            student_id: self.student_id,
            exam_id: self.exam_id,
            obtained_marks: self.obtained_marks,
            percentage: self.percentage,
            grade_label: self.grade_label.clone(),
            remarks: self.remarks.clone(),
            is_passed: self.is_passed,
            is_absent: self.is_absent,
        }
    }
}

/// 工作集中的一条成绩，也是提交给存储层的行格式
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct ResultRecord {
    pub student_id: i64,
    pub exam_id: i64,
    pub obtained_marks: Option<f64>,
    pub percentage: Option<f64>,
    pub grade_label: Option<String>,
    pub remarks: Option<String>,
    pub is_passed: Option<bool>,
    pub is_absent: bool,
}
