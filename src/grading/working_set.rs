//! 成绩录入工作集
//!
//! 一次录入会话持有一份工作集：花名册中每个学生对应一行，按学生 ID 定位。
//! 每次修改都会同步重新计算该行的派生字段（百分比、等级、是否及格）；
//! 花名册在会话开始时确定，之后不会增删行。
//!
//! 单行状态迁移：
//!
//! ```text
//! UNGRADED --(录入分数)--> SCORED
//! UNGRADED --(标记缺考)--> ABSENT
//! SCORED   --(录入分数)--> SCORED
//! SCORED   --(标记缺考)--> ABSENT
//! ABSENT   --(取消缺考)--> UNGRADED
//! SCORED   --(清除分数)--> UNGRADED
//! SCORED   --(切换等级表)--> SCORED
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use ts_rs::TS;

use super::compute::{ABSENT_GRADE_LABEL, ExamParams, compute_result};
use super::eligibility::{Eligibility, EligibilityResolver};
use super::scale::GradingScale;
use super::stats::WorkingStats;
use crate::errors::{GradebookError, Result};
use crate::models::enrollments::entities::ExamEnrollment;
use crate::models::results::entities::{ExamResult, ResultRecord};
use crate::models::students::entities::Student;

/// 单行成绩状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub enum EntryState {
    Ungraded,
    Scored,
    Absent,
}

impl ResultRecord {
    /// 未评分的空记录
    pub fn ungraded(exam_id: i64, student_id: i64) -> Self {
        Self {
            student_id,
            exam_id,
            obtained_marks: None,
            percentage: None,
            grade_label: None,
            remarks: None,
            is_passed: None,
            is_absent: false,
        }
    }

    pub fn state(&self) -> EntryState {
        if self.is_absent {
            EntryState::Absent
        } else if self.obtained_marks.is_some() {
            EntryState::Scored
        } else {
            EntryState::Ungraded
        }
    }

    /// 缺考：清空分数，等级固定为 AB，判定为不及格
    fn mark_absent(&mut self) {
        self.is_absent = true;
        self.obtained_marks = None;
        self.percentage = None;
        self.grade_label = Some(ABSENT_GRADE_LABEL.to_string());
        self.is_passed = Some(false);
    }

    fn clear_scores(&mut self) {
        self.is_absent = false;
        self.obtained_marks = None;
        self.percentage = None;
        self.grade_label = None;
        self.is_passed = None;
    }
}

/// 花名册中的学生
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct RosterStudent {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub roll_number: String,
    pub email: Option<String>,
}

impl From<&Student> for RosterStudent {
    fn from(student: &Student) -> Self {
        Self {
            id: student.id,
            first_name: student.first_name.clone(),
            last_name: student.last_name.clone(),
            roll_number: student.roll_number.clone(),
            email: student.email.clone(),
        }
    }
}

/// 工作集中的一行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterRow {
    pub student: RosterStudent,
    pub eligibility: Eligibility,
    pub result: ResultRecord,
}

impl RosterRow {
    pub fn state(&self) -> EntryState {
        self.result.state()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkingSet {
    exam_id: i64,
    params: ExamParams,
    scale: GradingScale,
    rows: Vec<RosterRow>,
}

impl WorkingSet {
    /// 为花名册中的每个学生建立一行，已有成绩（编辑模式）按原样带入
    pub fn seed(
        exam_id: i64,
        params: ExamParams,
        scale: GradingScale,
        roster: &[Student],
        enrollments: &[ExamEnrollment],
        existing: &[ExamResult],
    ) -> Self {
        let resolver = EligibilityResolver::new(enrollments);
        let mut seen = HashSet::with_capacity(roster.len());

        let rows = roster
            .iter()
            .filter(|student| seen.insert(student.id))
            .map(|student| {
                let result = existing
                    .iter()
                    .find(|r| r.student_id == student.id && r.exam_id == exam_id)
                    .map(|r| {
                        let mut record = r.to_record();
                        if record.is_absent {
                            record.mark_absent();
                        }
                        record
                    })
                    .unwrap_or_else(|| ResultRecord::ungraded(exam_id, student.id));

                RosterRow {
                    student: RosterStudent::from(student),
                    eligibility: resolver.eligibility(student.id),
                    result,
                }
            })
            .collect();

        Self {
            exam_id,
            params,
            scale,
            rows,
        }
    }

    pub fn exam_id(&self) -> i64 {
        self.exam_id
    }

    pub fn params(&self) -> &ExamParams {
        &self.params
    }

    pub fn scale(&self) -> &GradingScale {
        &self.scale
    }

    pub fn rows(&self) -> &[RosterRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, student_id: i64) -> Option<&RosterRow> {
        self.rows.iter().find(|row| row.student.id == student_id)
    }

    fn slot(&self, student_id: i64) -> Result<usize> {
        self.rows
            .iter()
            .position(|row| row.student.id == student_id)
            .ok_or_else(|| {
                GradebookError::not_found(format!("Student {student_id} is not on the roster"))
            })
    }

    /// 录入或清除分数。`None` 表示清除。
    ///
    /// 校验失败时工作集保持不变。
    pub fn set_marks(&mut self, student_id: i64, marks: Option<f64>) -> Result<&RosterRow> {
        let index = self.slot(student_id)?;

        match marks {
            Some(marks) => {
                if self.rows[index].result.is_absent {
                    return Err(GradebookError::input_validation(format!(
                        "Student {student_id} is marked absent; unmark absence before entering marks"
                    )));
                }
                let computed = compute_result(marks, &self.params, &self.scale)?;
                let result = &mut self.rows[index].result;
                result.obtained_marks = Some(marks);
                result.percentage = Some(computed.percentage);
                result.grade_label = computed.grade_label;
                result.is_passed = Some(computed.is_passed);
            }
            None => {
                let result = &mut self.rows[index].result;
                if result.state() == EntryState::Scored {
                    result.clear_scores();
                }
            }
        }

        Ok(&self.rows[index])
    }

    /// 标记或取消缺考
    pub fn set_absent(&mut self, student_id: i64, absent: bool) -> Result<&RosterRow> {
        let index = self.slot(student_id)?;
        let result = &mut self.rows[index].result;

        if absent {
            result.mark_absent();
        } else if result.is_absent {
            result.clear_scores();
        }

        Ok(&self.rows[index])
    }

    /// 设置评语，首尾空白会被去除，空评语视为没有评语
    pub fn set_remarks(&mut self, student_id: i64, remarks: Option<String>) -> Result<&RosterRow> {
        let index = self.slot(student_id)?;
        self.rows[index].result.remarks = remarks
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
        Ok(&self.rows[index])
    }

    /// 切换等级表：只重新推导等级与是否及格，不改动分数和百分比
    pub fn change_scale(&mut self, scale: GradingScale) {
        self.scale = scale;

        for row in &mut self.rows {
            let result = &mut row.result;
            if result.is_absent {
                continue;
            }
            if let (Some(marks), Some(percentage)) = (result.obtained_marks, result.percentage) {
                result.grade_label = self.scale.label_for(percentage);
                result.is_passed = Some(self.params.is_passed(marks, percentage));
            }
        }
    }

    pub fn stats(&self) -> WorkingStats {
        WorkingStats::from_records(self.rows.iter().map(|row| &row.result), &self.params)
    }

    /// 提交给存储层的完整批次
    pub fn records(&self) -> Vec<ResultRecord> {
        self.rows.iter().map(|row| row.result.clone()).collect()
    }
}
