//! 成绩计算
//!
//! 纯函数：相同输入总是得到相同输出，不依赖任何全局状态。

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::scale::GradingScale;
use crate::errors::{GradebookError, Result};

/// 缺考学生的固定等级标签
pub const ABSENT_GRADE_LABEL: &str = "AB";

/// 未设置及格分时，按满分的 33% 向上取整
pub const DEFAULT_PASSING_RATIO: f64 = 0.33;

/// 未设置及格分时，百分比规则使用的固定及格线
pub const DEFAULT_PASSING_PERCENTAGE: f64 = 33.0;

/// 保留两位小数（四舍五入，`.5` 远离零方向进位）
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 默认及格分：`ceil(max_marks * 0.33)`
pub fn default_passing_marks(max_marks: f64) -> f64 {
    (max_marks * DEFAULT_PASSING_RATIO).ceil()
}

/// 及格判定规则
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub enum PassPolicy {
    /// 得分 >= 及格分 即及格（含等于）
    #[default]
    MarksThreshold,
    /// 百分比 >= 及格分对应的百分比 即及格
    PercentageThreshold,
}

/// 一场考试的计分参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct ExamParams {
    pub max_marks: f64,
    pub passing_marks: f64,
    /// 及格线百分比；考试未设置及格分时固定为 33%
    pub passing_percentage: f64,
    pub pass_policy: PassPolicy,
}

impl ExamParams {
    pub fn new(max_marks: f64, passing_marks: Option<f64>, pass_policy: PassPolicy) -> Result<Self> {
        if !max_marks.is_finite() || max_marks <= 0.0 {
            return Err(GradebookError::input_validation(format!(
                "Max marks must be a positive number, got {max_marks}"
            )));
        }

        let passing_percentage = match passing_marks {
            Some(marks) => marks / max_marks * 100.0,
            None => DEFAULT_PASSING_PERCENTAGE,
        };
        let passing_marks = passing_marks.unwrap_or_else(|| default_passing_marks(max_marks));
        if !passing_marks.is_finite() || passing_marks < 0.0 || passing_marks > max_marks {
            return Err(GradebookError::input_validation(format!(
                "Passing marks must be between 0 and {max_marks}, got {passing_marks}"
            )));
        }

        Ok(Self {
            max_marks,
            passing_marks,
            passing_percentage,
            pass_policy,
        })
    }

    pub fn passing_percentage(&self) -> f64 {
        self.passing_percentage
    }

    pub fn percentage_of(&self, obtained_marks: f64) -> f64 {
        round2(obtained_marks / self.max_marks * 100.0)
    }

    pub fn is_passed(&self, obtained_marks: f64, percentage: f64) -> bool {
        match self.pass_policy {
            PassPolicy::MarksThreshold => obtained_marks >= self.passing_marks,
            PassPolicy::PercentageThreshold => percentage >= self.passing_percentage(),
        }
    }

    /// 校验得分是否在 `[0, max_marks]` 范围内
    pub fn check_marks(&self, obtained_marks: f64) -> Result<()> {
        if !obtained_marks.is_finite() || obtained_marks < 0.0 || obtained_marks > self.max_marks {
            return Err(GradebookError::input_validation(format!(
                "Marks must be between 0 and {}",
                self.max_marks
            )));
        }
        Ok(())
    }
}

/// 计算结果
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct ComputedResult {
    pub percentage: f64,
    pub grade_label: Option<String>,
    pub is_passed: bool,
}

/// 根据得分计算百分比、等级与是否及格
pub fn compute_result(
    obtained_marks: f64,
    params: &ExamParams,
    scale: &GradingScale,
) -> Result<ComputedResult> {
    params.check_marks(obtained_marks)?;

    let percentage = params.percentage_of(obtained_marks);
    Ok(ComputedResult {
        percentage,
        grade_label: scale.label_for(percentage),
        is_passed: params.is_passed(obtained_marks, percentage),
    })
}
