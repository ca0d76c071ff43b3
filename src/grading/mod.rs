//! 成绩录入与评分引擎
//!
//! - [`scale`]: 评分等级表目录与区间查找
//! - [`compute`]: 得分 → 百分比 / 等级 / 是否及格
//! - [`eligibility`]: 报名资格解析
//! - [`working_set`]: 一次录入会话的工作集与状态迁移
//! - [`stats`]: 工作集实时统计
//! - [`submission`]: 提交校验与批量写入
//! - [`report`]: 基于已保存数据的考试报告
//!
//! 引擎本身不做任何 I/O，唯一的外部边界是 [`ResultSink`]。

pub mod compute;
pub mod eligibility;
pub mod report;
pub mod scale;
pub mod stats;
pub mod submission;
pub mod working_set;

pub use compute::{
    ABSENT_GRADE_LABEL, ComputedResult, ExamParams, PassPolicy, compute_result,
    default_passing_marks, round2,
};
pub use eligibility::{Eligibility, EligibilityResolver, NOT_ENROLLED_STATUS};
pub use report::{ExamReport, GradeCount};
pub use scale::{GradeBand, GradingScale, PartitionIssue, ScaleRegistry};
pub use stats::WorkingStats;
pub use submission::{
    FailureReason, ResultSink, SubmissionFailure, SubmissionOutcome, submit, validate,
};
pub use working_set::{EntryState, RosterRow, RosterStudent, WorkingSet};
