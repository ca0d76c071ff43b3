use serde::Serialize;
use ts_rs::TS;

use super::entities::{ExamResult, ResultRecord};
use crate::grading::{
    Eligibility, EntryState, GradingScale, RosterRow, RosterStudent, SubmissionOutcome,
    WorkingSet, WorkingStats,
};
use crate::models::common::PaginationInfo;
use crate::models::exams::entities::Exam;
use crate::models::exams::responses::ExamSummary;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct ExamResultListResponse {
    pub items: Vec<ExamResult>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct GradingScaleListResponse {
    pub default_scale_id: String,
    pub items: Vec<GradingScale>,
}

// 会话中的一行
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct SessionEntryResponse {
    pub student: RosterStudent,
    pub eligibility: Eligibility,
    pub state: EntryState,
    pub result: ResultRecord,
}

impl From<&RosterRow> for SessionEntryResponse {
    fn from(row: &RosterRow) -> Self {
        Self {
            student: row.student.clone(),
            eligibility: row.eligibility.clone(),
            state: row.state(),
            result: row.result.clone(),
        }
    }
}

// 会话视图：每次修改后都会完整返回
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct GradingSessionResponse {
    pub session_id: String,
    pub exam: ExamSummary,
    pub scale: GradingScale,
    pub entries: Vec<SessionEntryResponse>,
    pub stats: WorkingStats,
}

impl GradingSessionResponse {
    pub fn new(session_id: &str, exam: &Exam, working_set: &WorkingSet) -> Self {
        Self {
            session_id: session_id.to_string(),
            exam: ExamSummary::new(exam, working_set.params()),
            scale: working_set.scale().clone(),
            entries: working_set
                .rows()
                .iter()
                .map(SessionEntryResponse::from)
                .collect(),
            stats: working_set.stats(),
        }
    }
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct SubmitResultsResponse {
    pub exam_id: i64,
    #[serde(flatten)]
    #[ts(flatten)]
    pub outcome: SubmissionOutcome,
    pub stats: WorkingStats,
}
