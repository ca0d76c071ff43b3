//! 录入过程中的实时统计

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::compute::{ExamParams, round2};
use super::working_set::EntryState;
use crate::models::results::entities::ResultRecord;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct WorkingStats {
    pub total: usize,
    /// 已录入分数的人数
    pub attempted: usize,
    pub passed: usize,
    pub failed: usize,
    pub absent: usize,
    pub ungraded: usize,
    pub average_marks: f64,
    pub average_percentage: f64,
}

impl WorkingStats {
    pub fn from_records<'a, I>(records: I, params: &ExamParams) -> Self
    where
        I: IntoIterator<Item = &'a ResultRecord>,
    {
        let mut stats = WorkingStats::default();
        let mut marks_sum = 0.0;

        for record in records {
            stats.total += 1;
            match record.state() {
                EntryState::Absent => stats.absent += 1,
                EntryState::Ungraded => stats.ungraded += 1,
                EntryState::Scored => {
                    stats.attempted += 1;
                    marks_sum += record.obtained_marks.unwrap_or_default();
                    if record.is_passed == Some(true) {
                        stats.passed += 1;
                    }
                }
            }
        }

        stats.failed = stats.attempted - stats.passed;

        if stats.attempted > 0 {
            let mean = marks_sum / stats.attempted as f64;
            stats.average_marks = round2(mean);
            stats.average_percentage = round2(mean / params.max_marks * 100.0);
        }

        stats
    }
}
