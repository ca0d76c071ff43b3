//! 批量提交
//!
//! 每次提交（包括重试）都会完整重新校验。任一校验失败都不会写入任何记录；
//! 校验通过后整份工作集作为一个批次交给存储层，由存储层保证全部写入或全部不写。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::working_set::WorkingSet;
use crate::errors::{GradebookError, Result};
use crate::models::results::entities::ResultRecord;

/// 成绩写入接口
#[async_trait]
pub trait ResultSink: Send + Sync {
    /// 以 `(exam_id, student_id)` 为键批量写入，返回写入条数
    async fn upsert_results(&self, exam_id: i64, batch: Vec<ResultRecord>) -> Result<usize>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub enum FailureReason {
    NotEnrolled,
    OutOfRange,
    StorageFailure,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct SubmissionFailure {
    pub reason: FailureReason,
    pub student_ids: Vec<i64>,
    pub message: String,
}

impl SubmissionFailure {
    /// 转换为统一错误类型
    pub fn to_error(&self) -> GradebookError {
        match self.reason {
            FailureReason::NotEnrolled => GradebookError::eligibility(self.message.clone()),
            FailureReason::OutOfRange => GradebookError::input_validation(self.message.clone()),
            FailureReason::StorageFailure => GradebookError::submission(self.message.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct SubmissionOutcome {
    pub success: bool,
    pub written: usize,
    pub failure: Option<SubmissionFailure>,
}

impl SubmissionOutcome {
    fn succeeded(written: usize) -> Self {
        Self {
            success: true,
            written,
            failure: None,
        }
    }

    fn failed(failure: SubmissionFailure) -> Self {
        Self {
            success: false,
            written: 0,
            failure: Some(failure),
        }
    }
}

fn join_ids(ids: &[i64]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// 提交前校验：先检查报名资格，再检查分数范围
pub fn validate(working_set: &WorkingSet) -> std::result::Result<(), SubmissionFailure> {
    let not_enrolled: Vec<i64> = working_set
        .rows()
        .iter()
        .filter(|row| row.result.obtained_marks.is_some() && !row.eligibility.is_enrolled)
        .map(|row| row.student.id)
        .collect();

    if !not_enrolled.is_empty() {
        return Err(SubmissionFailure {
            reason: FailureReason::NotEnrolled,
            message: format!(
                "Marks entered for students not enrolled in this exam: {}",
                join_ids(&not_enrolled)
            ),
            student_ids: not_enrolled,
        });
    }

    let params = working_set.params();
    let out_of_range: Vec<i64> = working_set
        .rows()
        .iter()
        .filter(|row| {
            row.result
                .obtained_marks
                .is_some_and(|marks| params.check_marks(marks).is_err())
        })
        .map(|row| row.student.id)
        .collect();

    if !out_of_range.is_empty() {
        return Err(SubmissionFailure {
            reason: FailureReason::OutOfRange,
            message: format!(
                "Marks must be between 0 and {} for students: {}",
                params.max_marks,
                join_ids(&out_of_range)
            ),
            student_ids: out_of_range,
        });
    }

    Ok(())
}

/// 校验并提交整份工作集
pub async fn submit<S>(working_set: &WorkingSet, sink: &S) -> SubmissionOutcome
where
    S: ResultSink + ?Sized,
{
    if let Err(failure) = validate(working_set) {
        tracing::debug!(
            "Submission for exam {} rejected: {}",
            working_set.exam_id(),
            failure.message
        );
        return SubmissionOutcome::failed(failure);
    }

    match sink
        .upsert_results(working_set.exam_id(), working_set.records())
        .await
    {
        Ok(written) => SubmissionOutcome::succeeded(written),
        Err(e) => {
            tracing::error!(
                "Failed to store results for exam {}: {}",
                working_set.exam_id(),
                e
            );
            SubmissionOutcome::failed(SubmissionFailure {
                reason: FailureReason::StorageFailure,
                student_ids: Vec::new(),
                message: e.message().to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::working_set::tests::working_set;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        batches: Mutex<Vec<Vec<ResultRecord>>>,
        fail_with: Option<String>,
    }

    #[async_trait]
    impl ResultSink for RecordingSink {
        async fn upsert_results(&self, _exam_id: i64, batch: Vec<ResultRecord>) -> Result<usize> {
            if let Some(msg) = &self.fail_with {
                return Err(GradebookError::database_operation(msg.clone()));
            }
            let written = batch.len();
            self.batches.lock().unwrap().push(batch);
            Ok(written)
        }
    }

    #[tokio::test]
    async fn test_submit_writes_whole_working_set() {
        let mut ws = working_set();
        ws.set_marks(1, Some(90.0)).unwrap();
        ws.set_absent(2, true).unwrap();

        let sink = RecordingSink::default();
        let outcome = submit(&ws, &sink).await;

        assert!(outcome.success);
        assert_eq!(outcome.written, 4);
        assert!(outcome.failure.is_none());

        let batches = sink.batches.lock().unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), 4);
        assert_eq!(batches[0][0].obtained_marks, Some(90.0));
        assert!(batches[0][1].is_absent);
    }

    #[tokio::test]
    async fn test_non_enrolled_scored_student_blocks_batch() {
        let mut ws = working_set();
        ws.set_marks(1, Some(70.0)).unwrap();
        ws.set_marks(4, Some(90.0)).unwrap();

        let sink = RecordingSink::default();
        let outcome = submit(&ws, &sink).await;

        assert!(!outcome.success);
        assert_eq!(outcome.written, 0);
        let failure = outcome.failure.unwrap();
        assert_eq!(failure.reason, FailureReason::NotEnrolled);
        assert_eq!(failure.student_ids, vec![4]);
        assert_eq!(failure.to_error().code(), "E014");
        assert!(sink.batches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_non_enrolled_absent_student_is_allowed() {
        let mut ws = working_set();
        ws.set_absent(4, true).unwrap();

        let sink = RecordingSink::default();
        assert!(submit(&ws, &sink).await.success);
    }

    #[tokio::test]
    async fn test_storage_failure_is_aggregated() {
        let mut ws = working_set();
        ws.set_marks(1, Some(50.0)).unwrap();

        let sink = RecordingSink {
            fail_with: Some("connection reset".to_string()),
            ..Default::default()
        };
        let outcome = submit(&ws, &sink).await;

        assert!(!outcome.success);
        let failure = outcome.failure.unwrap();
        assert_eq!(failure.reason, FailureReason::StorageFailure);
        assert!(failure.student_ids.is_empty());
        assert_eq!(failure.message, "connection reset");
        assert_eq!(failure.to_error().code(), "E015");
    }

    #[tokio::test]
    async fn test_retry_revalidates() {
        let mut ws = working_set();
        ws.set_marks(4, Some(10.0)).unwrap();
        let sink = RecordingSink::default();

        assert!(!submit(&ws, &sink).await.success);
        assert!(!submit(&ws, &sink).await.success);

        ws.set_marks(4, None).unwrap();
        assert!(submit(&ws, &sink).await.success);
        assert_eq!(sink.batches.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_out_of_range_lists_every_student() {
        // 通过反序列化构造一份越界数据（例如缓存中的旧会话）
        let mut ws = working_set();
        ws.set_marks(1, Some(10.0)).unwrap();
        ws.set_marks(2, Some(20.0)).unwrap();
        let json = serde_json::to_string(&ws)
            .unwrap()
            .replace("\"obtained_marks\":10.0", "\"obtained_marks\":110.0")
            .replace("\"obtained_marks\":20.0", "\"obtained_marks\":-1.0");
        let tampered: WorkingSet = serde_json::from_str(&json).unwrap();

        let failure = validate(&tampered).unwrap_err();
        assert_eq!(failure.reason, FailureReason::OutOfRange);
        assert_eq!(failure.student_ids, vec![1, 2]);
    }
}
