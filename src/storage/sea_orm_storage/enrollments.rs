//! 考试报名存储操作

use super::SeaOrmStorage;
use crate::entity::exam_enrollments::{Column, Entity as ExamEnrollments};
use crate::errors::{GradebookError, Result};
use crate::models::enrollments::entities::ExamEnrollment;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

impl SeaOrmStorage {
    /// 考试的全部报名记录
    pub async fn list_exam_enrollments_impl(&self, exam_id: i64) -> Result<Vec<ExamEnrollment>> {
        let enrollments = ExamEnrollments::find()
            .filter(Column::ExamId.eq(exam_id))
            .order_by_asc(Column::StudentId)
            .all(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询报名记录失败: {e}")))?;

        Ok(enrollments
            .into_iter()
            .map(|m| m.into_enrollment())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use crate::storage::sea_orm_storage::test_support::{
        enroll, insert_exam, insert_student, memory_storage,
    };

    #[tokio::test]
    async fn test_list_enrollments_for_exam() {
        let storage = memory_storage().await;
        let exam_id = insert_exam(&storage, 1, 100.0, None).await;
        let other_exam = insert_exam(&storage, 1, 50.0, None).await;
        let first = insert_student(&storage, 1, "R001").await;
        let second = insert_student(&storage, 1, "R002").await;
        enroll(&storage, exam_id, first, true).await;
        enroll(&storage, other_exam, second, false).await;

        let enrollments = storage.list_exam_enrollments_impl(exam_id).await.unwrap();
        assert_eq!(enrollments.len(), 1);
        assert_eq!(enrollments[0].student_id, first);
        assert!(enrollments[0].hall_ticket_issued);
        assert_eq!(enrollments[0].status, "ENROLLED");
    }
}
