//! 考试存储操作

use super::SeaOrmStorage;
use crate::entity::exams::Entity as Exams;
use crate::errors::{GradebookError, Result};
use crate::models::exams::entities::Exam;
use sea_orm::EntityTrait;

impl SeaOrmStorage {
    /// 通过 ID 获取考试
    pub async fn get_exam_by_id_impl(&self, exam_id: i64) -> Result<Option<Exam>> {
        let result = Exams::find_by_id(exam_id)
            .one(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询考试失败: {e}")))?;

        Ok(result.map(|m| m.into_exam()))
    }
}

#[cfg(test)]
mod tests {
    use crate::storage::sea_orm_storage::test_support::{insert_exam, memory_storage};

    #[tokio::test]
    async fn test_get_exam_by_id() {
        let storage = memory_storage().await;
        let exam_id = insert_exam(&storage, 7, 80.0, None).await;

        let exam = storage.get_exam_by_id_impl(exam_id).await.unwrap().unwrap();
        assert_eq!(exam.section_id, 7);
        assert_eq!(exam.max_marks, 80.0);
        assert_eq!(exam.passing_marks, None);

        assert!(storage.get_exam_by_id_impl(exam_id + 1).await.unwrap().is_none());
    }
}
