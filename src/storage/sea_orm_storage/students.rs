//! 学生名单存储操作

use super::SeaOrmStorage;
use crate::entity::students::{Column, Entity as Students};
use crate::errors::{GradebookError, Result};
use crate::models::students::entities::Student;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

impl SeaOrmStorage {
    /// 考试所属班级的学生名单，考试不存在时返回空名单
    pub async fn list_exam_roster_impl(&self, exam_id: i64) -> Result<Vec<Student>> {
        let Some(exam) = self.get_exam_by_id_impl(exam_id).await? else {
            return Ok(Vec::new());
        };

        let students = Students::find()
            .filter(Column::SectionId.eq(exam.section_id))
            .order_by_asc(Column::RollNumber)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询学生名单失败: {e}")))?;

        Ok(students.into_iter().map(|m| m.into_student()).collect())
    }
}

#[cfg(test)]
mod tests {
    use crate::storage::sea_orm_storage::test_support::{
        insert_exam, insert_student, memory_storage,
    };

    #[tokio::test]
    async fn test_roster_is_section_students_by_roll_number() {
        let storage = memory_storage().await;
        let exam_id = insert_exam(&storage, 1, 100.0, Some(35.0)).await;
        insert_student(&storage, 1, "R003").await;
        insert_student(&storage, 1, "R001").await;
        insert_student(&storage, 2, "R002").await;

        let roster = storage.list_exam_roster_impl(exam_id).await.unwrap();
        let rolls: Vec<&str> = roster.iter().map(|s| s.roll_number.as_str()).collect();
        assert_eq!(rolls, vec!["R001", "R003"]);

        assert!(storage.list_exam_roster_impl(999).await.unwrap().is_empty());
    }
}
