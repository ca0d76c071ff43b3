//! 考试成绩存储操作

use super::SeaOrmStorage;
use crate::entity::exam_results::{ActiveModel, Column, Entity as ExamResults};
use crate::errors::{GradebookError, Result};
use crate::models::{
    common::pagination::{PaginationInfo, normalize_page},
    results::{
        entities::{ExamResult, ResultRecord},
        requests::ResultListQuery,
        responses::ExamResultListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::debug;

impl SeaOrmStorage {
    /// 考试的全部成绩
    pub async fn list_exam_results_impl(&self, exam_id: i64) -> Result<Vec<ExamResult>> {
        let results = ExamResults::find()
            .filter(Column::ExamId.eq(exam_id))
            .order_by_asc(Column::StudentId)
            .all(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询成绩失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_exam_result()).collect())
    }

    /// 分页列出考试成绩
    pub async fn list_exam_results_with_pagination_impl(
        &self,
        exam_id: i64,
        query: ResultListQuery,
    ) -> Result<ExamResultListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = ExamResults::find().filter(Column::ExamId.eq(exam_id));

        // 缺考筛选
        if let Some(is_absent) = query.is_absent {
            select = select.filter(Column::IsAbsent.eq(is_absent));
        }

        select = select.order_by_asc(Column::StudentId);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询成绩总数失败: {e}")))?;

        let results = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询成绩列表失败: {e}")))?;

        Ok(ExamResultListResponse {
            items: results.into_iter().map(|m| m.into_exam_result()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// 在一个事务中按 `(exam_id, student_id)` 批量写入成绩
    pub async fn upsert_results_impl(&self, exam_id: i64, batch: Vec<ResultRecord>) -> Result<usize> {
        if let Some(record) = batch.iter().find(|r| r.exam_id != exam_id) {
            return Err(GradebookError::input_validation(format!(
                "Result for student {} belongs to exam {}, not {exam_id}",
                record.student_id, record.exam_id
            )));
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| GradebookError::database_operation(format!("开启事务失败: {e}")))?;

        let now = chrono::Utc::now().timestamp();
        let mut written = 0;

        for record in batch {
            let existing = ExamResults::find()
                .filter(Column::ExamId.eq(exam_id))
                .filter(Column::StudentId.eq(record.student_id))
                .one(&txn)
                .await
                .map_err(|e| GradebookError::database_operation(format!("查询成绩失败: {e}")))?;

            match existing {
                Some(model) => {
                    let mut active: ActiveModel = model.into();
                    active.obtained_marks = Set(record.obtained_marks);
                    active.percentage = Set(record.percentage);
                    active.grade_label = Set(record.grade_label);
                    active.remarks = Set(record.remarks);
                    active.is_passed = Set(record.is_passed);
                    active.is_absent = Set(record.is_absent);
                    active.updated_at = Set(now);
                    active.update(&txn).await.map_err(|e| {
                        GradebookError::database_operation(format!("更新成绩失败: {e}"))
                    })?;
                }
                None => {
                    ActiveModel {
                        exam_id: Set(exam_id),
                        student_id: Set(record.student_id),
                        obtained_marks: Set(record.obtained_marks),
                        percentage: Set(record.percentage),
                        grade_label: Set(record.grade_label),
                        remarks: Set(record.remarks),
                        is_passed: Set(record.is_passed),
                        is_absent: Set(record.is_absent),
                        created_at: Set(now),
                        updated_at: Set(now),
                        ..Default::default()
                    }
                    .insert(&txn)
                    .await
                    .map_err(|e| GradebookError::database_operation(format!("写入成绩失败: {e}")))?;
                }
            }
            written += 1;
        }

        // 出错时 txn 在离开作用域时自动回滚
        txn.commit()
            .await
            .map_err(|e| GradebookError::database_operation(format!("提交事务失败: {e}")))?;

        debug!("Upserted {} results for exam {}", written, exam_id);
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use crate::models::results::entities::ResultRecord;
    use crate::models::results::requests::ResultListQuery;
    use crate::storage::sea_orm_storage::test_support::{
        insert_exam, insert_student, memory_storage,
    };

    fn scored(exam_id: i64, student_id: i64, marks: f64) -> ResultRecord {
        ResultRecord {
            student_id,
            exam_id,
            obtained_marks: Some(marks),
            percentage: Some(marks),
            grade_label: Some("B".to_string()),
            remarks: None,
            is_passed: Some(true),
            is_absent: false,
        }
    }

    #[tokio::test]
    async fn test_upsert_inserts_then_updates() {
        let storage = memory_storage().await;
        let exam_id = insert_exam(&storage, 1, 100.0, Some(35.0)).await;
        let first = insert_student(&storage, 1, "R001").await;
        let second = insert_student(&storage, 1, "R002").await;

        let written = storage
            .upsert_results_impl(exam_id, vec![scored(exam_id, first, 70.0), scored(exam_id, second, 66.0)])
            .await
            .unwrap();
        assert_eq!(written, 2);

        let mut absent = ResultRecord::ungraded(exam_id, first);
        absent.is_absent = true;
        absent.grade_label = Some("AB".to_string());
        absent.is_passed = Some(false);
        storage
            .upsert_results_impl(exam_id, vec![absent])
            .await
            .unwrap();

        let results = storage.list_exam_results_impl(exam_id).await.unwrap();
        assert_eq!(results.len(), 2);
        let first_result = results.iter().find(|r| r.student_id == first).unwrap();
        assert!(first_result.is_absent);
        assert_eq!(first_result.obtained_marks, None);
        assert_eq!(first_result.grade_label.as_deref(), Some("AB"));
        let second_result = results.iter().find(|r| r.student_id == second).unwrap();
        assert_eq!(second_result.obtained_marks, Some(66.0));
    }

    #[tokio::test]
    async fn test_failed_batch_writes_nothing() {
        let storage = memory_storage().await;
        let exam_id = insert_exam(&storage, 1, 100.0, None).await;
        let student = insert_student(&storage, 1, "R001").await;

        // 第二条记录违反外键约束（学生不存在），整个批次回滚
        // sqlx 默认开启 SQLite 的 foreign_keys
        let result = storage
            .upsert_results_impl(
                exam_id,
                vec![scored(exam_id, student, 50.0), scored(exam_id, 9999, 40.0)],
            )
            .await;

        assert_eq!(result.unwrap_err().code(), "E005");
        assert!(storage.list_exam_results_impl(exam_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rejects_records_of_other_exams() {
        let storage = memory_storage().await;
        let exam_id = insert_exam(&storage, 1, 100.0, None).await;
        let student = insert_student(&storage, 1, "R001").await;

        let err = storage
            .upsert_results_impl(exam_id, vec![scored(exam_id + 1, student, 50.0)])
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E007");
        assert!(storage.list_exam_results_impl(exam_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_paginated_results_with_absent_filter() {
        let storage = memory_storage().await;
        let exam_id = insert_exam(&storage, 1, 100.0, None).await;
        let mut batch = Vec::new();
        for i in 0..5 {
            let id = insert_student(&storage, 1, &format!("R00{i}")).await;
            let mut record = scored(exam_id, id, 40.0 + i as f64);
            if i == 4 {
                record = ResultRecord::ungraded(exam_id, id);
                record.is_absent = true;
            }
            batch.push(record);
        }
        storage.upsert_results_impl(exam_id, batch).await.unwrap();

        let page = storage
            .list_exam_results_with_pagination_impl(
                exam_id,
                ResultListQuery {
                    page: Some(2),
                    size: Some(2),
                    is_absent: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.pagination.total, 5);
        assert_eq!(page.pagination.total_pages, 3);

        let absent = storage
            .list_exam_results_with_pagination_impl(
                exam_id,
                ResultListQuery {
                    is_absent: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(absent.items.len(), 1);
        assert!(absent.items[0].is_absent);
    }
}
