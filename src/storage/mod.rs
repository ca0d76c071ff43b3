use std::sync::Arc;

use crate::grading::ResultSink;
use crate::models::{
    enrollments::entities::ExamEnrollment,
    exams::entities::Exam,
    results::{
        entities::ExamResult, requests::ResultListQuery, responses::ExamResultListResponse,
    },
    students::entities::Student,
};

use crate::errors::Result;

pub mod sea_orm_storage;

/// 存储层接口
///
/// 批量写入成绩来自 [`ResultSink`]，保证全部写入或全部不写。
#[async_trait::async_trait]
pub trait Storage: ResultSink + Send + Sync {
    /// 考试管理方法
    // 通过ID获取考试
    async fn get_exam_by_id(&self, exam_id: i64) -> Result<Option<Exam>>;

    /// 学生与报名方法
    // 考试所属班级的学生名单，按学号排序
    async fn list_exam_roster(&self, exam_id: i64) -> Result<Vec<Student>>;
    // 考试的全部报名记录
    async fn list_exam_enrollments(&self, exam_id: i64) -> Result<Vec<ExamEnrollment>>;

    /// 成绩方法
    // 考试的全部成绩
    async fn list_exam_results(&self, exam_id: i64) -> Result<Vec<ExamResult>>;
    // 分页列出考试成绩
    async fn list_exam_results_with_pagination(
        &self,
        exam_id: i64,
        query: ResultListQuery,
    ) -> Result<ExamResultListResponse>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
