//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod enrollments;
mod exams;
mod results;
mod students;

use crate::config::AppConfig;
use crate::errors::{GradebookError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| GradebookError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// 使用已有连接创建存储实例（不运行迁移）
    pub fn from_connection(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| GradebookError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| GradebookError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| GradebookError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(GradebookError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
use crate::grading::ResultSink;
use crate::models::{
    enrollments::entities::ExamEnrollment,
    exams::entities::Exam,
    results::{
        entities::{ExamResult, ResultRecord},
        requests::ResultListQuery,
        responses::ExamResultListResponse,
    },
    students::entities::Student,
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 考试模块
    async fn get_exam_by_id(&self, exam_id: i64) -> Result<Option<Exam>> {
        self.get_exam_by_id_impl(exam_id).await
    }

    // 学生与报名模块
    async fn list_exam_roster(&self, exam_id: i64) -> Result<Vec<Student>> {
        self.list_exam_roster_impl(exam_id).await
    }

    async fn list_exam_enrollments(&self, exam_id: i64) -> Result<Vec<ExamEnrollment>> {
        self.list_exam_enrollments_impl(exam_id).await
    }

    // 成绩模块
    async fn list_exam_results(&self, exam_id: i64) -> Result<Vec<ExamResult>> {
        self.list_exam_results_impl(exam_id).await
    }

    async fn list_exam_results_with_pagination(
        &self,
        exam_id: i64,
        query: ResultListQuery,
    ) -> Result<ExamResultListResponse> {
        self.list_exam_results_with_pagination_impl(exam_id, query)
            .await
    }
}

#[async_trait]
impl ResultSink for SeaOrmStorage {
    async fn upsert_results(&self, exam_id: i64, batch: Vec<ResultRecord>) -> Result<usize> {
        self.upsert_results_impl(exam_id, batch).await
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::SeaOrmStorage;
    use crate::entity::{exam_enrollments, exams, students};
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ActiveModelTrait, Database, Set};

    /// 内存 SQLite + 真实迁移
    pub(crate) async fn memory_storage() -> SeaOrmStorage {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        SeaOrmStorage::from_connection(db)
    }

    pub(crate) async fn insert_exam(
        storage: &SeaOrmStorage,
        section_id: i64,
        max_marks: f64,
        passing_marks: Option<f64>,
    ) -> i64 {
        let now = chrono::Utc::now().timestamp();
        exams::ActiveModel {
            section_id: Set(section_id),
            title: Set("Mid-term".to_string()),
            subject_name: Set("Mathematics".to_string()),
            session_title: Set("2025-26".to_string()),
            max_marks: Set(max_marks),
            passing_marks: Set(passing_marks),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&storage.db)
        .await
        .unwrap()
        .id
    }

    pub(crate) async fn insert_student(
        storage: &SeaOrmStorage,
        section_id: i64,
        roll_number: &str,
    ) -> i64 {
        let now = chrono::Utc::now().timestamp();
        students::ActiveModel {
            section_id: Set(section_id),
            first_name: Set(format!("Student {roll_number}")),
            last_name: Set("Verma".to_string()),
            roll_number: Set(roll_number.to_string()),
            email: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&storage.db)
        .await
        .unwrap()
        .id
    }

    pub(crate) async fn enroll(
        storage: &SeaOrmStorage,
        exam_id: i64,
        student_id: i64,
        hall_ticket_issued: bool,
    ) {
        exam_enrollments::ActiveModel {
            exam_id: Set(exam_id),
            student_id: Set(student_id),
            status: Set("ENROLLED".to_string()),
            hall_ticket_issued: Set(hall_ticket_issued),
            enrolled_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&storage.db)
        .await
        .unwrap();
    }
}
