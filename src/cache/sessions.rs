//! 录入会话存取
//!
//! 会话在两次请求之间以 JSON 形式保存在对象缓存中，键为 `grading_session:{uuid}`，
//! 过期时间由 `grading.session_ttl` 决定。

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use super::{CacheResult, ObjectCache};
use crate::errors::{GradebookError, Result};
use crate::grading::WorkingSet;
use crate::models::exams::entities::Exam;

pub const SESSION_KEY_PREFIX: &str = "grading_session:";

/// 一次录入会话
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradingSession {
    pub id: String,
    pub exam: Exam,
    pub working_set: WorkingSet,
    pub opened_at: chrono::DateTime<chrono::Utc>,
}

impl GradingSession {
    pub fn new(exam: Exam, working_set: WorkingSet) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            exam,
            working_set,
            opened_at: chrono::Utc::now(),
        }
    }
}

pub fn session_key(session_id: &str) -> String {
    format!("{SESSION_KEY_PREFIX}{session_id}")
}

#[derive(Clone)]
pub struct SessionStore {
    cache: Arc<dyn ObjectCache>,
    ttl: u64,
}

impl SessionStore {
    pub fn new(cache: Arc<dyn ObjectCache>, ttl: u64) -> Self {
        Self { cache, ttl }
    }

    pub async fn load(&self, session_id: &str) -> Result<Option<GradingSession>> {
        let key = session_key(session_id);
        match self.cache.get_raw(&key).await {
            CacheResult::Found(json) => match serde_json::from_str::<GradingSession>(&json) {
                Ok(session) => Ok(Some(session)),
                Err(e) => {
                    // 无法解析的旧会话直接丢弃
                    warn!("Discarding unreadable grading session {}: {}", session_id, e);
                    self.cache.remove(&key).await;
                    Ok(None)
                }
            },
            CacheResult::NotFound => Ok(None),
            CacheResult::ExistsButNoValue => Err(GradebookError::cache_connection(format!(
                "Failed to read grading session {session_id} from cache"
            ))),
        }
    }

    pub async fn save(&self, session: &GradingSession) -> Result<()> {
        let json = serde_json::to_string(session)?;
        self.cache
            .insert_raw(session_key(&session.id), json, self.ttl)
            .await;
        Ok(())
    }

    pub async fn remove(&self, session_id: &str) {
        self.cache.remove(&session_key(session_id)).await;
    }
}
