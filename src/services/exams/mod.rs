pub mod report;
pub mod results;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::{AppConfig, GradingConfig};
use crate::models::results::requests::{ReportQuery, ResultListParams};
use crate::storage::Storage;

pub struct ExamService {
    storage: Option<Arc<dyn Storage>>,
    settings: Option<GradingConfig>,
}

impl ExamService {
    pub fn new_lazy() -> Self {
        Self {
            storage: None,
            settings: None,
        }
    }

    pub fn with_dependencies(storage: Arc<dyn Storage>, settings: GradingConfig) -> Self {
        Self {
            storage: Some(storage),
            settings: Some(settings),
        }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub(crate) fn get_settings(&self) -> &GradingConfig {
        self.settings
            .as_ref()
            .unwrap_or_else(|| &AppConfig::get().grading)
    }

    pub async fn list_exam_results(
        &self,
        request: &HttpRequest,
        exam_id: i64,
        params: ResultListParams,
    ) -> ActixResult<HttpResponse> {
        results::list_exam_results(self, request, exam_id, params).await
    }

    pub async fn get_exam_report(
        &self,
        request: &HttpRequest,
        exam_id: i64,
        query: ReportQuery,
    ) -> ActixResult<HttpResponse> {
        report::get_exam_report(self, request, exam_id, query).await
    }
}
