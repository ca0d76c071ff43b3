//! 成绩录入会话
//!
//! 会话在开启时从存储层装载考试、花名册、报名与已有成绩，之后的所有修改都只作用于
//! 缓存中的工作集，直到提交时才一次性写入存储层。

pub mod detail;
pub mod discard;
pub mod open;
pub mod scale;
pub mod submit;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::cache::ObjectCache;
use crate::cache::sessions::{GradingSession, SessionStore};
use crate::config::{AppConfig, GradingConfig};
use crate::errors::GradebookError;
use crate::models::results::requests::{
    ChangeScaleRequest, OpenSessionRequest, UpdateAbsenceRequest, UpdateMarksRequest,
    UpdateRemarksRequest,
};
use crate::models::results::responses::GradingSessionResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;
use crate::storage::Storage;

pub struct GradingSessionService {
    storage: Option<Arc<dyn Storage>>,
    cache: Option<Arc<dyn ObjectCache>>,
    settings: Option<GradingConfig>,
}

impl GradingSessionService {
    pub fn new_lazy() -> Self {
        Self {
            storage: None,
            cache: None,
            settings: None,
        }
    }

    pub fn with_dependencies(
        storage: Arc<dyn Storage>,
        cache: Arc<dyn ObjectCache>,
        settings: GradingConfig,
    ) -> Self {
        Self {
            storage: Some(storage),
            cache: Some(cache),
            settings: Some(settings),
        }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub(crate) fn get_cache(&self, request: &HttpRequest) -> Arc<dyn ObjectCache> {
        if let Some(cache) = &self.cache {
            cache.clone()
        } else {
            request
                .app_data::<web::Data<Arc<dyn ObjectCache>>>()
                .expect("Cache not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub(crate) fn get_settings(&self) -> &GradingConfig {
        self.settings
            .as_ref()
            .unwrap_or_else(|| &AppConfig::get().grading)
    }

    pub(crate) fn session_store(&self, request: &HttpRequest) -> SessionStore {
        SessionStore::new(self.get_cache(request), self.get_settings().session_ttl)
    }

    pub async fn open_session(
        &self,
        request: &HttpRequest,
        exam_id: i64,
        body: OpenSessionRequest,
    ) -> ActixResult<HttpResponse> {
        open::open_session(self, request, exam_id, body).await
    }

    pub async fn get_session(
        &self,
        request: &HttpRequest,
        session_id: &str,
    ) -> ActixResult<HttpResponse> {
        detail::get_session(self, request, session_id).await
    }

    pub async fn update_marks(
        &self,
        request: &HttpRequest,
        session_id: &str,
        student_id: i64,
        body: UpdateMarksRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_marks(self, request, session_id, student_id, body).await
    }

    pub async fn update_absence(
        &self,
        request: &HttpRequest,
        session_id: &str,
        student_id: i64,
        body: UpdateAbsenceRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_absence(self, request, session_id, student_id, body).await
    }

    pub async fn update_remarks(
        &self,
        request: &HttpRequest,
        session_id: &str,
        student_id: i64,
        body: UpdateRemarksRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_remarks(self, request, session_id, student_id, body).await
    }

    pub async fn change_scale(
        &self,
        request: &HttpRequest,
        session_id: &str,
        body: ChangeScaleRequest,
    ) -> ActixResult<HttpResponse> {
        scale::change_scale(self, request, session_id, body).await
    }

    pub async fn submit_session(
        &self,
        request: &HttpRequest,
        session_id: &str,
    ) -> ActixResult<HttpResponse> {
        submit::submit_session(self, request, session_id).await
    }

    pub async fn discard_session(
        &self,
        request: &HttpRequest,
        session_id: &str,
    ) -> ActixResult<HttpResponse> {
        discard::discard_session(self, request, session_id).await
    }
}

/// 读取会话，不存在或已过期时返回 404 响应
pub(crate) async fn load_session(
    store: &SessionStore,
    session_id: &str,
) -> Result<GradingSession, HttpResponse> {
    match store.load(session_id).await {
        Ok(Some(session)) => Ok(session),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::GradingSessionNotFound,
            format!("Grading session {session_id} not found or expired"),
        ))),
        Err(e) => Err(error_response(&e, ErrorCode::InternalServerError)),
    }
}

/// 保存修改后的会话并返回完整视图
pub(crate) async fn save_and_respond(
    store: &SessionStore,
    session: &GradingSession,
    message: &str,
) -> ActixResult<HttpResponse> {
    if let Err(e) = store.save(session).await {
        return Ok(error_response(&e, ErrorCode::InternalServerError));
    }

    let view = GradingSessionResponse::new(&session.id, &session.exam, &session.working_set);
    Ok(HttpResponse::Ok().json(ApiResponse::success(view, message)))
}

/// 单行修改失败时的业务错误码
pub(crate) fn entry_error_code(err: &GradebookError, fallback: ErrorCode) -> ErrorCode {
    match err {
        GradebookError::NotFound(_) => ErrorCode::StudentNotFound,
        _ => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::object_cache::moka::MokaCacheWrapper;
    use crate::grading::PassPolicy;
    use crate::models::results::requests::MarksInput;
    use crate::storage::sea_orm_storage::SeaOrmStorage;
    use crate::storage::sea_orm_storage::test_support::{
        enroll, insert_exam, insert_student, memory_storage,
    };
    use actix_web::http::StatusCode;
    use actix_web::test::TestRequest;
    use serde_json::Value;

    struct Fixture {
        storage: SeaOrmStorage,
        service: GradingSessionService,
        exam_id: i64,
        students: [i64; 3],
    }

    fn settings() -> GradingConfig {
        GradingConfig {
            default_scale: "standard".to_string(),
            pass_policy: PassPolicy::MarksThreshold,
            max_remarks_length: 20,
            session_ttl: 600,
            custom_scales: Vec::new(),
        }
    }

    /// 三名学生，第三名未报名
    async fn fixture() -> Fixture {
        let storage = memory_storage().await;
        let exam_id = insert_exam(&storage, 1, 100.0, Some(35.0)).await;
        let first = insert_student(&storage, 1, "R001").await;
        let second = insert_student(&storage, 1, "R002").await;
        let third = insert_student(&storage, 1, "R003").await;
        enroll(&storage, exam_id, first, true).await;
        enroll(&storage, exam_id, second, false).await;

        let service = GradingSessionService::with_dependencies(
            Arc::new(storage.clone()),
            Arc::new(MokaCacheWrapper::with_settings(100, 600)),
            settings(),
        );

        Fixture {
            storage,
            service,
            exam_id,
            students: [first, second, third],
        }
    }

    async fn json(response: HttpResponse) -> (StatusCode, Value) {
        let status = response.status();
        let bytes = actix_web::body::to_bytes(response.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn marks(value: f64) -> UpdateMarksRequest {
        UpdateMarksRequest {
            marks: Some(MarksInput::Number(value)),
        }
    }

    async fn open(f: &Fixture) -> String {
        let req = TestRequest::default().to_http_request();
        let response = f
            .service
            .open_session(&req, f.exam_id, OpenSessionRequest::default())
            .await
            .unwrap();
        let (status, body) = json(response).await;
        assert_eq!(status, StatusCode::CREATED);
        body["data"]["session_id"].as_str().unwrap().to_string()
    }

    #[actix_web::test]
    async fn test_open_session_seeds_roster() {
        let f = fixture().await;
        let req = TestRequest::default().to_http_request();
        let sid = open(&f).await;

        let (status, body) = json(f.service.get_session(&req, &sid).await.unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        let data = &body["data"];
        assert_eq!(data["scale"]["id"], "standard");
        assert_eq!(data["exam"]["passing_marks"], 35.0);
        let entries = data["entries"].as_array().unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0]["student"]["roll_number"], "R001");
        assert_eq!(entries[0]["eligibility"]["hall_ticket_issued"], true);
        assert_eq!(entries[2]["eligibility"]["is_enrolled"], false);
        assert_eq!(entries[2]["state"], "UNGRADED");
        assert_eq!(data["stats"]["total"], 3);
    }

    #[actix_web::test]
    async fn test_open_session_for_missing_exam() {
        let f = fixture().await;
        let req = TestRequest::default().to_http_request();
        let response = f
            .service
            .open_session(&req, f.exam_id + 100, OpenSessionRequest::default())
            .await
            .unwrap();
        let (status, body) = json(response).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], ErrorCode::ExamNotFound as i32);
    }

    #[actix_web::test]
    async fn test_open_session_with_unknown_scale() {
        let f = fixture().await;
        let req = TestRequest::default().to_http_request();
        let response = f
            .service
            .open_session(
                &req,
                f.exam_id,
                OpenSessionRequest {
                    scale_id: Some("no_such_scale".to_string()),
                },
            )
            .await
            .unwrap();
        let (status, body) = json(response).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], ErrorCode::GradingScaleNotFound as i32);
    }

    #[actix_web::test]
    async fn test_entry_edits() {
        let f = fixture().await;
        let req = TestRequest::default().to_http_request();
        let sid = open(&f).await;
        let [first, second, _] = f.students;

        let (status, body) =
            json(f.service.update_marks(&req, &sid, first, marks(72.0)).await.unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        let entry = &body["data"]["entries"][0];
        assert_eq!(entry["state"], "SCORED");
        assert_eq!(entry["result"]["percentage"], 72.0);
        assert_eq!(entry["result"]["grade_label"], "B");
        assert_eq!(entry["result"]["is_passed"], true);

        // 非数字文本
        let bad_text = UpdateMarksRequest {
            marks: Some(MarksInput::Text("seventy".to_string())),
        };
        let (status, body) =
            json(f.service.update_marks(&req, &sid, first, bad_text).await.unwrap()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], ErrorCode::MarksInvalid as i32);

        // 超出满分
        let (status, body) =
            json(f.service.update_marks(&req, &sid, first, marks(101.0)).await.unwrap()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], ErrorCode::MarksInvalid as i32);

        // 不在花名册中
        let (status, body) =
            json(f.service.update_marks(&req, &sid, 9999, marks(10.0)).await.unwrap()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], ErrorCode::StudentNotFound as i32);

        // 失败的修改不影响已保存的会话
        let (_, body) = json(f.service.get_session(&req, &sid).await.unwrap()).await;
        assert_eq!(body["data"]["entries"][0]["result"]["obtained_marks"], 72.0);

        let (status, body) = json(
            f.service
                .update_absence(&req, &sid, second, UpdateAbsenceRequest { absent: true })
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let entry = &body["data"]["entries"][1];
        assert_eq!(entry["state"], "ABSENT");
        assert_eq!(entry["result"]["grade_label"], "AB");

        // 缺考学生不能录入分数
        let (status, _) =
            json(f.service.update_marks(&req, &sid, second, marks(40.0)).await.unwrap()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let remarks = UpdateRemarksRequest {
            remarks: Some("  Well done  ".to_string()),
        };
        let (_, body) =
            json(f.service.update_remarks(&req, &sid, first, remarks).await.unwrap()).await;
        assert_eq!(body["data"]["entries"][0]["result"]["remarks"], "Well done");

        let too_long = UpdateRemarksRequest {
            remarks: Some("x".repeat(21)),
        };
        let (status, body) =
            json(f.service.update_remarks(&req, &sid, first, too_long).await.unwrap()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], ErrorCode::RemarksInvalid as i32);
    }

    #[actix_web::test]
    async fn test_change_scale_rederives_grades() {
        let f = fixture().await;
        let req = TestRequest::default().to_http_request();
        let sid = open(&f).await;
        let [first, _, _] = f.students;
        f.service
            .update_marks(&req, &sid, first, marks(72.0))
            .await
            .unwrap();

        let change = ChangeScaleRequest {
            scale_id: "cbse_9_point".to_string(),
        };
        let (status, body) = json(f.service.change_scale(&req, &sid, change).await.unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["scale"]["id"], "cbse_9_point");
        let entry = &body["data"]["entries"][0];
        assert_eq!(entry["result"]["grade_label"], "B1");
        assert_eq!(entry["result"]["obtained_marks"], 72.0);

        let unknown = ChangeScaleRequest {
            scale_id: "nope".to_string(),
        };
        let (status, body) = json(f.service.change_scale(&req, &sid, unknown).await.unwrap()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], ErrorCode::GradingScaleNotFound as i32);
    }

    #[actix_web::test]
    async fn test_submit_rejects_then_writes_whole_batch() {
        let f = fixture().await;
        let req = TestRequest::default().to_http_request();
        let sid = open(&f).await;
        let [first, second, third] = f.students;

        f.service
            .update_marks(&req, &sid, first, marks(72.0))
            .await
            .unwrap();
        f.service
            .update_marks(&req, &sid, second, marks(20.0))
            .await
            .unwrap();
        f.service
            .update_marks(&req, &sid, third, marks(50.0))
            .await
            .unwrap();

        // 未报名学生有分数，整批拒绝
        let (status, body) = json(f.service.submit_session(&req, &sid).await.unwrap()).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], ErrorCode::ResultNotEnrolled as i32);
        assert_eq!(body["data"]["success"], false);
        assert_eq!(body["data"]["failure"]["reason"], "NOT_ENROLLED");
        assert_eq!(body["data"]["failure"]["student_ids"][0], third);
        assert!(f.storage.list_exam_results_impl(f.exam_id).await.unwrap().is_empty());

        // 会话保留，修正后重试
        f.service
            .update_marks(&req, &sid, third, UpdateMarksRequest { marks: None })
            .await
            .unwrap();
        let (status, body) = json(f.service.submit_session(&req, &sid).await.unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["success"], true);
        assert_eq!(body["data"]["written"], 3);
        assert_eq!(body["data"]["stats"]["passed"], 1);
        assert_eq!(body["data"]["stats"]["failed"], 1);

        let results = f.storage.list_exam_results_impl(f.exam_id).await.unwrap();
        assert_eq!(results.len(), 3);
        let failed = results.iter().find(|r| r.student_id == second).unwrap();
        assert_eq!(failed.is_passed, Some(false));
        assert_eq!(failed.grade_label.as_deref(), Some("F"));

        // 提交成功后会话结束
        let (status, body) = json(f.service.get_session(&req, &sid).await.unwrap()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], ErrorCode::GradingSessionNotFound as i32);

        // 再次开启时带入已有成绩
        let sid = open(&f).await;
        let (_, body) = json(f.service.get_session(&req, &sid).await.unwrap()).await;
        assert_eq!(body["data"]["entries"][0]["result"]["obtained_marks"], 72.0);
        assert_eq!(body["data"]["entries"][0]["state"], "SCORED");
    }

    #[actix_web::test]
    async fn test_discard_session() {
        let f = fixture().await;
        let req = TestRequest::default().to_http_request();
        let sid = open(&f).await;
        f.service
            .update_marks(&req, &sid, f.students[0], marks(60.0))
            .await
            .unwrap();

        let (status, _) = json(f.service.discard_session(&req, &sid).await.unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert!(f.storage.list_exam_results_impl(f.exam_id).await.unwrap().is_empty());

        let (status, _) = json(f.service.discard_session(&req, &sid).await.unwrap()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
