use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::models::results::requests::{OpenSessionRequest, ReportQuery, ResultListParams};
use crate::services::{ExamService, GradingSessionService};
use crate::utils::SafeExamIdI64;

// 懒加载的全局服务实例
static EXAM_SERVICE: Lazy<ExamService> = Lazy::new(ExamService::new_lazy);
static GRADING_SESSION_SERVICE: Lazy<GradingSessionService> =
    Lazy::new(GradingSessionService::new_lazy);

pub async fn list_exam_results(
    req: HttpRequest,
    exam_id: SafeExamIdI64,
    query: web::Query<ResultListParams>,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE
        .list_exam_results(&req, exam_id.0, query.into_inner())
        .await
}

pub async fn get_exam_report(
    req: HttpRequest,
    exam_id: SafeExamIdI64,
    query: web::Query<ReportQuery>,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE
        .get_exam_report(&req, exam_id.0, query.into_inner())
        .await
}

pub async fn open_grading_session(
    req: HttpRequest,
    exam_id: SafeExamIdI64,
    body: web::Json<OpenSessionRequest>,
) -> ActixResult<HttpResponse> {
    GRADING_SESSION_SERVICE
        .open_session(&req, exam_id.0, body.into_inner())
        .await
}

pub fn configure_exam_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/exams/{exam_id}")
            .service(web::resource("/results").route(web::get().to(list_exam_results)))
            .service(web::resource("/report").route(web::get().to(get_exam_report)))
            // 开启录入会话（编辑模式会带入已有成绩）
            .service(
                web::resource("/grading-sessions").route(web::post().to(open_grading_session)),
            ),
    );
}
