use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::debug;

use super::ExamService;
use crate::grading::ExamReport;
use crate::models::{ApiResponse, ErrorCode, results::requests::ReportQuery};
use crate::services::{error_response, resolve_scale};

pub async fn get_exam_report(
    service: &ExamService,
    request: &HttpRequest,
    exam_id: i64,
    query: ReportQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let settings = service.get_settings();

    let scale = match resolve_scale(query.scale_id.as_deref()) {
        Ok(scale) => scale,
        Err(e) => return Ok(error_response(&e, ErrorCode::GradingScaleNotFound)),
    };

    let exam = match storage.get_exam_by_id(exam_id).await {
        Ok(Some(exam)) => exam,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ExamNotFound,
                format!("Exam {exam_id} not found"),
            )));
        }
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };

    let params = match exam.params(settings.pass_policy) {
        Ok(params) => params,
        Err(e) => return Ok(error_response(&e, ErrorCode::ExamConfigInvalid)),
    };

    let roster = match storage.list_exam_roster(exam_id).await {
        Ok(roster) => roster,
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };
    let enrollments = match storage.list_exam_enrollments(exam_id).await {
        Ok(enrollments) => enrollments,
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };
    let results = match storage.list_exam_results(exam_id).await {
        Ok(results) => results,
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };

    let report = ExamReport::build(exam_id, &params, scale, &roster, &enrollments, &results);
    debug!(
        "Built report for exam {}: {} enrolled, {} appeared",
        exam_id, report.enrolled, report.appeared
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        report,
        "Exam report generated successfully",
    )))
}
