use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::GradingSessionService;
use crate::cache::sessions::GradingSession;
use crate::grading::WorkingSet;
use crate::models::results::{requests::OpenSessionRequest, responses::GradingSessionResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{error_response, resolve_scale};

pub async fn open_session(
    service: &GradingSessionService,
    request: &HttpRequest,
    exam_id: i64,
    body: OpenSessionRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let settings = service.get_settings();

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

    let scale = match resolve_scale(body.scale_id.as_deref()) {
        Ok(scale) => scale.clone(),
        Err(e) => return Ok(error_response(&e, ErrorCode::GradingScaleNotFound)),
    };

    let roster = match storage.list_exam_roster(exam_id).await {
        Ok(roster) => roster,
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };
    let enrollments = match storage.list_exam_enrollments(exam_id).await {
        Ok(enrollments) => enrollments,
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };
    let existing = match storage.list_exam_results(exam_id).await {
        Ok(results) => results,
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };

    let working_set = WorkingSet::seed(exam_id, params, scale, &roster, &enrollments, &existing);
    let session = GradingSession::new(exam, working_set);

    if let Err(e) = service.session_store(request).save(&session).await {
        return Ok(error_response(&e, ErrorCode::InternalServerError));
    }

    info!(
        "Opened grading session {} for exam {} ({} students, {} existing results, scale {})",
        session.id,
        exam_id,
        session.working_set.len(),
        existing.len(),
        session.working_set.scale().id
    );

    let view = GradingSessionResponse::new(&session.id, &session.exam, &session.working_set);
    Ok(HttpResponse::Created().json(ApiResponse::success(
        view,
        "Grading session opened successfully",
    )))
}
